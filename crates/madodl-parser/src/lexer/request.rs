//! Lexer for request expressions such as `v1-5`, `ch3,7,9-12` or `vol10-`.

use crate::error::{Error, Result};
use logos::Logos;

/// Request expression token.
///
/// Expressions are normalized (whitespace removed, lowercased) before
/// lexing, so patterns here are lowercase only.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum RequestToken {
    /// `v` or `vol`
    #[regex(r"v(?:ol)?")]
    Volume,

    /// `c`, `ch`, `cp` or `chp`
    #[regex(r"ch?p?")]
    Chapter,

    /// Integer or decimal number
    #[regex(r"[0-9]+(?:\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[token("-")]
    Range,

    #[token(",")]
    Comma,
}

impl RequestToken {
    pub fn number(self) -> Option<f64> {
        match self {
            RequestToken::Number(n) => Some(n),
            _ => None,
        }
    }
}

/// Tokenize one request expression.
///
/// Any character outside the request grammar is an [`Error::Request`].
pub fn tokenize_request(expression: &str) -> Result<Vec<RequestToken>> {
    let normalized: String = expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    let mut lexer = RequestToken::lexer(&normalized);
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next() {
        match tok {
            Ok(tok) => tokens.push(tok),
            Err(()) => {
                return Err(Error::request(
                    expression,
                    format!("bad character {:?}", lexer.slice()),
                ))
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequestToken::*;

    #[test]
    fn test_volume_range() {
        assert_eq!(
            tokenize_request("v1-5").unwrap(),
            vec![Volume, Number(1.0), Range, Number(5.0)]
        );
        assert_eq!(
            tokenize_request("Vol 10 -").unwrap(),
            vec![Volume, Number(10.0), Range]
        );
    }

    #[test]
    fn test_chapter_prefixes() {
        for expr in ["c3", "ch3", "cp3", "chp3", "CH3"] {
            assert_eq!(tokenize_request(expr).unwrap()[0], Chapter, "{expr}");
        }
    }

    #[test]
    fn test_comma_list() {
        assert_eq!(
            tokenize_request("ch3,7.5").unwrap(),
            vec![Chapter, Number(3.0), Comma, Number(7.5)]
        );
    }

    #[test]
    fn test_bad_character() {
        let err = tokenize_request("v1@3").unwrap_err();
        assert!(matches!(err, Error::Request { .. }));
        assert!(err.to_string().contains("bad character \"@\""));
        assert!(tokenize_request("x1").is_err());
        assert!(tokenize_request("v1..3").is_err());
    }
}
