//! Token types for the filename lexer.

use super::Span;

/// Classification of a filename token.
///
/// Variants mirror the lexer rules in priority order. The interpreter may
/// later rewrite a token's kind (for example a `Volume` keyword with no
/// number after it becomes `Data`), but a token never moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// Trailing `.ext` of the filename.
    Extension,
    /// One of `( [ < {`.
    GroupBegin,
    /// One of `) ] > }`.
    GroupEnd,
    /// `-` or `..`.
    Range,
    /// `_`, `.`, or a run of whitespace (and `-` once corrected).
    Delimiter,
    /// `v`, `vol`, `volume` directly ahead of a number.
    Volume,
    /// `c`, `ch`, `chp`, `chap`, `chapter`, `e`, `ep`, `episode` ahead of a number.
    Chapter,
    /// `complete`.
    CompleteArchive,
    /// `artbook`.
    Artbook,
    /// `pilot`.
    Pilot,
    /// `prologue`, `prologe`, `prolog`.
    Prologue,
    /// `prelude`.
    Prelude,
    /// `prototype`.
    Prototype,
    /// `omake`, `extra`, `bonus`, `special`, optionally prefixed by `+`.
    Bonus,
    /// Digits with an optional fractional part.
    Number,
    /// `,`.
    Comma,
    /// Any single character no other rule claimed.
    Data,
}

impl TokenKind {
    /// Kinds that mark a one-off release carrying no volume/chapter numbers.
    pub fn is_special(self) -> bool {
        matches!(
            self,
            TokenKind::Pilot
                | TokenKind::Prologue
                | TokenKind::Prelude
                | TokenKind::Prototype
                | TokenKind::Artbook
        )
    }

    /// Kinds that, directly after an opening bracket, mean the bracket is
    /// structure rather than a release-group tag.
    pub fn is_structural_keyword(self) -> bool {
        self.is_special()
            || matches!(
                self,
                TokenKind::Volume
                    | TokenKind::Chapter
                    | TokenKind::CompleteArchive
                    | TokenKind::Bonus
            )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Extension => "extension",
            TokenKind::GroupBegin => "group-begin",
            TokenKind::GroupEnd => "group-end",
            TokenKind::Range => "range",
            TokenKind::Delimiter => "delimiter",
            TokenKind::Volume => "volume",
            TokenKind::Chapter => "chapter",
            TokenKind::CompleteArchive => "complete",
            TokenKind::Artbook => "artbook",
            TokenKind::Pilot => "pilot",
            TokenKind::Prologue => "prologue",
            TokenKind::Prelude => "prelude",
            TokenKind::Prototype => "prototype",
            TokenKind::Bonus => "bonus",
            TokenKind::Number => "number",
            TokenKind::Comma => "comma",
            TokenKind::Data => "data",
        };
        f.write_str(name)
    }
}

/// A single lexed token.
///
/// `text` is always the exact slice of the input the token covers, so the
/// texts of a token sequence concatenate back to the original filename.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Current classification.
    pub kind: TokenKind,
    /// Original text.
    pub text: String,
    /// Parsed value for `Number` tokens.
    pub value: Option<f64>,
    /// Byte span in the input.
    pub span: Span,
}

impl Token {
    /// Create a token, parsing the numeric value for `Number` tokens.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        let text = text.into();
        let value = match kind {
            TokenKind::Number => text.parse::<f64>().ok(),
            _ => None,
        };
        Self {
            kind,
            text,
            value,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_tokens_carry_value() {
        let tok = Token::new(TokenKind::Number, "012.5", Span::new(0, 5));
        assert_eq!(tok.value, Some(12.5));
        assert_eq!(tok.text, "012.5");
    }

    #[test]
    fn non_number_tokens_have_no_value() {
        let tok = Token::new(TokenKind::Data, "x", Span::new(0, 1));
        assert!(tok.value.is_none());
    }

    #[test]
    fn structural_keywords() {
        assert!(TokenKind::Volume.is_structural_keyword());
        assert!(TokenKind::Prototype.is_structural_keyword());
        assert!(TokenKind::Bonus.is_structural_keyword());
        assert!(!TokenKind::Number.is_structural_keyword());
        assert!(!TokenKind::Bonus.is_special());
    }
}
