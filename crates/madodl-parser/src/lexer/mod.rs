//! Filename and request lexers.
//!
//! Filenames are tokenized with an ordered rule table: at every position the
//! first rule (by priority) that matches wins, and its match is consumed.
//! This is different from a longest-match-across-rules lexer, so the
//! filename lexer is driven by anchored [`regex`] patterns rather than a
//! generated automaton. Request expressions have a much smaller grammar and
//! use the [logos](https://docs.rs/logos) lexer in [`request`].

pub mod request;
mod token;

pub use token::{Token, TokenKind};

use crate::error::{Error, Result};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Byte span in the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// A keyword only counts when delimiters and then a digit follow it.
static NUMBER_AHEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-_.\s]*[0-9]").expect("lookahead pattern is valid"));

/// One entry of the filename rule table.
struct Rule {
    kind: TokenKind,
    pattern: Regex,
    needs_number_ahead: bool,
}

impl Rule {
    fn new(kind: TokenKind, pattern: &str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).expect("lexer rule pattern is valid"),
            needs_number_ahead: false,
        }
    }

    fn keyword(kind: TokenKind, pattern: &str) -> Self {
        Self {
            needs_number_ahead: true,
            ..Self::new(kind, pattern)
        }
    }

    /// Length of this rule's match at the start of `rest`, if any.
    fn match_len(&self, rest: &str) -> Option<usize> {
        let m = self.pattern.find(rest)?;
        if m.is_empty() {
            return None;
        }
        if self.needs_number_ahead && !NUMBER_AHEAD.is_match(&rest[m.end()..]) {
            return None;
        }
        Some(m.end())
    }
}

/// Rules in priority order, applied to the name without its extension.
/// `Data` is not listed: it is the fallback that consumes a single
/// character when nothing else matches.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(TokenKind::GroupBegin, r"^[(\[<{]"),
        Rule::new(TokenKind::GroupEnd, r"^[)\]>}]"),
        Rule::new(TokenKind::Range, r"^(?:-|\.\.)"),
        Rule::new(TokenKind::Delimiter, r"^(?:[-_.]|\s+)"),
        Rule::keyword(TokenKind::Volume, r"(?i)^v(?:ol(?:ume)?)?"),
        Rule::keyword(
            TokenKind::Chapter,
            r"(?i)^(?:c(?:h(?:a?p(?:ter)?)?)?|e(?:p(?:isode)?)?)",
        ),
        Rule::new(TokenKind::CompleteArchive, r"(?i)^complete"),
        Rule::new(TokenKind::Artbook, r"(?i)^artbook"),
        Rule::new(TokenKind::Pilot, r"(?i)^pilot"),
        Rule::new(TokenKind::Prologue, r"(?i)^prolog(?:u?e)?"),
        Rule::new(TokenKind::Prelude, r"(?i)^prelude"),
        Rule::new(TokenKind::Prototype, r"(?i)^prototype"),
        Rule::new(TokenKind::Bonus, r"(?i)^\+?(?:omake|extra|bonus|special)"),
        Rule::new(TokenKind::Number, r"^[0-9]+(?:\.[0-9]+)?"),
        Rule::new(TokenKind::Comma, r"^,"),
    ]
});

/// Classify the token starting at the beginning of `rest`.
fn next_token(rest: &str) -> (TokenKind, usize) {
    for rule in RULES.iter() {
        if let Some(len) = rule.match_len(rest) {
            return (rule.kind, len);
        }
    }
    let len = rest.chars().next().map_or(1, char::len_utf8);
    (TokenKind::Data, len)
}

/// Tokenize a filename.
///
/// Token texts partition the input exactly. The extension is everything
/// from the last `.` on and always becomes the final
/// [`TokenKind::Extension`] token, so `.7z` or `.001` cannot be read as
/// part of a number. Fails with [`Error::MalformedInput`] when the filename
/// has no non-empty trailing `.`-segment.
///
/// # Examples
///
/// ```
/// use madodl_parser::lexer::{tokenize, TokenKind};
///
/// let tokens = tokenize("Berserk v01.zip").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Data, TokenKind::Data, TokenKind::Data, TokenKind::Data,
///         TokenKind::Data, TokenKind::Data, TokenKind::Data,
///         TokenKind::Delimiter, TokenKind::Volume, TokenKind::Number,
///         TokenKind::Extension,
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let Some(dot) = input.rfind('.').filter(|&dot| dot + 1 < input.len()) else {
        return Err(Error::malformed(input, "file has no extension"));
    };
    let (stem, extension) = input.split_at(dot);

    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < stem.len() {
        let rest = &stem[pos..];
        let (kind, len) = next_token(rest);
        tokens.push(Token::new(kind, &rest[..len], Span::new(pos, pos + len)));
        pos += len;
    }

    tokens.push(Token::new(
        TokenKind::Extension,
        extension,
        Span::new(dot, input.len()),
    ));
    Ok(tokens)
}
