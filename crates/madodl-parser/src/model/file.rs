//! Parsed filename structure.

use super::{NumberSet, ParseError};
use crate::lexer::{Token, TokenKind};

/// Kind of one-off release that carries no regular numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialKind {
    Pilot,
    Prologue,
    Prelude,
    Prototype,
    Artbook,
    /// Omake, extras and other bonus material attached to a volume/chapter.
    Bonus,
}

impl SpecialKind {
    /// The special kind a token stands for, if any.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Pilot => Some(Self::Pilot),
            TokenKind::Prologue => Some(Self::Prologue),
            TokenKind::Prelude => Some(Self::Prelude),
            TokenKind::Prototype => Some(Self::Prototype),
            TokenKind::Artbook => Some(Self::Artbook),
            TokenKind::Bonus => Some(Self::Bonus),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecialKind::Pilot => write!(f, "pilot"),
            SpecialKind::Prologue => write!(f, "prologue"),
            SpecialKind::Prelude => write!(f, "prelude"),
            SpecialKind::Prototype => write!(f, "prototype"),
            SpecialKind::Artbook => write!(f, "artbook"),
            SpecialKind::Bonus => write!(f, "bonus"),
        }
    }
}

impl std::str::FromStr for SpecialKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pilot" => Ok(SpecialKind::Pilot),
            "prologue" | "prolog" => Ok(SpecialKind::Prologue),
            "prelude" => Ok(SpecialKind::Prelude),
            "prototype" => Ok(SpecialKind::Prototype),
            "artbook" => Ok(SpecialKind::Artbook),
            "bonus" | "omake" | "extra" | "special" => Ok(SpecialKind::Bonus),
            _ => Err(ParseError(format!("invalid special kind: {}", s))),
        }
    }
}

/// Audit record of one token reclassification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Correction {
    /// Position of the token in the sequence.
    pub index: usize,
    /// Kind the lexer assigned.
    pub original: TokenKind,
    /// Kind after interpretation.
    pub corrected: TokenKind,
}

/// Everything extracted from one archive filename.
///
/// Built once by [`interpret`](crate::interpret) and not modified after.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedFile {
    /// The filename as given.
    pub name: String,
    /// Corrected token sequence.
    pub tokens: Vec<Token>,
    /// Reclassifications applied to the lexer output, in order.
    pub corrections: Vec<Correction>,
    /// Volume numbers, sorted and unique.
    pub volumes: NumberSet,
    /// Chapter numbers, sorted and unique.
    pub chapters: NumberSet,
    /// Bracketed release-group annotations in order of appearance.
    pub tags: Vec<String>,
    /// Remaining plain text, for display only.
    pub title_fragment: String,
    /// Extension without the leading dot.
    pub extension: String,
    /// The archive holds the entire series.
    pub is_complete_archive: bool,
    pub special: Option<SpecialKind>,
}

impl ParsedFile {
    /// Whether the file carries no volume, chapter or completeness marker.
    pub fn is_unnumbered(&self) -> bool {
        self.volumes.is_empty() && self.chapters.is_empty() && !self.is_complete_archive
    }

    /// Whether the file has the given tag, ignoring case.
    pub fn has_tag_ignore_case(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_kind_display_fromstr_roundtrip() {
        let variants = [
            SpecialKind::Pilot,
            SpecialKind::Prologue,
            SpecialKind::Prelude,
            SpecialKind::Prototype,
            SpecialKind::Artbook,
            SpecialKind::Bonus,
        ];
        for variant in variants {
            let parsed: SpecialKind = variant.to_string().parse().expect("should parse");
            assert_eq!(variant, parsed);
        }
        assert!("volume".parse::<SpecialKind>().is_err());
    }

    #[test]
    fn special_kind_from_token() {
        assert_eq!(
            SpecialKind::from_token(TokenKind::Artbook),
            Some(SpecialKind::Artbook)
        );
        assert_eq!(SpecialKind::from_token(TokenKind::Volume), None);
    }
}
