//! Data model for parsed filenames and requests.

mod file;
mod numbers;
mod request;

pub use file::{Correction, ParsedFile, SpecialKind};
pub use numbers::{Axis, NumberSet, OPEN_ENDED};
pub use request::ParsedRequest;

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.0)
    }
}

impl std::error::Error for ParseError {}
