//! Interpreters that turn token sequences into parsed filenames and requests.
//!
//! Both interpreters share the same numeric reading rules: an axis keyword
//! followed by a number, comma lists, closed ranges that expand to whole
//! numbers, and open-ended ranges marked with [`OPEN_ENDED`](crate::OPEN_ENDED).

mod file;
mod range;
mod request;

pub use file::interpret;
pub use range::{expand as expand_range, MAX_RANGE_LEN};
pub use request::interpret_request;

use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::lexer::tokenize;
use crate::model::ParsedFile;

/// Tokenize and interpret a filename in one go.
pub fn parse_file(
    filename: &str,
    series_title: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<ParsedFile> {
    interpret(tokenize(filename)?, series_title, sink)
}
