//! # madodl-parser
//!
//! Parsing and matching of manga archive filenames.
//!
//! This crate reads the volume/chapter numbering out of filenames such as
//! `[Group] Berserk v01-03 (Digital).zip`, interprets download requests such
//! as `v1-5` or `ch3,7,9-`, and picks the files of a directory listing that
//! satisfy a request, ranking duplicate releases by their group tags.
//!
//! Everything here is synchronous and free of I/O. Recoverable oddities are
//! reported through a [`DiagnosticSink`] supplied by the caller.
//!
//! ## Quick Start
//!
//! ```
//! use madodl_parser::{parse_file, NullSink};
//!
//! let file = parse_file("[Group] Berserk v01-03 (Digital).zip", "Berserk", &mut NullSink).unwrap();
//!
//! assert_eq!(file.volumes.values(), &[1.0, 2.0, 3.0]);
//! assert_eq!(file.tags, vec!["Group", "Digital"]);
//! assert_eq!(file.extension, "zip");
//! ```
//!
//! ## Matching a listing
//!
//! ```
//! use madodl_parser::tags::{FilterMode, TagRule};
//! use madodl_parser::{interpret_request, match_listing, NullSink};
//!
//! let request = interpret_request(&["Berserk", "v3"], &mut NullSink).unwrap();
//! let listing = ["Berserk v03.zip", "Berserk v03 (Digital).zip"];
//! let rules = [TagRule::new("Digital").filter(FilterMode::Prefer)];
//!
//! let result = match_listing(&request, "Berserk", &listing, &rules, &mut NullSink).unwrap();
//! assert_eq!(result.selected.len(), 1);
//! assert_eq!(result.selected[0].name, "Berserk v03 (Digital).zip");
//! ```

pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod model;
pub mod tags;

mod parser;

pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Level, NullSink};
#[cfg(feature = "tracing")]
pub use diagnostics::TracingSink;
pub use error::{Error, Result};
pub use lexer::{tokenize, Token, TokenKind};
pub use matcher::{match_listing, MatchResult, SelectedFile};
pub use model::{
    Axis, Correction, NumberSet, ParseError, ParsedFile, ParsedRequest, SpecialKind, OPEN_ENDED,
};
pub use parser::{expand_range, interpret, interpret_request, parse_file, MAX_RANGE_LEN};
