//! Non-fatal events raised while parsing and matching.
//!
//! The parser never logs on its own. Callers hand in a [`DiagnosticSink`]
//! and decide what to do with each [`Diagnostic`]: drop it ([`NullSink`]),
//! keep it ([`CollectingSink`]) or forward it to `tracing`
//! (`TracingSink`, behind the `tracing` feature).

use crate::lexer::TokenKind;
use crate::model::Axis;
use crate::tags::FilterMode;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    /// Routine self-correction.
    Debug,
    /// Decision worth surfacing in verbose output.
    Info,
    /// Something looked wrong but processing continued.
    Warn,
}

/// A single parser or matcher event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A token was reclassified by the interpreter.
    Corrected {
        input: String,
        index: usize,
        text: String,
        from: TokenKind,
        to: TokenKind,
    },
    /// A range whose start exceeds its end was normalized to `start..start+end`.
    ReversedRange { input: String, start: f64, end: f64 },
    /// A range too long to expand was dropped from the numbering.
    RangeTooLarge { input: String, start: f64, end: f64 },
    /// A bonus marker appeared before any volume or chapter number.
    BonusWithoutNumber { input: String },
    /// Bare numbers could not be assigned because both axes were taken.
    UnassignedNumbers { input: String, values: Vec<f64> },
    /// A request expression without a prefix was read as volumes.
    DefaultedToVolume { expression: String },
    /// A comma with no number after it was ignored.
    ExtraneousComma { expression: String },
    /// A tag rule with an already-seen name was ignored.
    DuplicateTagRule { name: String },
    /// A file was removed by a tag rule.
    Filtered {
        file: String,
        tag: String,
        mode: FilterMode,
    },
    /// The sole file of a listing was taken as a complete archive.
    ImplicitCompleteArchive { file: String },
    /// A complete archive satisfied an unrestricted request.
    CompleteArchive { file: String },
    /// A value held by one file was handed to another by preference.
    Replaced {
        axis: Axis,
        value: f64,
        old: String,
        new: String,
    },
    /// Two files claim the same value and no preference decides.
    DuplicateRelease {
        axis: Axis,
        value: f64,
        kept: String,
        ignored: String,
    },
}

impl Diagnostic {
    /// How loudly this event should be reported.
    pub fn level(&self) -> Level {
        match self {
            Self::Corrected { .. } | Self::DefaultedToVolume { .. } => Level::Debug,
            Self::Filtered { .. }
            | Self::ImplicitCompleteArchive { .. }
            | Self::CompleteArchive { .. }
            | Self::Replaced { .. } => Level::Info,
            Self::ReversedRange { .. }
            | Self::RangeTooLarge { .. }
            | Self::BonusWithoutNumber { .. }
            | Self::UnassignedNumbers { .. }
            | Self::ExtraneousComma { .. }
            | Self::DuplicateTagRule { .. }
            | Self::DuplicateRelease { .. } => Level::Warn,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrected {
                input,
                index,
                text,
                from,
                to,
            } => write!(
                f,
                "{input}: token {index} {text:?} reclassified {from} -> {to}"
            ),
            Self::ReversedRange { input, start, end } => write!(
                f,
                "{input}: range {start}-{end} runs backwards, read as {start}-{}",
                start.floor() + end
            ),
            Self::RangeTooLarge { input, start, end } => {
                write!(f, "{input}: range {start}-{end} is too large, ignoring its end")
            }
            Self::BonusWithoutNumber { input } => {
                write!(f, "{input}: bonus marker without volume or chapter")
            }
            Self::UnassignedNumbers { input, values } => {
                write!(f, "{input}: could not place numbers {values:?}")
            }
            Self::DefaultedToVolume { expression } => {
                write!(f, "{expression}: no vol/ch prefix, assuming volume")
            }
            Self::ExtraneousComma { expression } => {
                write!(f, "{expression}: extraneous comma ignored")
            }
            Self::DuplicateTagRule { name } => {
                write!(f, "tag {name:?} defined more than once, using the first")
            }
            Self::Filtered { file, tag, mode } => {
                write!(f, "filtered out {file} ({mode} {tag:?})")
            }
            Self::ImplicitCompleteArchive { file } => {
                write!(f, "{file}: only file in listing, treating as complete")
            }
            Self::CompleteArchive { file } => write!(f, "found complete archive {file}"),
            Self::Replaced {
                axis,
                value,
                old,
                new,
            } => write!(f, "{axis} {value}: replacing {old} with {new}"),
            Self::DuplicateRelease {
                axis,
                value,
                kept,
                ignored,
            } => write!(
                f,
                "{axis} {value}: duplicate release {ignored}, keeping {kept}"
            ),
        }
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    /// Record one event.
    fn record(&mut self, event: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, event: Diagnostic) {
        (**self).record(event);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&mut self, _event: Diagnostic) {}
}

/// Sink that keeps every event in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub events: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events at or above `level`.
    pub fn at_least(&self, level: Level) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter().filter(move |e| e.level() >= level)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&mut self, event: Diagnostic) {
        self.events.push(event);
    }
}

/// Sink that forwards events to `tracing`.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl DiagnosticSink for TracingSink {
    fn record(&mut self, event: Diagnostic) {
        match event.level() {
            Level::Debug => tracing::debug!("{event}"),
            Level::Info => tracing::info!("{event}"),
            Level::Warn => tracing::warn!("{event}"),
        }
    }
}
