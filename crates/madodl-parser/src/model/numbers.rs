//! Volume/chapter number collections.

use std::cmp::Ordering;
use std::fmt;

/// Marks "this value and everything above" at the end of a [`NumberSet`].
pub const OPEN_ENDED: f64 = 4_294_967_296.0;

/// Which numbering axis a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    Volume,
    Chapter,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Volume => f.write_str("vol"),
            Axis::Chapter => f.write_str("chp"),
        }
    }
}

/// Ordered volume or chapter numbers.
///
/// While a name is being interpreted values are appended in encounter
/// order. [`NumberSet::finalize`] sorts and deduplicates them, after which
/// the set is what [`ParsedFile`](super::ParsedFile) and
/// [`ParsedRequest`](super::ParsedRequest) expose. An open-ended range is
/// stored as its start value followed by [`OPEN_ENDED`], with the start
/// also kept in `open_from`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberSet {
    values: Vec<f64>,
    open_from: Option<f64>,
}

impl NumberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a finalized set from values.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut set = Self {
            values: values.into_iter().collect(),
            open_from: None,
        };
        set.finalize();
        set
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = f64>) {
        self.values.extend(values);
    }

    /// Append the open-ended sentinel after `start`.
    pub fn open(&mut self, start: f64) {
        self.values.push(OPEN_ENDED);
        if self.open_from.is_none() {
            self.open_from = Some(start);
        }
    }

    /// Sort ascending and collapse duplicates.
    pub fn finalize(&mut self) {
        self.values.sort_by(f64::total_cmp);
        self.values.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
    }

    /// All stored values, the sentinel included.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Stored values without the sentinel.
    pub fn explicit(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| *v != OPEN_ENDED)
    }

    /// Start of the open-ended range, if any.
    pub fn open_from(&self) -> Option<f64> {
        self.open_from
    }

    pub fn is_open(&self) -> bool {
        self.open_from.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether `value` is covered, counting the open-ended tail.
    pub fn contains(&self, value: f64) -> bool {
        self.values.iter().any(|v| *v == value)
            || self.open_from.is_some_and(|start| value >= start)
    }

    /// Whether any of `values` is covered.
    pub fn intersects(&self, values: &[f64]) -> bool {
        values.iter().any(|v| self.contains(*v))
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for v in self.explicit() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            write!(f, "{v}")?;
        }
        if self.is_open() {
            f.write_str("-")?;
        }
        Ok(())
    }
}
