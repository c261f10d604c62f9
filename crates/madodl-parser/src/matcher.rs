//! Listing matcher: choose which files of a directory listing satisfy a
//! request.
//!
//! The listing is walked once, in the order given. Order matters: when two
//! files carry the same volume or chapter, tag preference decides which one
//! keeps it, and a later file can take a value away from an earlier one.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::Result;
use crate::model::{Axis, NumberSet, ParsedFile, ParsedRequest};
use crate::parser::parse_file;
use crate::tags::{Preference, TagPolicy, TagRule, TagVerdict};
use std::collections::HashMap;

/// A file picked for download and what it contributes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectedFile {
    pub name: String,
    pub volumes: Vec<f64>,
    pub chapters: Vec<f64>,
    pub preference: Preference,
}

impl SelectedFile {
    fn is_empty(&self) -> bool {
        self.volumes.is_empty() && self.chapters.is_empty()
    }
}

/// Result of matching a listing against a request.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    /// Matched volumes, sorted.
    pub matched_volumes: Vec<f64>,
    /// Matched chapters, sorted.
    pub matched_chapters: Vec<f64>,
    /// Files in listing order.
    pub selected: Vec<SelectedFile>,
    /// Set instead of `selected` when one archive covers the whole series.
    pub complete_archive: Option<String>,
    /// Explicitly requested volumes no file provided.
    pub missing_volumes: Vec<f64>,
    /// Explicitly requested chapters no file provided.
    pub missing_chapters: Vec<f64>,
}

impl MatchResult {
    /// Whether nothing at all was selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.complete_archive.is_none()
    }

    fn complete(name: &str) -> Self {
        Self {
            complete_archive: Some(name.to_string()),
            ..Self::default()
        }
    }
}

/// Match `listing` against `request`.
///
/// # Errors
///
/// Any filename that fails to parse aborts the whole match with
/// [`Error::MalformedInput`](crate::Error::MalformedInput).
///
/// # Examples
///
/// ```
/// use madodl_parser::{interpret_request, match_listing, NullSink};
///
/// let request = interpret_request(&["Berserk", "v2-3"], &mut NullSink).unwrap();
/// let listing = ["Berserk v01.zip", "Berserk v02.zip", "Berserk v03.zip"];
/// let result = match_listing(&request, "Berserk", &listing, &[], &mut NullSink).unwrap();
///
/// assert_eq!(result.matched_volumes, vec![2.0, 3.0]);
/// assert_eq!(result.selected.len(), 2);
/// ```
pub fn match_listing<S: AsRef<str>>(
    request: &ParsedRequest,
    series_title: &str,
    listing: &[S],
    rules: &[TagRule],
    sink: &mut dyn DiagnosticSink,
) -> Result<MatchResult> {
    let policy = TagPolicy::new(rules, sink);
    let mut state = MatchState::default();
    let only_file = listing.len() == 1;

    for name in listing {
        let name = name.as_ref();
        let mut file = parse_file(name, series_title, sink)?;

        let preference = match policy.evaluate(&file, series_title) {
            TagVerdict::Keep(preference) => preference,
            TagVerdict::Drop { tag, mode } => {
                sink.record(Diagnostic::Filtered {
                    file: name.to_string(),
                    tag,
                    mode,
                });
                continue;
            }
        };

        if only_file && file.is_unnumbered() {
            sink.record(Diagnostic::ImplicitCompleteArchive {
                file: name.to_string(),
            });
            file.is_complete_archive = true;
        }

        if file.is_complete_archive && request.wants_all {
            sink.record(Diagnostic::CompleteArchive {
                file: name.to_string(),
            });
            return Ok(MatchResult::complete(name));
        }

        if has_unwanted_volume(request, &file) {
            continue;
        }

        state.offer(request, &file, preference, sink);
    }

    Ok(state.finish(request))
}

/// With an explicit, closed volume request, a file carrying any volume
/// outside of it is skipped whole.
fn has_unwanted_volume(request: &ParsedRequest, file: &ParsedFile) -> bool {
    !request.wants_all
        && !request.volumes.is_empty()
        && !request.volumes.is_open()
        && file.volumes.explicit().any(|v| !request.volumes.contains(v))
}

#[derive(Default)]
struct MatchState {
    entries: Vec<SelectedFile>,
    volume_holders: HashMap<u64, usize>,
    chapter_holders: HashMap<u64, usize>,
}

impl MatchState {
    fn offer(
        &mut self,
        request: &ParsedRequest,
        file: &ParsedFile,
        preference: Preference,
        sink: &mut dyn DiagnosticSink,
    ) {
        let idx = self.entries.len();
        let mut entry = SelectedFile {
            name: file.name.clone(),
            volumes: Vec::new(),
            chapters: Vec::new(),
            preference,
        };

        // A volume split over several files: same volume number, but this
        // file brings only chapters nobody has yet.
        let chapters: Vec<f64> = file.chapters.explicit().collect();
        let split = !chapters.is_empty()
            && chapters
                .iter()
                .all(|c| !self.chapter_holders.contains_key(&c.to_bits()));

        for v in file.volumes.explicit().filter(|v| request.wants_volume(*v)) {
            if split && self.volume_holders.contains_key(&v.to_bits()) {
                entry.volumes.push(v);
            } else if self.claim(Axis::Volume, v, idx, &entry, sink) {
                entry.volumes.push(v);
            }
        }

        let ride_along = !entry.volumes.is_empty();
        let requested = !chapters.is_empty() && chapters.iter().all(|c| request.wants_chapter(*c));
        if ride_along || requested {
            for c in chapters {
                if self.claim(Axis::Chapter, c, idx, &entry, sink) {
                    entry.chapters.push(c);
                }
            }
        }

        if !entry.is_empty() {
            self.entries.push(entry);
        }
    }

    /// Try to give `value` to the new entry `idx`. Evicts the current holder
    /// when preference says so.
    fn claim(
        &mut self,
        axis: Axis,
        value: f64,
        idx: usize,
        new: &SelectedFile,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let holders = match axis {
            Axis::Volume => &mut self.volume_holders,
            Axis::Chapter => &mut self.chapter_holders,
        };
        let Some(&old_idx) = holders.get(&value.to_bits()) else {
            holders.insert(value.to_bits(), idx);
            return true;
        };
        let old = &mut self.entries[old_idx];

        let replace = new.preference == Preference::Preferred
            || old.preference == Preference::Deprioritized;
        if replace {
            sink.record(Diagnostic::Replaced {
                axis,
                value,
                old: old.name.clone(),
                new: new.name.clone(),
            });
            let list = match axis {
                Axis::Volume => &mut old.volumes,
                Axis::Chapter => &mut old.chapters,
            };
            list.retain(|v| *v != value);
            holders.insert(value.to_bits(), idx);
            return true;
        }

        if old.preference == Preference::Neutral {
            sink.record(Diagnostic::DuplicateRelease {
                axis,
                value,
                kept: old.name.clone(),
                ignored: new.name.clone(),
            });
        }
        false
    }

    fn finish(self, request: &ParsedRequest) -> MatchResult {
        let selected: Vec<SelectedFile> =
            self.entries.into_iter().filter(|e| !e.is_empty()).collect();

        let mut matched_volumes: Vec<f64> =
            selected.iter().flat_map(|e| e.volumes.iter().copied()).collect();
        let mut matched_chapters: Vec<f64> =
            selected.iter().flat_map(|e| e.chapters.iter().copied()).collect();
        for set in [&mut matched_volumes, &mut matched_chapters] {
            set.sort_by(f64::total_cmp);
            set.dedup();
        }

        let missing = |wanted: &NumberSet, got: &[f64]| -> Vec<f64> {
            if request.wants_all {
                return Vec::new();
            }
            wanted.explicit().filter(|v| !got.contains(v)).collect()
        };
        let missing_volumes = missing(&request.volumes, &matched_volumes);
        let missing_chapters = missing(&request.chapters, &matched_chapters);

        MatchResult {
            matched_volumes,
            matched_chapters,
            selected,
            complete_archive: None,
            missing_volumes,
            missing_chapters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, NullSink};
    use crate::parser::interpret_request;

    fn request(args: &[&str]) -> ParsedRequest {
        interpret_request(args, &mut NullSink).unwrap()
    }

    fn run(args: &[&str], listing: &[&str]) -> MatchResult {
        match_listing(&request(args), args[0], listing, &[], &mut NullSink).unwrap()
    }

    fn names(result: &MatchResult) -> Vec<&str> {
        result.selected.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_chapter_request() {
        let r = run(
            &["Series", "c3-4"],
            &["Series c001.zip", "Series c003.zip", "Series c004.zip"],
        );
        assert_eq!(r.matched_chapters, vec![3.0, 4.0]);
        assert_eq!(names(&r), vec!["Series c003.zip", "Series c004.zip"]);
    }

    #[test]
    fn test_chapters_ride_along_with_volume() {
        let r = run(&["Series", "v2"], &["Series v01 c001-005.zip", "Series v02 c006-010.zip"]);
        assert_eq!(r.matched_volumes, vec![2.0]);
        assert_eq!(r.matched_chapters, vec![6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn test_file_with_extra_volumes_is_skipped() {
        let r = run(&["Series", "v2"], &["Series v01-03.zip", "Series v02.zip"]);
        assert_eq!(names(&r), vec!["Series v02.zip"]);
    }

    #[test]
    fn test_partial_chapter_file_not_selected() {
        let r = run(&["Series", "c3"], &["Series c001-005.zip"]);
        assert!(r.is_empty());
        assert_eq!(r.missing_chapters, vec![3.0]);
    }

    #[test]
    fn test_split_volume_is_not_a_duplicate() {
        let mut sink = CollectingSink::new();
        let result = match_listing(
            &request(&["Series", "v1"]),
            "Series",
            &["Series v01 c001-003.zip", "Series v01 c004-006.zip"],
            &[],
            &mut sink,
        )
        .unwrap();
        assert_eq!(result.selected.len(), 2);
        assert_eq!(result.matched_chapters.len(), 6);
        assert!(!sink
            .events
            .iter()
            .any(|e| matches!(e, Diagnostic::DuplicateRelease { .. })));
    }

    #[test]
    fn test_neutral_duplicate_keeps_first() {
        let mut sink = CollectingSink::new();
        let result = match_listing(
            &request(&["Series", "v1"]),
            "Series",
            &["Series v01 [A].zip", "Series v01 [B].zip"],
            &[],
            &mut sink,
        )
        .unwrap();
        assert_eq!(names(&result), vec!["Series v01 [A].zip"]);
        assert!(sink
            .events
            .iter()
            .any(|e| matches!(e, Diagnostic::DuplicateRelease { .. })));
    }

    #[test]
    fn test_missing_values_reported() {
        let r = run(&["Series", "v1-3", "c9"], &["Series v02.zip"]);
        assert_eq!(r.missing_volumes, vec![1.0, 3.0]);
        assert_eq!(r.missing_chapters, vec![9.0]);
    }

    #[test]
    fn test_all_without_complete_takes_everything() {
        let r = run(&["Series"], &["Series v01.zip", "Series v02.zip", "Series c010.zip"]);
        assert_eq!(r.matched_volumes, vec![1.0, 2.0]);
        assert_eq!(r.matched_chapters, vec![10.0]);
        assert!(r.missing_volumes.is_empty());
    }

    #[test]
    fn test_complete_archive_needs_all_request() {
        let r = run(&["Series", "v1"], &["Series (Complete).zip", "Series v01.zip"]);
        assert_eq!(r.complete_archive, None);
        assert_eq!(names(&r), vec!["Series v01.zip"]);
    }
}
