//! Tag rules: filtering and ranking files by their bracketed group tags.
//!
//! A [`TagRule`] names a tag (e.g. `Digital`, `Kotonoha`) and what to do
//! with files that carry it. Rules can be scoped to particular series, to
//! parts of a series (via a sub-request), and to particular extensions.
//! Outside its scope a rule has no effect on a file.
//!
//! ```
//! use madodl_parser::tags::{FilterMode, TagPolicy, TagRule, TagVerdict, Preference};
//! use madodl_parser::{parse_file, NullSink};
//!
//! let rules = vec![TagRule::new("Digital").filter(FilterMode::Prefer)];
//! let policy = TagPolicy::new(&rules, &mut NullSink);
//! let file = parse_file("Berserk v01 (Digital).zip", "Berserk", &mut NullSink).unwrap();
//! assert_eq!(
//!     policy.evaluate(&file, "Berserk"),
//!     TagVerdict::Keep(Preference::Preferred)
//! );
//! ```

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{ParseError, ParsedFile, ParsedRequest};
use std::collections::HashSet;

/// How a rule's name is compared against file tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CaseRule {
    /// Case-insensitive.
    #[default]
    Any,
    /// Byte-for-byte.
    Exact,
    /// The file tag must be the lowercase form of the name.
    Lower,
    /// The file tag must be the uppercase form of the name.
    Upper,
}

impl CaseRule {
    fn matches(self, name: &str, tag: &str) -> bool {
        match self {
            CaseRule::Any => tag.to_lowercase() == name.to_lowercase(),
            CaseRule::Exact => tag == name,
            CaseRule::Lower => tag == name.to_lowercase(),
            CaseRule::Upper => tag == name.to_uppercase(),
        }
    }
}

impl std::str::FromStr for CaseRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(CaseRule::Any),
            "exact" => Ok(CaseRule::Exact),
            "lower" => Ok(CaseRule::Lower),
            "upper" => Ok(CaseRule::Upper),
            _ => Err(ParseError(format!("invalid case rule: {}", s))),
        }
    }
}

/// What a rule does to files that carry (or lack) its tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FilterMode {
    /// Drop files without the tag.
    Only,
    /// Drop files with the tag.
    #[cfg_attr(feature = "serde", serde(alias = "out"))]
    Exclude,
    /// Rank files with the tag above others.
    #[default]
    Prefer,
    /// Rank files with the tag below others.
    #[cfg_attr(feature = "serde", serde(alias = "not prefer"))]
    Deprioritize,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Only => write!(f, "only"),
            FilterMode::Exclude => write!(f, "exclude"),
            FilterMode::Prefer => write!(f, "prefer"),
            FilterMode::Deprioritize => write!(f, "deprioritize"),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "only" => Ok(FilterMode::Only),
            "exclude" | "out" => Ok(FilterMode::Exclude),
            "prefer" => Ok(FilterMode::Prefer),
            "deprioritize" | "not prefer" => Ok(FilterMode::Deprioritize),
            _ => Err(ParseError(format!("invalid filter mode: {}", s))),
        }
    }
}

/// Ranking of a file that passed filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Preference {
    Deprioritized,
    #[default]
    Neutral,
    Preferred,
}

/// One series a rule is limited to.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleScope {
    pub title: String,
    /// Further restriction to some volumes/chapters. `None` means the whole
    /// series.
    pub request: Option<ParsedRequest>,
}

/// A tag rule.
#[derive(Debug, Clone, PartialEq)]
pub struct TagRule {
    pub name: String,
    pub case: CaseRule,
    pub filter: FilterMode,
    /// Empty means every series.
    pub titles: Vec<TitleScope>,
    /// Lowercase extensions without the dot; `None` means any.
    pub extensions: Option<Vec<String>>,
}

impl TagRule {
    /// A case-insensitive `Prefer` rule for every series and extension.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            case: CaseRule::default(),
            filter: FilterMode::default(),
            titles: Vec::new(),
            extensions: None,
        }
    }

    pub fn filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn case(mut self, case: CaseRule) -> Self {
        self.case = case;
        self
    }

    /// Limit the rule to `title`, optionally to part of it.
    pub fn for_title(mut self, title: impl Into<String>, request: Option<ParsedRequest>) -> Self {
        self.titles.push(TitleScope {
            title: title.into(),
            request,
        });
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = Some(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        );
        self
    }

    /// Whether the rule applies to `file` of series `title` at all.
    ///
    /// Title scopes always limit a rule. The extension list limits every
    /// mode except [`FilterMode::Only`], where an unlisted extension is
    /// itself a reason to drop the file.
    pub fn applies_to(&self, file: &ParsedFile, title: &str) -> bool {
        (self.filter == FilterMode::Only || self.extension_listed(file))
            && self.in_scope(file, title)
    }

    /// Whether `file`'s extension is one the rule names. True when the rule
    /// names none.
    pub fn extension_listed(&self, file: &ParsedFile) -> bool {
        let Some(exts) = &self.extensions else {
            return true;
        };
        let ext = file.extension.to_lowercase();
        exts.iter().any(|e| *e == ext)
    }

    fn in_scope(&self, file: &ParsedFile, title: &str) -> bool {
        if self.titles.is_empty() {
            return true;
        }

        let title = title.to_lowercase();
        // First matching entry decides.
        let Some(scope) = self
            .titles
            .iter()
            .find(|s| s.title.to_lowercase() == title)
        else {
            return false;
        };
        match &scope.request {
            None => true,
            Some(req) if req.wants_all => true,
            Some(req) => {
                req.volumes.intersects(file.volumes.values())
                    || req.chapters.intersects(file.chapters.values())
            }
        }
    }

    /// Whether `file` carries this rule's tag.
    pub fn tag_present(&self, file: &ParsedFile) -> bool {
        file.tags.iter().any(|t| self.case.matches(&self.name, t))
    }
}

/// Outcome of evaluating a file against a [`TagPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub enum TagVerdict {
    Keep(Preference),
    Drop { tag: String, mode: FilterMode },
}

/// A deduplicated set of tag rules.
#[derive(Debug, Clone, Default)]
pub struct TagPolicy {
    rules: Vec<TagRule>,
}

impl TagPolicy {
    /// Build a policy. When several rules share a name (ignoring case) the
    /// first one is used and the rest are reported and dropped.
    pub fn new(rules: &[TagRule], sink: &mut dyn DiagnosticSink) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(rules.len());
        for rule in rules {
            if seen.insert(rule.name.to_lowercase()) {
                kept.push(rule.clone());
            } else {
                sink.record(Diagnostic::DuplicateTagRule {
                    name: rule.name.clone(),
                });
            }
        }
        Self { rules: kept }
    }

    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Filter and rank one file.
    pub fn evaluate(&self, file: &ParsedFile, title: &str) -> TagVerdict {
        let mut preferred = false;
        let mut deprioritized = false;

        for rule in self.rules.iter().filter(|r| r.applies_to(file, title)) {
            let present = rule.tag_present(file);
            match rule.filter {
                FilterMode::Only if !present || !rule.extension_listed(file) => {
                    return TagVerdict::Drop {
                        tag: rule.name.clone(),
                        mode: rule.filter,
                    }
                }
                FilterMode::Exclude if present => {
                    return TagVerdict::Drop {
                        tag: rule.name.clone(),
                        mode: rule.filter,
                    }
                }
                FilterMode::Prefer if present => preferred = true,
                FilterMode::Deprioritize if present => deprioritized = true,
                _ => {}
            }
        }

        TagVerdict::Keep(if preferred {
            Preference::Preferred
        } else if deprioritized {
            Preference::Deprioritized
        } else {
            Preference::Neutral
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, NullSink};
    use crate::parser::{interpret_request, parse_file};

    fn file(name: &str) -> ParsedFile {
        parse_file(name, "Berserk", &mut NullSink).expect("should parse")
    }

    fn verdict(rules: &[TagRule], name: &str) -> TagVerdict {
        TagPolicy::new(rules, &mut NullSink).evaluate(&file(name), "Berserk")
    }

    const KEEP: TagVerdict = TagVerdict::Keep(Preference::Neutral);

    #[test]
    fn test_no_rules_keeps_everything() {
        assert_eq!(verdict(&[], "Berserk v01.zip"), KEEP);
    }

    #[test]
    fn test_only_rule() {
        let rules = [TagRule::new("Digital").filter(FilterMode::Only)];
        assert_eq!(verdict(&rules, "Berserk v01 (Digital).zip"), KEEP);
        assert!(matches!(
            verdict(&rules, "Berserk v01 (Scan).zip"),
            TagVerdict::Drop { mode: FilterMode::Only, .. }
        ));
    }

    #[test]
    fn test_exclude_rule() {
        let rules = [TagRule::new("raw").filter(FilterMode::Exclude)];
        assert!(matches!(
            verdict(&rules, "Berserk v01 [RAW].zip"),
            TagVerdict::Drop { .. }
        ));
        assert_eq!(verdict(&rules, "Berserk v01.zip"), KEEP);
    }

    #[test]
    fn test_prefer_beats_deprioritize() {
        let rules = [
            TagRule::new("A").filter(FilterMode::Prefer),
            TagRule::new("B").filter(FilterMode::Deprioritize),
        ];
        assert_eq!(
            verdict(&rules, "Berserk v01 [A][B].zip"),
            TagVerdict::Keep(Preference::Preferred)
        );
        assert_eq!(
            verdict(&rules, "Berserk v01 [B].zip"),
            TagVerdict::Keep(Preference::Deprioritized)
        );
    }

    #[test]
    fn test_case_rules() {
        let exact = [TagRule::new("Digital").case(CaseRule::Exact)];
        assert_eq!(
            verdict(&exact, "Berserk v01 (Digital).zip"),
            TagVerdict::Keep(Preference::Preferred)
        );
        assert_eq!(verdict(&exact, "Berserk v01 (digital).zip"), KEEP);

        let upper = [TagRule::new("hq").case(CaseRule::Upper)];
        assert_eq!(
            verdict(&upper, "Berserk v01 [HQ].zip"),
            TagVerdict::Keep(Preference::Preferred)
        );
        assert_eq!(verdict(&upper, "Berserk v01 [Hq].zip"), KEEP);

        let lower = [TagRule::new("HQ").case(CaseRule::Lower)];
        assert_eq!(
            verdict(&lower, "Berserk v01 [hq].zip"),
            TagVerdict::Keep(Preference::Preferred)
        );
    }

    #[test]
    fn test_title_scope() {
        let rules = [TagRule::new("Digital")
            .filter(FilterMode::Only)
            .for_title("Vagabond", None)];
        // Out of scope for Berserk, so it passes without the tag.
        assert_eq!(verdict(&rules, "Berserk v01.zip"), KEEP);

        let rules = [TagRule::new("Digital")
            .filter(FilterMode::Only)
            .for_title("BERSERK", None)];
        assert!(matches!(verdict(&rules, "Berserk v01.zip"), TagVerdict::Drop { .. }));
    }

    #[test]
    fn test_sub_request_scope() {
        let sub = interpret_request(&["Berserk", "v1-3"], &mut NullSink).unwrap();
        let rules = [TagRule::new("Digital")
            .filter(FilterMode::Only)
            .for_title("Berserk", Some(sub))];
        assert!(matches!(verdict(&rules, "Berserk v02.zip"), TagVerdict::Drop { .. }));
        assert_eq!(verdict(&rules, "Berserk v05.zip"), KEEP);
    }

    #[test]
    fn test_extension_scope() {
        let rules = [TagRule::new("Digital")
            .filter(FilterMode::Prefer)
            .extensions([".cbz"])];
        assert_eq!(verdict(&rules, "Berserk v01 (Digital).zip"), KEEP);
        assert_eq!(
            verdict(&rules, "Berserk v01 (Digital).CBZ"),
            TagVerdict::Keep(Preference::Preferred)
        );
    }

    #[test]
    fn test_only_rule_requires_listed_extension() {
        let rules = [TagRule::new("Digital")
            .filter(FilterMode::Only)
            .extensions([".cbz"])];
        for name in [
            "Berserk v01 (Digital).zip",
            "Berserk v01.zip",
            "Berserk v01.cbz",
        ] {
            assert!(
                matches!(
                    verdict(&rules, name),
                    TagVerdict::Drop { mode: FilterMode::Only, .. }
                ),
                "{name}"
            );
        }
        assert_eq!(verdict(&rules, "Berserk v01 (Digital).cbz"), KEEP);
    }

    #[test]
    fn test_only_rule_outside_title_scope_keeps() {
        let rules = [TagRule::new("Digital")
            .filter(FilterMode::Only)
            .extensions(["cbz"])
            .for_title("Akira", None)];
        assert_eq!(verdict(&rules, "Berserk v01.zip"), KEEP);
    }

    #[test]
    fn test_duplicate_rule_first_wins() {
        let rules = [
            TagRule::new("Digital").filter(FilterMode::Exclude),
            TagRule::new("digital").filter(FilterMode::Prefer),
        ];
        let mut sink = CollectingSink::new();
        let policy = TagPolicy::new(&rules, &mut sink);
        assert_eq!(policy.rules().len(), 1);
        assert!(matches!(sink.events[0], Diagnostic::DuplicateTagRule { .. }));
        assert!(matches!(
            policy.evaluate(&file("Berserk v01 (Digital).zip"), "Berserk"),
            TagVerdict::Drop { mode: FilterMode::Exclude, .. }
        ));
    }

    #[test]
    fn test_filter_mode_aliases() {
        assert_eq!("out".parse::<FilterMode>().unwrap(), FilterMode::Exclude);
        assert_eq!(
            "not prefer".parse::<FilterMode>().unwrap(),
            FilterMode::Deprioritize
        );
        assert_eq!("EXACT".parse::<CaseRule>().unwrap(), CaseRule::Exact);
        assert!("sometimes".parse::<FilterMode>().is_err());
    }
}
