//! Listing matcher tests.

use madodl_parser::tags::{FilterMode, Preference, TagRule};
use madodl_parser::{
    interpret_request, match_listing, tokenize, CollectingSink, Diagnostic, Error, MatchResult,
    NullSink,
};

fn run(args: &[&str], listing: &[String], rules: &[TagRule]) -> MatchResult {
    let request = interpret_request(args, &mut NullSink).expect("valid request");
    match_listing(&request, args[0], listing, rules, &mut NullSink).expect("valid listing")
}

fn volume_listing(title: &str, range: std::ops::RangeInclusive<u32>) -> Vec<String> {
    range.map(|n| format!("{title} vol{n:02}.zip")).collect()
}

fn names(result: &MatchResult) -> Vec<&str> {
    result.selected.iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn volume_range_selects_exactly_the_range() {
    let listing = volume_listing("Berserk", 1..=10);
    for (n, m) in [(1, 3), (4, 4), (2, 9)] {
        let expr = format!("v{n}-{m}");
        let result = run(&["Berserk", &expr], &listing, &[]);
        let expected: Vec<f64> = (n..=m).map(f64::from).collect();
        assert_eq!(result.matched_volumes, expected, "{expr}");
        assert_eq!(result.selected.len(), expected.len(), "{expr}");
        assert!(result.missing_volumes.is_empty());
    }
}

#[test]
fn open_ended_request_selects_tail() {
    let listing = volume_listing("Berserk", 1..=10);
    let result = run(&["Berserk", "v5-"], &listing, &[]);
    assert_eq!(result.matched_volumes, vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    assert!(result.missing_volumes.is_empty());
}

#[test]
fn preferred_duplicate_wins() {
    let rules = [TagRule::new("Digital").filter(FilterMode::Prefer)];
    let listing = vec![
        "Berserk v03.zip".to_string(),
        "Berserk v03 (Digital).zip".to_string(),
    ];
    let result = run(&["Berserk", "v3"], &listing, &rules);
    assert_eq!(names(&result), vec!["Berserk v03 (Digital).zip"]);
    assert_eq!(result.selected[0].volumes, vec![3.0]);
    assert_eq!(result.selected[0].preference, Preference::Preferred);

    // Order does not matter when the preferred file comes first.
    let reversed: Vec<String> = listing.into_iter().rev().collect();
    let result = run(&["Berserk", "v3"], &reversed, &rules);
    assert_eq!(names(&result), vec!["Berserk v03 (Digital).zip"]);
}

#[test]
fn later_release_replaces_deprioritized() {
    let rules = [TagRule::new("Raw").filter(FilterMode::Deprioritize)];
    let listing = vec![
        "Berserk v03 [Raw].zip".to_string(),
        "Berserk v03.zip".to_string(),
    ];
    let mut sink = CollectingSink::new();
    let request = interpret_request(&["Berserk", "v3"], &mut NullSink).unwrap();
    let result = match_listing(&request, "Berserk", &listing, &rules, &mut sink).unwrap();
    assert_eq!(names(&result), vec!["Berserk v03.zip"]);
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, Diagnostic::Replaced { .. })));
}

#[test]
fn deprioritized_never_displaces_neutral() {
    let rules = [TagRule::new("Raw").filter(FilterMode::Deprioritize)];
    let listing = vec![
        "Berserk v03.zip".to_string(),
        "Berserk v03 [Raw].zip".to_string(),
    ];
    let result = run(&["Berserk", "v3"], &listing, &rules);
    assert_eq!(names(&result), vec!["Berserk v03.zip"]);
}

#[test]
fn preferred_evicts_only_overlapping_values() {
    let rules = [TagRule::new("HQ").filter(FilterMode::Prefer)];
    let listing = vec![
        "Series c001-003.zip".to_string(),
        "Series c003 [HQ].zip".to_string(),
    ];
    let result = run(&["Series", "c1-3"], &listing, &rules);
    assert_eq!(result.selected.len(), 2);
    assert_eq!(result.selected[0].chapters, vec![1.0, 2.0]);
    assert_eq!(result.selected[1].chapters, vec![3.0]);
    assert_eq!(result.matched_chapters, vec![1.0, 2.0, 3.0]);
}

#[test]
fn complete_archive_short_circuits_all_request() {
    let listing = vec![
        "Berserk v01.zip".to_string(),
        "Berserk v02.zip".to_string(),
        "Berserk (Complete).zip".to_string(),
        "Berserk v03.zip".to_string(),
    ];
    let result = run(&["Berserk", "all"], &listing, &[]);
    assert_eq!(result.complete_archive.as_deref(), Some("Berserk (Complete).zip"));
    assert!(result.selected.is_empty());
    assert!(result.matched_volumes.is_empty());
}

#[test]
fn sole_unnumbered_file_is_complete() {
    let listing = vec!["Series.zip".to_string()];
    let mut sink = CollectingSink::new();
    let request = interpret_request(&["Series"], &mut NullSink).unwrap();
    let result = match_listing(&request, "Series", &listing, &[], &mut sink).unwrap();
    assert_eq!(result.complete_archive.as_deref(), Some("Series.zip"));
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, Diagnostic::ImplicitCompleteArchive { .. })));
}

#[test]
fn unnumbered_file_among_others_is_not_complete() {
    let listing = vec!["Series.zip".to_string(), "Series v01.zip".to_string()];
    let result = run(&["Series"], &listing, &[]);
    assert!(result.complete_archive.is_none());
    assert_eq!(names(&result), vec!["Series v01.zip"]);
}

#[test]
fn missing_extension_aborts_match() {
    assert!(matches!(
        tokenize("Series Vol 1"),
        Err(Error::MalformedInput { .. })
    ));

    let listing = vec!["Series v01.zip".to_string(), "Series Vol 2".to_string()];
    let request = interpret_request(&["Series", "v1-2"], &mut NullSink).unwrap();
    let err = match_listing(&request, "Series", &listing, &[], &mut NullSink).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn bad_request_character_is_request_error() {
    let err = interpret_request(&["Series", "v1@3"], &mut NullSink).unwrap_err();
    assert!(matches!(err, Error::Request { .. }));
    assert!(!err.is_fatal());
}

#[test]
fn only_rule_filters_listing() {
    let rules = [TagRule::new("Digital").filter(FilterMode::Only)];
    let listing = vec![
        "Berserk v01 (Scan).zip".to_string(),
        "Berserk v01 (Digital).zip".to_string(),
        "Berserk v02 (Scan).zip".to_string(),
    ];
    let result = run(&["Berserk", "v1-2"], &listing, &rules);
    assert_eq!(names(&result), vec!["Berserk v01 (Digital).zip"]);
    assert_eq!(result.missing_volumes, vec![2.0]);
}

#[test]
fn fractional_range_filename_matches() {
    let listing = vec!["Series vol1.5-3.zip".to_string()];
    let result = run(&["Series", "v1.5-3"], &listing, &[]);
    assert_eq!(result.matched_volumes, vec![1.5, 2.0, 3.0]);
}

#[test]
fn seven_zip_archives_match() {
    let listing = vec![
        "Berserk v01.7z".to_string(),
        "Berserk v02.7z".to_string(),
        "Berserk c010.7z".to_string(),
    ];
    let result = run(&["Berserk", "v1-2", "c10"], &listing, &[]);
    assert_eq!(
        names(&result),
        vec!["Berserk v01.7z", "Berserk v02.7z", "Berserk c010.7z"]
    );
    assert_eq!(result.matched_volumes, vec![1.0, 2.0]);
    assert_eq!(result.matched_chapters, vec![10.0]);
}

#[test]
fn only_rule_drops_unlisted_extension() {
    let rules = [TagRule::new("Digital")
        .filter(FilterMode::Only)
        .extensions(["cbz"])];
    let listing = vec![
        "Berserk v01 (Digital).zip".to_string(),
        "Berserk v01.cbz".to_string(),
        "Berserk v02 (Digital).cbz".to_string(),
    ];
    let result = run(&["Berserk", "v1-2"], &listing, &rules);
    assert_eq!(names(&result), vec!["Berserk v02 (Digital).cbz"]);
    assert_eq!(result.missing_volumes, vec![1.0]);
}
