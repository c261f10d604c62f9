//! Plain-text rendering of selections and parsed filenames.

use crate::batch::SeriesOutcome;
use madodl_parser::tags::Preference;
use madodl_parser::ParsedFile;
use std::fmt::Write;

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_outcome(outcome: &SeriesOutcome) -> String {
    let mut out = String::new();
    let result = &outcome.result;
    let _ = writeln!(out, "{}", outcome.request);

    if let Some(archive) = &result.complete_archive {
        let _ = writeln!(out, "  complete archive: {}", archive);
        return out;
    }

    if result.selected.is_empty() {
        let _ = writeln!(out, "  nothing matched");
    }
    for file in &result.selected {
        let mut line = format!("  {}", file.name);
        if !file.volumes.is_empty() {
            let _ = write!(line, "  vol {}", join(&file.volumes));
        }
        if !file.chapters.is_empty() {
            let _ = write!(line, "  chp {}", join(&file.chapters));
        }
        match file.preference {
            Preference::Preferred => line.push_str("  (preferred)"),
            Preference::Deprioritized => line.push_str("  (deprioritized)"),
            Preference::Neutral => {}
        }
        let _ = writeln!(out, "{}", line);
    }

    if !result.missing_volumes.is_empty() {
        let _ = writeln!(out, "  missing volumes: {}", join(&result.missing_volumes));
    }
    if !result.missing_chapters.is_empty() {
        let _ = writeln!(out, "  missing chapters: {}", join(&result.missing_chapters));
    }
    out
}

pub fn render_file(file: &ParsedFile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File: {}", file.name);
    let _ = writeln!(out, "  Title: {}", file.title_fragment);
    let _ = writeln!(out, "  Volumes: {}", file.volumes);
    let _ = writeln!(out, "  Chapters: {}", file.chapters);
    if !file.tags.is_empty() {
        let _ = writeln!(out, "  Tags: {}", file.tags.join(", "));
    }
    if let Some(special) = file.special {
        let _ = writeln!(out, "  Special: {}", special);
    }
    if file.is_complete_archive {
        let _ = writeln!(out, "  Complete archive");
    }
    let _ = writeln!(out, "  Extension: {}", file.extension);
    for c in &file.corrections {
        let _ = writeln!(
            out,
            "  Corrected token {}: {} -> {}",
            c.index, c.original, c.corrected
        );
    }
    out
}
