//! Listing providers: where the filenames of a series come from.
//!
//! Series live under their New World Order path, `B/BE/BERS/Berserk`. Both
//! providers try that path first and then fall back to a case-insensitive
//! search for a directory named after the series.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files of one series, in a stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Directory name as found, which may differ in case from the request.
    pub title: String,
    pub files: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("Series not found: {0}")]
    NotFound(String),

    #[error("Listing root does not exist: {0:?}")]
    MissingRoot(PathBuf),

    #[error("Snapshot has no root directory: {0:?}")]
    EmptySnapshot(PathBuf),
}

pub trait ListingProvider {
    fn listing(&self, series: &str) -> Result<Listing>;
}

/// The three NWO directory levels for `name`: first letter, first two
/// letters, first four letters, all uppercase. A leading article is
/// dropped.
pub fn nwo_components(name: &str) -> Option<[String; 3]> {
    let name = name.trim();
    let lower = name.to_lowercase();
    let stripped = ["the ", "an ", "a "]
        .iter()
        .find(|article| lower.starts_with(*article))
        .map_or(name, |article| &name[article.len()..]);

    let chars: Vec<char> = stripped.to_uppercase().chars().take(4).collect();
    let first = chars.first()?;
    Some([
        first.to_string(),
        chars.iter().take(2).collect(),
        chars.iter().collect(),
    ])
}

/// `nwo_components` joined into a relative path.
pub fn nwo_path(name: &str) -> Option<PathBuf> {
    let [a, b, c] = nwo_components(name)?;
    Some([a, b, c].iter().collect())
}

fn same_title(candidate: &str, series: &str) -> bool {
    candidate.to_lowercase() == series.trim().to_lowercase()
}

/// A local mirror of the archive tree.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn find_series_dir(&self, series: &str) -> Option<PathBuf> {
        if let Some(nwo) = nwo_path(series) {
            let parent = self.root.join(nwo);
            if let Ok(entries) = std::fs::read_dir(&parent) {
                let mut dirs: Vec<PathBuf> = entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_dir())
                    .collect();
                dirs.sort();
                if let Some(found) = dirs.into_iter().find(|p| {
                    p.file_name()
                        .is_some_and(|n| same_title(&n.to_string_lossy(), series))
                }) {
                    return Some(found);
                }
            }
        }

        tracing::debug!("{} not under its NWO path, searching {:?}", series, self.root);
        WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| e.file_type().is_dir() && same_title(&e.file_name().to_string_lossy(), series))
            .map(|e| e.into_path())
    }
}

impl ListingProvider for DirectoryProvider {
    fn listing(&self, series: &str) -> Result<Listing> {
        if !self.root.is_dir() {
            return Err(ListingError::MissingRoot(self.root.clone()).into());
        }

        let dir = self
            .find_series_dir(series)
            .ok_or_else(|| ListingError::NotFound(series.to_string()))?;

        let title = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| series.to_string());

        let files = WalkDir::new(&dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();

        Ok(Listing { title, files })
    }
}

/// One node of a JSON directory tree, as written by `tree -J`.
#[derive(Debug, Clone, Deserialize)]
struct Node {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    contents: Vec<Node>,
}

impl Node {
    fn is_dir(&self) -> bool {
        self.kind == "directory"
    }

    fn child_dir(&self, name: &str) -> Option<&Node> {
        self.contents.iter().find(|n| n.is_dir() && n.name == name)
    }

    /// Depth-first, document order.
    fn find_dir(&self, series: &str) -> Option<&Node> {
        for child in self.contents.iter().filter(|n| n.is_dir()) {
            if same_title(&child.name, series) {
                return Some(child);
            }
            if let Some(found) = child.find_dir(series) {
                return Some(found);
            }
        }
        None
    }

    fn collect_files(&self, out: &mut Vec<String>) {
        for child in &self.contents {
            match child.kind.as_str() {
                "file" => out.push(child.name.clone()),
                "directory" => child.collect_files(out),
                _ => {}
            }
        }
    }
}

/// A cached JSON snapshot of the archive tree.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    path: PathBuf,
}

impl SnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Node> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot: {:?}", self.path))?;
        let nodes: Vec<Node> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {:?}", self.path))?;

        nodes
            .into_iter()
            .find(Node::is_dir)
            .ok_or_else(|| ListingError::EmptySnapshot(self.path.clone()).into())
    }
}

impl ListingProvider for SnapshotProvider {
    fn listing(&self, series: &str) -> Result<Listing> {
        let root = self.load()?;
        let base = root.child_dir("Manga").unwrap_or(&root);

        let by_nwo = nwo_components(series).and_then(|[a, b, c]| {
            base.child_dir(&a)?
                .child_dir(&b)?
                .child_dir(&c)?
                .contents
                .iter()
                .find(|n| n.is_dir() && same_title(&n.name, series))
        });

        let dir = match by_nwo {
            Some(dir) => dir,
            None => {
                tracing::debug!("{} not under its NWO path in the snapshot", series);
                base.find_dir(series)
                    .ok_or_else(|| ListingError::NotFound(series.to_string()))?
            }
        };

        let mut files = Vec::new();
        dir.collect_files(&mut files);
        Ok(Listing {
            title: dir.name.clone(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nwo_components() {
        assert_eq!(
            nwo_components("Berserk"),
            Some(["B".into(), "BE".into(), "BERS".into()])
        );
        assert_eq!(
            nwo_components("The Breaker"),
            Some(["B".into(), "BR".into(), "BREA".into()])
        );
        assert_eq!(
            nwo_components("an Ant"),
            Some(["A".into(), "AN".into(), "ANT".into()])
        );
        assert_eq!(nwo_components("Xy"), Some(["X".into(), "XY".into(), "XY".into()]));
        assert_eq!(nwo_components("   "), None);
    }

    #[test]
    fn test_nwo_keeps_article_without_space() {
        assert_eq!(
            nwo_components("Akira"),
            Some(["A".into(), "AK".into(), "AKIR".into()])
        );
    }

    #[test]
    fn test_nwo_path() {
        assert_eq!(nwo_path("Berserk"), Some(PathBuf::from("B/BE/BERS")));
    }

    #[test]
    fn test_node_file_order() {
        let root: Node = serde_json::from_str(
            r#"{"type":"directory","name":"x","contents":[
                {"type":"file","name":"b.zip"},
                {"type":"directory","name":"sub","contents":[{"type":"file","name":"a.zip"}]},
                {"type":"link","name":"skip"}
            ]}"#,
        )
        .unwrap();
        let mut files = Vec::new();
        root.collect_files(&mut files);
        assert_eq!(files, vec!["b.zip", "a.zip"]);
    }
}
