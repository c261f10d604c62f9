use madodl_parser::tags::{CaseRule, FilterMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub loglevel: Option<LogLevel>,

    /// Read listings from the cached JSON tree instead of a mirror directory.
    #[serde(default)]
    pub usecache: bool,

    #[serde(default)]
    pub cachefile: Option<PathBuf>,

    #[serde(default)]
    pub tags: Vec<TagConfig>,
}

impl Config {
    /// Snapshot location, tilde-expanded. Falls back to
    /// `~/.cache/madodl/files.json`.
    pub fn cache_path(&self) -> PathBuf {
        match &self.cachefile {
            Some(path) => PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref()),
            None => PathBuf::from(shellexpand::tilde(DEFAULT_CACHE_FILE).as_ref()),
        }
    }
}

pub const DEFAULT_CACHE_FILE: &str = "~/.cache/madodl/files.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbose,
    Debug,
    All,
}

impl LogLevel {
    /// Level name understood by `tracing_subscriber::EnvFilter`.
    pub fn filter_directive(self) -> &'static str {
        match self {
            LogLevel::Verbose => "info",
            LogLevel::Debug | LogLevel::All => "debug",
        }
    }
}

/// A `[[tags]]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TagConfig {
    pub name: String,

    #[serde(default)]
    pub case: CaseRule,

    #[serde(default)]
    pub filter: FilterMode,

    /// Extensions the rule is limited to (empty = any).
    #[serde(default)]
    pub ext: Vec<String>,

    /// Series the rule is limited to (empty = all).
    #[serde(default, rename = "for")]
    pub titles: Vec<TitleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TitleConfig {
    pub title: String,

    /// Request expression such as `"v1-3 c5"`. Omitted or `"all"` covers
    /// the whole series.
    #[serde(default)]
    pub range: Option<String>,
}
