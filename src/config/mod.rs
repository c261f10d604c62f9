mod types;

pub use types::*;

use anyhow::{Context, Result};
use madodl_parser::tags::TagRule;
use madodl_parser::{interpret_request, ParsedRequest, TracingSink};
use std::collections::HashSet;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./madodl.toml",
        "~/.config/madodl/config.toml",
        "~/.madodl.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Build the matcher's tag rules from the `[[tags]]` tables.
///
/// Ranges were already checked by [`load_config`], so a failure here only
/// happens for hand-built configs.
pub fn tag_rules(config: &Config) -> Result<Vec<TagRule>> {
    config.tags.iter().map(tag_rule).collect()
}

fn tag_rule(tag: &TagConfig) -> Result<TagRule> {
    let mut rule = TagRule::new(tag.name.trim())
        .case(tag.case)
        .filter(tag.filter);

    if !tag.ext.is_empty() {
        rule = rule.extensions(&tag.ext);
    }

    for scope in &tag.titles {
        let request = scope_request(&scope.title, scope.range.as_deref())
            .with_context(|| format!("Tag '{}' has a bad range for '{}'", tag.name, scope.title))?;
        rule = rule.for_title(scope.title.trim(), request);
    }

    Ok(rule)
}

/// `None` when the scope covers the whole series.
fn scope_request(title: &str, range: Option<&str>) -> Result<Option<ParsedRequest>> {
    let Some(range) = range.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    if range.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let args: Vec<&str> = std::iter::once(title)
        .chain(range.split_whitespace())
        .collect();
    let request = interpret_request(&args, &mut TracingSink)?;
    Ok(Some(request))
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    let mut seen = HashSet::new();

    for tag in &config.tags {
        if tag.name.trim().is_empty() {
            anyhow::bail!("Tag rule has an empty name");
        }

        if !seen.insert(tag.name.trim().to_lowercase()) {
            tracing::warn!(
                "Tag '{}' is defined more than once, only the first definition is used",
                tag.name
            );
        }

        if tag.ext.iter().any(|e| e.trim_start_matches('.').trim().is_empty()) {
            anyhow::bail!("Tag '{}' lists an empty extension", tag.name);
        }

        for scope in &tag.titles {
            if scope.title.trim().is_empty() {
                anyhow::bail!("Tag '{}' is scoped to an empty title", tag.name);
            }
        }

        tag_rule(tag)?;
    }

    if config.usecache {
        let path = config.cache_path();
        if !path.exists() {
            tracing::warn!("Cache file does not exist: {:?}", path);
        }
    }

    Ok(())
}
