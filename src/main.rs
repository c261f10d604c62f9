mod cli;

use madodl::{
    batch, config,
    listing::{DirectoryProvider, ListingProvider, SnapshotProvider},
    report,
};
use madodl_parser::{parse_file, TracingSink};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("madodl {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let config = config::load_config_or_default(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&cli, &config))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Select {
            series,
            exprs,
            dir,
            snapshot,
            json,
        } => select(&config, series, exprs, dir, snapshot, json),
        Commands::Parse {
            filenames,
            title,
            json,
        } => parse(&filenames, &title, json),
        Commands::Validate => validate(cli.config.is_some(), &config),
        Commands::Version => Ok(ExitCode::SUCCESS),
    }
}

/// Respect RUST_LOG if set, otherwise the command-line flags, then the
/// config file's `loglevel`.
fn log_filter(cli: &Cli, config: &config::Config) -> String {
    if let Ok(filter) = std::env::var("RUST_LOG") {
        return filter;
    }

    let level = if cli.silent {
        "off"
    } else if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        config.loglevel.map_or("warn", |l| l.filter_directive())
    };
    format!("madodl={level},madodl_parser={level}")
}

fn select(
    config: &config::Config,
    series: String,
    exprs: Vec<String>,
    dir: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let provider: Box<dyn ListingProvider> = match (dir, snapshot) {
        (Some(dir), _) => Box::new(DirectoryProvider::new(dir)),
        (None, Some(path)) => Box::new(SnapshotProvider::new(path)),
        (None, None) if config.usecache => Box::new(SnapshotProvider::new(config.cache_path())),
        (None, None) => {
            anyhow::bail!("No listing source: pass --dir or --snapshot, or set usecache in the config")
        }
    };

    let rules = config::tag_rules(config)?;
    let request: Vec<String> = std::iter::once(series).chain(exprs).collect();
    let outcomes = batch::select_batch(&[request], provider.as_ref(), &rules, &mut TracingSink)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            print!("{}", report::render_outcome(outcome));
        }
    }

    if outcomes.iter().all(|o| o.result.is_empty()) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn parse(filenames: &[String], title: &str, json: bool) -> Result<ExitCode> {
    let mut parsed = Vec::with_capacity(filenames.len());
    let mut failed = false;

    for name in filenames {
        match parse_file(name, title, &mut TracingSink) {
            Ok(file) => parsed.push(file),
            Err(e) => {
                eprintln!("{}", e);
                failed = true;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        for file in &parsed {
            print!("{}", report::render_file(file));
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn validate(explicit: bool, config: &config::Config) -> Result<ExitCode> {
    if !explicit {
        println!("No config file specified, checked the default locations");
    }
    let rules = config::tag_rules(config)?;

    println!("✓ Configuration is valid");
    println!("  Tag rules: {}", rules.len());
    for rule in &rules {
        let scope = if rule.titles.is_empty() {
            "all titles".to_string()
        } else {
            rule.titles
                .iter()
                .map(|t| t.title.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("    {} ({}, {})", rule.name, rule.filter, scope);
    }
    if config.usecache {
        println!("  Cache: {}", config.cache_path().display());
    } else {
        println!("  Cache: disabled");
    }

    Ok(ExitCode::SUCCESS)
}
