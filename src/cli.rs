use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "madodl")]
#[command(author, version, about = "Pick manga archives to download by volume and chapter")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress (info level)
    #[arg(short, long, global = true, conflicts_with_all = ["debug", "silent"])]
    pub verbose: bool,

    /// Log everything, including parser diagnostics
    #[arg(short, long, global = true, conflicts_with = "silent")]
    pub debug: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select the files of a series that satisfy a request
    Select {
        /// Series title
        #[arg(required = true)]
        series: String,

        /// Request expressions such as `v1-3`, `c5,7,9-` or `all`
        exprs: Vec<String>,

        /// Local mirror of the archive tree
        #[arg(long, conflicts_with = "snapshot")]
        dir: Option<PathBuf>,

        /// JSON snapshot of the archive tree (defaults to the cache file
        /// when `usecache` is set)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse filenames and show what was read from them
    Parse {
        /// Filenames to parse
        #[arg(required = true)]
        filenames: Vec<String>,

        /// Series title, used to spot title commentary in brackets
        #[arg(long, default_value = "")]
        title: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate,

    /// Display version information
    Version,
}
