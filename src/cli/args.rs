//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Live 3D dendrogram of permission overlap: layout, scene primitives and feed following
#[derive(Parser, Debug)]
#[command(name = "dendroview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d -d -d)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Additional config file, applied after the global one
    #[arg(long, global = true, env = "DENDROVIEW_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lay out one snapshot file and print it
    Layout {
        /// JSON snapshot
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Follow the live feed and print each new scene
    Watch {
        /// Feed URL (default: from config)
        #[arg(short, long, value_hint = ValueHint::Url)]
        endpoint: Option<String>,
    },

    /// Play a JSON-lines recording through the live pipeline
    Replay {
        /// One JSON snapshot per line
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print a generated permission snapshot
    Generate {
        /// User to include (repeatable)
        #[arg(short, long = "user", value_name = "NAME")]
        users: Vec<String>,

        /// Seed for a reproducible snapshot
        #[arg(short, long)]
        seed: Option<u64>,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template
    Template,

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored tree with positions
    Tree,
    /// Scene primitives as JSON
    Json,
}
