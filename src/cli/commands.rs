//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vzaar video hosting command-line client
#[derive(Parser, Debug)]
#[command(name = "vzaar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML); VZAAR_* environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with videos
    Videos {
        #[command(subcommand)]
        command: VideoCommands,
    },

    /// Show the quota reported by the API
    RateLimit,
}

/// Video subcommands
#[derive(Subcommand, Debug)]
pub enum VideoCommands {
    /// List videos
    List {
        /// Page to start from
        #[arg(long)]
        page: Option<u32>,

        /// Videos per page
        #[arg(long)]
        per_page: Option<u32>,

        /// Free-text search
        #[arg(short, long)]
        query: Option<String>,

        /// Follow next links through every page
        #[arg(long)]
        all: bool,

        /// Stop after this many videos
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one video
    Get {
        /// Video id
        id: u64,
    },

    /// Change a video's title, description or privacy
    Update {
        /// Video id
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        private: Option<bool>,
    },

    /// Delete a video
    Delete {
        /// Video id
        id: u64,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Human-readable output
    Pretty,
}
