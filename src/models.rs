use clap::{Parser, Subcommand};
use serde::Deserialize;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Install the release asset that best matches this machine
    Install {
        /// GitHub repository in format "owner/repo"
        repo: String,
        /// Optional tag to install a specific release (defaults to latest)
        #[arg(short, long)]
        tag: Option<String>,
        /// Directory to download into (defaults to the configured download dir)
        #[arg(short, long)]
        dir: Option<String>,
        /// Optional directory to extract plain archives to
        #[arg(short = 'u', long = "unzip-to")]
        unzip_to: Option<String>,
        /// Optional glob pattern for files to extract from archives (extracts all if not specified)
        #[arg(short = 'f', long = "files")]
        files: Option<String>,
        /// Optional path to a TOML config file
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Show which asset would be installed, without downloading anything
    Select {
        /// GitHub repository in format "owner/repo"
        repo: String,
        /// Optional tag to inspect a specific release (defaults to latest)
        #[arg(short, long)]
        tag: Option<String>,
        /// Optional path to a TOML config file
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Show what this machine looks like to the selection strategy
    Detect {
        /// Optional path to a TOML config file
        #[arg(short, long)]
        config: Option<String>,
    },
}

/// GitHub release information
#[derive(Debug, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    pub name: String,
    pub assets: Vec<GitHubAsset>,
}

/// GitHub release asset information
#[derive(Debug, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}
