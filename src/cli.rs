// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Most settings live in the JSON config file; the flags here only override
// the handful you typically want to change per run.
// =============================================================================

use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version = "0.1.0",
    about = "Crawl a website and report broken links",
    long_about = "link-crawler starts from a seed URL, follows internal links up to a maximum depth, \
                  checks every link it finds and writes an HTML report of working, broken and failed links."
)]
pub struct Cli {
    /// Show debug output (RUST_LOG still wins if set)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and check every link
    ///
    /// Example: link-crawler crawl --config config/config.json --max-depth 3
    Crawl {
        #[command(flatten)]
        config: ConfigArgs,

        /// Override the seed URL from the config file
        #[arg(long)]
        start_url: Option<String>,

        /// Override the maximum crawl depth (0 = seed page only)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Override where the HTML report is written
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also check links pointing to other sites
        #[arg(long)]
        check_external: bool,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Load and validate the config file, then print it
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to the JSON config file
    #[arg(long, default_value = "config/config.json")]
    pub config: PathBuf,
}

/// Flags that override values from the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub start_url: Option<String>,
    pub max_depth: Option<usize>,
    pub output: Option<PathBuf>,
    pub check_external: bool,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(start_url) = self.start_url {
            config.start_url = start_url;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(output) = self.output {
            config.output_file = output;
        }
        // A flag can only turn this on; the config file decides otherwise
        if self.check_external {
            config.check_external_links = true;
        }
    }
}
