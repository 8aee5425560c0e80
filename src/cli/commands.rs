//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: answer a query with a scripted oracle
//! - tools: list the registered tools
//! - parse: check one oracle reply against the reply contract
//! - prompt: print the rendered system prompt

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reactloop - a tool-augmented reasoning loop
#[derive(Parser, Debug)]
#[command(name = "reactloop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a query, replaying oracle replies from a script
    Run {
        /// The user query
        query: String,

        /// YAML file holding a list of oracle replies
        #[arg(short, long)]
        script: PathBuf,

        /// Override the configured step budget
        #[arg(short = 'm', long)]
        max_steps: Option<usize>,

        /// Override the number of tolerated consecutive malformed replies
        #[arg(short = 'r', long)]
        parse_retries: Option<u32>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available tools
    Tools,

    /// Parse a single oracle reply
    Parse {
        /// Reply text (reads --file when omitted)
        text: Option<String>,

        /// Read the reply from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Print the rendered system prompt
    Prompt {
        /// Override the configured step budget
        #[arg(short = 'm', long)]
        max_steps: Option<usize>,
    },
}
