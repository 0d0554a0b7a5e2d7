//! Command-line argument parsing for ParentBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// ParentBuddy - answers for new parents from a local knowledge base
#[derive(Parser, Debug)]
#[command(name = "parentbuddy")]
#[command(version)]
#[command(about = "Answer new-parent questions about milestones, feeding and sleep", long_about = None)]
pub struct Args {
    /// Configuration file path (default: ~/.parentbuddy/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge base JSON file
    #[arg(short, long, global = true)]
    pub knowledge: Option<PathBuf>,

    /// Number of entries used to answer a question
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub top_k: Option<u16>,

    /// Ollama model used to answer questions
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Ollama host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Ollama port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Verbosity level: -v (info logs), -vv (debug logs)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start interactive mode (default)
    Start,

    /// Answer a single question and exit
    Ask {
        /// The question, quoted or as separate words
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Print the developmental milestones for an age in months
    Milestones {
        /// A question mentioning an age, e.g. "6 months"
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// List knowledge base entries
    Entries {
        /// Show nodes skipped while loading instead
        #[arg(long)]
        skipped: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Show at most this many
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand, defaulting to interactive mode
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }

    /// Apply command-line overrides on top of file configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.knowledge {
            config.knowledge.path = path.to_string_lossy().into_owned();
        }
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = usize::from(top_k);
        }
        if let Some(model) = &self.model {
            config.qa.model = model.clone();
        }
        if let Some(host) = &self.host {
            config.qa.host = host.clone();
        }
        if let Some(port) = self.port {
            config.qa.port = port;
        }
    }
}

impl Commands {
    /// Question words joined back into one string
    pub fn question(&self) -> Option<String> {
        match self {
            Commands::Ask { question } | Commands::Milestones { question } => Some(question.join(" ")),
            _ => None,
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default log filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show retrieved sources with answers
    pub fn show_sources(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
