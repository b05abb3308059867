//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tender - Reconcile AI tender analyses into one record
#[derive(Parser)]
#[command(name = "tender")]
#[command(about = "Merge per-document tender analyses and prepare template requests", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Sentinel pattern config (TOML)
    ///
    /// Defaults to ~/.local/share/tender/config/sentinels.toml when present,
    /// otherwise the built-in Ukrainian "не вказано" pattern.
    #[arg(long, global = true)]
    pub sentinels: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge analyses from one or more upload responses
    Merge {
        /// Upload response files ({"files": [...]}, a list of results, or one result)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write the merged result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Extract an analysis record from raw model output
    Parse {
        /// File containing the model response text
        file: PathBuf,

        /// Source name to attach (defaults to the file name)
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Show active sentinel patterns
    Sentinels {
        /// Check whether a value counts as "not specified"
        #[arg(long)]
        check: Option<String>,
    },

    /// List available document templates
    Templates,

    /// Build a template generation request from a stored result
    TemplateRequest {
        /// Template name (see `tender templates`)
        #[arg(short, long)]
        template: String,

        /// Stored result (merged object or raw list of results)
        result: PathBuf,

        /// Write the request body to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
