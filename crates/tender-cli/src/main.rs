//! Tender CLI - Merge AI tender analyses
//!
//! Usage:
//!   tender merge upload.json              Merge all analyses of a batch upload
//!   tender parse response.txt             Extract a record from model output
//!   tender sentinels --check "не вказано" Test a value against sentinel patterns
//!   tender templates                      List document templates
//!   tender template-request -t NAME FILE  Build a template generation request

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let sentinels = cli.sentinels.as_deref();

    match cli.command {
        Commands::Merge {
            files,
            output,
            compact,
        } => commands::cmd_merge(&files, sentinels, output.as_deref(), compact),
        Commands::Parse { file, source } => commands::cmd_parse(&file, source.as_deref()),
        Commands::Sentinels { check } => commands::cmd_sentinels(sentinels, check.as_deref()),
        Commands::Templates => commands::cmd_templates(),
        Commands::TemplateRequest {
            template,
            result,
            output,
        } => commands::cmd_template_request(&template, &result, sentinels, output.as_deref()),
    }
}
