//! Template overlay CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "template-overlay")]
#[command(version)]
#[command(about = "Dim the parts of a document that still match its template", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the language server over stdio
    Lsp,

    /// Print the ranges of a document that are unchanged template content
    Ranges {
        /// Template file
        #[arg(short = 't', long)]
        template: PathBuf,

        /// Document file
        document: PathBuf,

        /// Print the ranges as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Stdout carries the LSP stream, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "template_overlay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lsp => commands::lsp::execute(),
        Commands::Ranges {
            template,
            document,
            json,
        } => commands::ranges::execute(&template, &document, json),
    }
}
