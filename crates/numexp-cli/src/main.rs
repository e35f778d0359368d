//! numexp - Japanese numeric expression extraction

use anyhow::Result;
use clap::{Parser, Subcommand};
use numexp_core::{Language, NormalizeNumexp};

mod commands;

#[derive(Parser)]
#[command(name = "numexp")]
#[command(version)]
#[command(about = "Extract and normalize numeric expressions in Japanese text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Language code (currently only "ja")
    #[arg(short, long, global = true, default_value = "ja")]
    language: String,

    /// Verbose output (show timings and debug info)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a piece of text (reads stdin when no argument is given)
    Text {
        /// Text to analyze
        text: Option<String>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Normalize a file, one line at a time
    File {
        /// Path to a UTF-8 text file
        path: String,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Skip lines without any expression
        #[arg(long)]
        skip_empty: bool,
    },

    /// Run a single extraction stage without cross-domain filtering
    Inspect {
        /// Text to analyze
        text: String,

        /// Stage to run (numerical, abstime, reltime, duration)
        #[arg(short, long, default_value = "numerical")]
        stage: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    let language = Language::from_code(&cli.language)?;
    let normalizer = NormalizeNumexp::new(language)?;

    match cli.command {
        Commands::Text { text, pretty } => {
            commands::text::run(&normalizer, text.as_deref(), pretty)
        }

        Commands::File {
            path,
            pretty,
            skip_empty,
        } => commands::file::run(&normalizer, &path, pretty, skip_empty),

        Commands::Inspect { text, stage } => {
            commands::inspect::run(&normalizer, &text, &stage)
        }
    }
}
