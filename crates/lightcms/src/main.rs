//! lightcms CLI - lightweight article engine.
//!
//! Provides commands for:
//! - `list`: List articles, newest first, optionally grouped by a tag
//! - `show`: Render one article, optionally through a template

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ListArgs, ShowArgs, StoreArgs};
use output::Output;

/// lightcms - render outline documents to HTML articles.
#[derive(Parser)]
#[command(name = "lightcms", version, about)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List articles.
    List(ListArgs),
    /// Render a single article.
    Show(ShowArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.store.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::List(args) => args.execute(&cli.store, &output),
        Commands::Show(args) => args.execute(&cli.store, &output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
