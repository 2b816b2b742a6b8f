//! Groupie CLI - artist detail renderer.
//!
//! Provides commands for:
//! - `show`: Fetch an artist from the API and print its detail view
//! - `render`: Render an artist JSON document from a file or stdin
//! - `strings`: Print the UI strings of a language

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, ShowArgs, StringsArgs};
use output::Output;

/// Groupie - artist detail renderer.
#[derive(Parser)]
#[command(name = "groupie", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an artist by id and print its detail view.
    Show(ShowArgs),
    /// Render an artist JSON document from a file (or `-` for stdin).
    Render(RenderArgs),
    /// Print every UI string of the selected language as JSON.
    Strings(StringsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Show(args) => args.view.verbose,
        Commands::Render(args) => args.view.verbose,
        Commands::Strings(_) => false,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = match cli.command {
        Commands::Show(args) => rt.block_on(args.execute()),
        Commands::Render(args) => rt.block_on(args.execute()),
        Commands::Strings(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
