//! feedforge - render RSS and Atom feeds from configured definitions.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use feedforge::{feed::FeedRegistry, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let registry = FeedRegistry::from_path(&cli.config)?;

    match &cli.command {
        Commands::List => cli::list_feeds(&registry),
        Commands::Render { args } => cli::render::render_one(&registry, args),
        Commands::Build { args } => cli::build::build_all(&registry, args).map(|_| ()),
    }
}
