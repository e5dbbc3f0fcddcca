//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// feedforge: render RSS and Atom feeds from item files
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: feeds.toml)
    #[arg(short = 'C', long, global = true, default_value = "feeds.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List configured feeds
    #[command(visible_alias = "l")]
    List,

    /// Render one feed
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Render every feed that has an item source
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Feed name as configured under `[feeds.<name>]`
    pub name: String,

    /// URL the feed is served from (written to the self link)
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub url: String,

    /// Item file (TOML or JSON), overrides the feed's `items` setting
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub items: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Omit indentation
    #[arg(long)]
    pub compact: bool,
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Base URL the output directory is served from
    #[arg(short = 'U', long = "base-url", default_value = "http://localhost", value_hint = clap::ValueHint::Url)]
    pub base_url: String,

    /// Output directory (relative to the current directory)
    #[arg(short, long, default_value = "public", value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,

    /// Omit indentation
    #[arg(long)]
    pub compact: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        let cli = Cli::parse_from([
            "feedforge",
            "-C",
            "site/feeds.toml",
            "render",
            "blog",
            "--url",
            "http://x.test/feed.rss",
            "--compact",
        ]);

        assert_eq!(cli.config, PathBuf::from("site/feeds.toml"));
        let Commands::Render { args } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.name, "blog");
        assert_eq!(args.url, "http://x.test/feed.rss");
        assert!(args.compact);
        assert!(args.items.is_none());
    }

    #[test]
    fn test_build_defaults() {
        let cli = Cli::parse_from(["feedforge", "build", "--verbose"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("feeds.toml"));
        let Commands::Build { args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.base_url, "http://localhost");
        assert_eq!(args.output, PathBuf::from("public"));
    }

    #[test]
    fn test_render_requires_url() {
        assert!(Cli::try_parse_from(["feedforge", "render", "blog"]).is_err());
    }
}
