//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Fragment navigation toolkit: inspect addresses, check site config, replay scenarios
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "fragnav.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Decode a fragment or URL into page + section
    #[command(visible_alias = "d")]
    Decode {
        /// Fragment (`#/page#section`), address (`/page#section`) or full URL
        input: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the anchor href for a page and optional section
    Href {
        /// Page path (leading `/` optional)
        page: String,

        /// Section id
        section: Option<String>,
    },

    /// Validate the config and list pages with their sections
    #[command(visible_alias = "c")]
    Check,

    /// Write a starter config file
    #[command(visible_alias = "i")]
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Replay a navigation scenario against the in-memory browser
    #[command(visible_alias = "s")]
    Simulate {
        /// Scenario file (TOML)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        scenario: PathBuf,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    /// Commands that cannot run without a config file.
    pub const fn requires_config(&self) -> bool {
        matches!(self.command, Commands::Check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fragnav", "decode", "#/a#b", "--json", "-v", "-C", "site.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(matches!(
            cli.command,
            Commands::Decode { ref input, json: true } if input == "#/a#b"
        ));
    }

    #[test]
    fn test_parse_href_optional_section() {
        let cli = Cli::try_parse_from(["fragnav", "href", "/leistungen"]).unwrap();
        assert!(matches!(cli.command, Commands::Href { section: None, .. }));
        assert!(!cli.requires_config());

        let cli = Cli::try_parse_from(["fragnav", "c"]).unwrap();
        assert!(cli.requires_config());
        assert!(!cli.is_init());
    }
}
