//! fragnav - fragment navigation toolkit.

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use fragnav::cli::{self, Cli, Commands};
use fragnav::config::{SiteConfig, find_config_file};
use fragnav::{debug, log};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    fragnav::logger::set_verbose(cli.verbose);

    if let Commands::Init { force } = cli.command {
        return cli::init::run_init(&cli.config, force);
    }

    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Decode { input, json } => cli::decode::run_decode(input, *json, &config),
        Commands::Href { page, section } => {
            cli::decode::run_href(page, section.as_deref(), &config)
        }
        Commands::Check => cli::check::run_check(&config),
        Commands::Simulate { scenario, json } => {
            cli::simulate::run_simulate(scenario, *json, &config)
        }
        Commands::Init { .. } => Ok(()),
    }
}

/// Find and load the config; commands that can live without one get defaults.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    match find_config_file(&cli.config) {
        Some(path) => {
            debug!("config"; "using {}", path.display());
            SiteConfig::load(&path)
        }
        None if cli.requires_config() => {
            log!(
                "error";
                "Config file '{}' not found. Run 'fragnav init' to create one.",
                cli.config.display()
            );
            bail!("missing config file")
        }
        None => {
            debug!("config"; "'{}' not found, using defaults", cli.config.display());
            Ok(SiteConfig::default())
        }
    }
}
