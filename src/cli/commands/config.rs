use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show the effective configuration, environment overrides included
    Show,
    /// Print where the config file lives
    Path,
}

pub fn config_command(args: ConfigCommands, config: &Config) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => {
            let rendered = toml::to_string_pretty(config).context("Failed to render config")?;
            println!("{}", format!("# {}", Config::get_config_path()?.display()).dimmed());
            println!("{}", rendered.trim_end());
            println!("{}", format!("# store: {}", config.store_path()?.display()).dimmed());
        }
        ConfigSubcommands::Path => println!("{}", Config::get_config_path()?.display()),
    }
    Ok(())
}
