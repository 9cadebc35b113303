//! `wallbot config`: show or check the effective configuration.

use crate::config_file::FileConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as YAML
    Show,
    /// Validate the configuration
    Check,
}

pub fn execute(config: &FileConfig, args: &ConfigArgs) -> Result<i32> {
    match args.command {
        ConfigCommands::Show => {
            print!("{}", render(config)?);
            Ok(0)
        }
        ConfigCommands::Check => match config.validate() {
            Ok(()) => {
                println!("Config OK");
                Ok(0)
            }
            Err(e) => {
                eprintln!("Error: {e:#}");
                Ok(1)
            }
        },
    }
}

fn render(config: &FileConfig) -> Result<String> {
    serde_yaml::to_string(config).context("Failed to serialize config")
}
