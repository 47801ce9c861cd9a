//! `config` subcommand: generate a configuration file.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::Config;

pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&config)?,
    };

    match output {
        Some(path) => {
            fs::write(&path, &content)?;
            println!("Wrote default configuration to {}", path.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}
