//! Configuration view, creation and validation: `dtkit config`.

use anyhow::{Result, bail};
use std::path::Path;

use dtkit::config::{CONFIG_FILE_NAME, DtkitConfig, DtkitToml};
use dtkit::ui::icons::{CHECK, WARN};

use super::super::ConfigCommands;

pub fn cmd_config(config: &DtkitConfig, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            if config.config_path.exists() {
                println!("Config file: {}", config.config_path.display());
            } else {
                println!("No {} found at {}", CONFIG_FILE_NAME, config.config_path.display());
                println!("Using defaults. Run 'dtkit config init' to create one.");
            }
            println!();
            println!("Effective values (with env/CLI overrides):");
            println!();
            print!("{}", config.toml.to_toml()?);
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            let warnings = config.validate();
            if warnings.is_empty() {
                println!("{}Configuration is valid.", CHECK);
            } else {
                println!("Configuration warnings:");
                for warning in &warnings {
                    println!("  {}{}", WARN, warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init { force }) => {
            cmd_config_init(&config.project_dir, Some(config.config_path.as_path()), force)?;
        }
    }

    Ok(())
}

/// Write a default configuration file.
pub fn cmd_config_init(project_dir: &Path, config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => project_dir.join(CONFIG_FILE_NAME),
    };

    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    DtkitToml::default().save(&path)?;

    println!("{}Created {}", CHECK, path.display());
    println!();
    println!("You can now customize:");
    println!("  - [sanitize] max_length, allow_html, trim_whitespace");
    println!("  - [export] product_label and page geometry");
    println!("  - [catalog] path to a JSON phase catalog");
    println!();
    Ok(())
}
