//! Configuration commands.

use std::process::ExitCode;

use anyhow::{Result, bail};
use warden_config::WardenConfig;

use crate::style::colors::SemanticStyle;
use crate::style::print_labeled;

/// Show the effective configuration.
pub fn show(config: &WardenConfig, format: &str) -> Result<ExitCode> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(config)?),
        "toml" => println!("{}", toml::to_string_pretty(config)?),
        "text" => {
            println!("{}", "Warden Configuration".header());
            println!();

            println!("Store:");
            print_labeled("Data directory", &config.store.data_dir.display().to_string());
            print_labeled("File name", &config.store.file_name);
            print_labeled("ACL file", &config.store_path().display().to_string());
            println!();

            println!("Security:");
            print_labeled("Admin user", &config.security.admin_user);
            println!();

            println!("Logging:");
            print_labeled("Level", &config.logging.level);
        }
        other => bail!("Unknown format '{other}' (expected text, toml, or json)"),
    }

    Ok(ExitCode::SUCCESS)
}
