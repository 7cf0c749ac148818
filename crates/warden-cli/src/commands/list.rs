//! Entry listing.

use std::process::ExitCode;

use anyhow::Result;
use warden_config::WardenConfig;

use super::{ResourceArg, open_engine};
use crate::style::colors::SemanticStyle;
use crate::style::print_entry_table;

/// Prints every entry stored on exactly this resource.
pub fn run(config: &WardenConfig, resource: &ResourceArg) -> Result<ExitCode> {
    let engine = open_engine(config)?;
    let mut entries = engine.reader().entries_for_resource(&resource.id());

    if entries.is_empty() {
        println!("{}", format!("No entries on {resource}.").muted());
        return Ok(ExitCode::SUCCESS);
    }

    entries.sort_by(|a, b| (a.subject(), a.action()).cmp(&(b.subject(), b.action())));
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.subject().to_string(),
                entry.action().to_string(),
                entry.value().to_string(),
            ]
        })
        .collect();

    println!("{}", resource.id().as_str().header());
    print_entry_table(&["Subject", "Action", "Value"], &rows);

    Ok(ExitCode::SUCCESS)
}
