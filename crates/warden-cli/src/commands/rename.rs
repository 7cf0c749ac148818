//! Rename propagation.

use std::process::ExitCode;

use anyhow::{Result, bail};
use warden_config::WardenConfig;

use super::open_engine;
use crate::style::print_success;

pub fn namespace(config: &WardenConfig, old: &str, new: &str) -> Result<ExitCode> {
    let engine = open_engine(config)?;
    if !engine.writer().process_namespace_renaming(old, new)? {
        bail!("Failed to move entries of namespace {old} to {new}");
    }
    print_success(&format!("Moved entries of namespace {old} to {new}"));
    Ok(ExitCode::SUCCESS)
}

pub fn page(config: &WardenConfig, old: &str, new: &str) -> Result<ExitCode> {
    let engine = open_engine(config)?;
    if !engine.writer().process_page_renaming(old, new)? {
        bail!("Failed to move entries of page {old} to {new}");
    }
    print_success(&format!("Moved entries of page {old} to {new}"));
    Ok(ExitCode::SUCCESS)
}

pub fn directory(config: &WardenConfig, provider: &str, old: &str, new: &str) -> Result<ExitCode> {
    let engine = open_engine(config)?;
    if !engine
        .writer()
        .process_directory_renaming(provider, old, new)?
    {
        bail!("Failed to move entries of directory {old} to {new} ({provider})");
    }
    print_success(&format!(
        "Moved entries of directory {old} to {new} ({provider})"
    ));
    Ok(ExitCode::SUCCESS)
}
