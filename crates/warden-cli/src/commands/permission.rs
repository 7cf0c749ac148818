//! Grant, deny, and revoke commands.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use warden::{ChangeOutcome, PermissionStatus, Subject};
use warden_config::WardenConfig;

use super::{ResourceArg, open_engine};
use crate::style::{print_success, print_warn};

pub fn grant(
    config: &WardenConfig,
    resource: &ResourceArg,
    action: &str,
    subject: &str,
) -> Result<ExitCode> {
    set(config, PermissionStatus::Grant, resource, action, subject)
}

pub fn deny(
    config: &WardenConfig,
    resource: &ResourceArg,
    action: &str,
    subject: &str,
) -> Result<ExitCode> {
    set(config, PermissionStatus::Deny, resource, action, subject)
}

/// Removes the entry. A missing entry is reported but is not an error; a
/// store failure is.
pub fn revoke(
    config: &WardenConfig,
    resource: &ResourceArg,
    action: &str,
    subject: &str,
) -> Result<ExitCode> {
    set(config, PermissionStatus::Delete, resource, action, subject)
}

fn set(
    config: &WardenConfig,
    status: PermissionStatus,
    resource: &ResourceArg,
    action: &str,
    subject: &str,
) -> Result<ExitCode> {
    let subject: Subject = subject
        .parse()
        .with_context(|| format!("'{subject}' is not a subject (expected U.<user> or G.<group>)"))?;

    let engine = open_engine(config)?;
    let outcome = engine
        .writer()
        .change_permission(resource.target(), status, action, &subject)?;

    match (status, outcome) {
        (_, ChangeOutcome::Failed) => {
            bail!("Failed to {status} {action} for {subject} on {resource}; see the error log")
        }
        (PermissionStatus::Delete, ChangeOutcome::Applied) => {
            print_success(&format!("Revoked {action} from {subject} on {resource}"));
        }
        (PermissionStatus::Delete, ChangeOutcome::NotFound) => {
            print_warn(&format!("{subject} has no {action} entry on {resource}"));
        }
        (_, _) => print_success(&format!("Set {status} {action} for {subject} on {resource}")),
    }

    Ok(ExitCode::SUCCESS)
}
