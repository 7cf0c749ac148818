//! Authorization check.

use std::process::ExitCode;

use anyhow::Result;
use warden_config::WardenConfig;

use super::{ResourceArg, open_engine};
use crate::style::colors::SemanticStyle;

/// Resolves one check and prints the outcome.
///
/// Exits with status 1 when the action is not granted, so scripts can test
/// the result without parsing output.
pub fn run(
    config: &WardenConfig,
    resource: &ResourceArg,
    action: &str,
    user: &str,
    groups: &[String],
) -> Result<ExitCode> {
    let engine = open_engine(config)?;
    let checker = engine.checker();

    let granted = match resource {
        ResourceArg::Global => checker.check_action_for_global(action, user, groups)?,
        ResourceArg::Namespace(name) => {
            checker.check_action_for_namespace(name.as_deref(), action, user, groups)?
        }
        ResourceArg::Page(page) => checker.check_action_for_page(page, action, user, groups)?,
        ResourceArg::Directory { provider, path } => {
            checker.check_action_for_directory(provider, path, action, user, groups)?
        }
    };

    let target = resource.to_string();
    if granted {
        println!(
            "{} {user} may {action} on {}",
            "granted".success(),
            target.code()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} {user} may not {action} on {}",
            "denied".error(),
            target.code()
        );
        Ok(ExitCode::from(1))
    }
}
