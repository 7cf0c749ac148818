//! Argument validation shared by the facades.
//!
//! Every check here runs before the store is touched, so a rejected call
//! never has a partial effect.

use warden_types::actions::{is_assignable_action, is_valid_action};
use warden_types::{NAMESPACE_SEPARATOR, ResourceKind, Subject};

use crate::error::{AclError, Result};

/// Characters no identifier may contain: the field separator and line breaks.
const RESERVED: [char; 3] = ['|', '\r', '\n'];

/// Validates an action used in a check.
pub(crate) fn check_action(kind: ResourceKind, action: &str) -> Result<()> {
    if action.is_empty() {
        return Err(AclError::EmptyAction);
    }
    if !is_valid_action(kind, action) {
        return Err(AclError::InvalidAction {
            kind,
            action: action.to_string(),
        });
    }
    Ok(())
}

/// Validates an action being granted, denied, or removed. The full-control
/// action is accepted here.
pub(crate) fn assignable_action(kind: ResourceKind, action: &str) -> Result<()> {
    if action.is_empty() {
        return Err(AclError::EmptyAction);
    }
    if !is_assignable_action(kind, action) {
        return Err(AclError::InvalidAction {
            kind,
            action: action.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn user(user: &str) -> Result<()> {
    if user.is_empty() {
        return Err(AclError::EmptyUser);
    }
    name("user", user)
}

/// Group names may not be empty; an empty list is fine.
pub(crate) fn groups(groups: &[String]) -> Result<()> {
    for group in groups {
        non_empty_name("group", group)?;
    }
    Ok(())
}

pub(crate) fn subject(subject: &Subject) -> Result<()> {
    let what = if subject.is_group() { "group" } else { "user" };
    non_empty_name(what, subject.name())
}

/// A namespace name; `None` and `""` both mean the root namespace.
pub(crate) fn namespace(namespace: Option<&str>) -> Result<()> {
    namespace.map_or(Ok(()), |ns| {
        name("namespace", ns)?;
        no_separator(ns)
    })
}

/// A namespace that must exist by name, e.g. one being renamed.
pub(crate) fn named_namespace(namespace: &str) -> Result<()> {
    non_empty_name("namespace", namespace)?;
    no_separator(namespace)
}

/// The namespace separator splits full page names, so a namespace may not
/// contain it.
fn no_separator(namespace: &str) -> Result<()> {
    if namespace.contains(NAMESPACE_SEPARATOR) {
        return Err(AclError::InvalidName {
            what: "namespace",
            value: namespace.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn page(page: &str) -> Result<()> {
    non_empty_name("page", page)
}

pub(crate) fn provider(provider: &str) -> Result<()> {
    non_empty_name("provider", provider)?;
    if provider.contains('/') {
        return Err(AclError::InvalidName {
            what: "provider",
            value: provider.to_string(),
        });
    }
    Ok(())
}

/// Rejects directory paths that do not normalize to a single canonical key.
pub(crate) fn directory_path(path: &str) -> Result<()> {
    if path.contains(RESERVED) || path.contains('\\') || path.contains("//") {
        return Err(AclError::MalformedPath(path.to_string()));
    }
    Ok(())
}

pub(crate) fn non_empty_name(what: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AclError::InvalidName {
            what,
            value: String::new(),
        });
    }
    name(what, value)
}

fn name(what: &'static str, value: &str) -> Result<()> {
    if value.contains(RESERVED) {
        return Err(AclError::InvalidName {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}
