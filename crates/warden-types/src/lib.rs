//! # warden-types: Core types for `Warden`
//!
//! This crate contains the data model shared across the `Warden` system:
//! - Access-control entries ([`AccessEntry`], [`EntryValue`])
//! - Subjects ([`Subject`]): named users and groups
//! - Resources ([`ResourceKind`], [`ResourceId`]) and their naming rules
//! - Resolution outcomes ([`Verdict`])
//! - The action catalog per resource category ([`actions`])

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod actions;
mod resource;

pub use resource::{
    NAMESPACE_SEPARATOR, ResourceId, ResourceKind, namespace_of_page, normalize_directory,
    parent_directory,
};

// ============================================================================
// Entries
// ============================================================================

/// Whether an entry grants or denies its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryValue {
    Grant,
    Deny,
}

impl EntryValue {
    /// Returns the single-character flag used by the durable format.
    pub fn as_flag(self) -> char {
        match self {
            EntryValue::Grant => '1',
            EntryValue::Deny => '0',
        }
    }

    /// Parses a durable-format flag.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "1" => Some(EntryValue::Grant),
            "0" => Some(EntryValue::Deny),
            _ => None,
        }
    }
}

impl Display for EntryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryValue::Grant => write!(f, "grant"),
            EntryValue::Deny => write!(f, "deny"),
        }
    }
}

/// One granted or denied rule.
///
/// `(resource, action, subject)` is the logical key. Entries are immutable;
/// changing a permission means deleting the old entry and storing a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessEntry {
    resource: String,
    action: String,
    subject: String,
    value: EntryValue,
}

impl AccessEntry {
    pub fn new(
        resource: impl Into<String>,
        action: impl Into<String>,
        subject: impl Into<String>,
        value: EntryValue,
    ) -> Self {
        let subject: String = subject.into();
        let subject = canonical_subject(&subject).into_owned();
        debug_assert!(subject.len() >= 2, "subject must carry a prefix");

        Self {
            resource: resource.into(),
            action: action.into(),
            subject,
            value,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn value(&self) -> EntryValue {
        self.value
    }

    /// Returns whether this entry has the given logical key.
    pub fn has_key(&self, resource: &str, action: &str, subject: &str) -> bool {
        self.resource == resource
            && self.action == action
            && self.subject == canonical_subject(subject)
    }

    /// Returns a copy of this entry bound to another resource.
    pub fn with_resource(&self, resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..self.clone()
        }
    }
}

// ============================================================================
// Subjects
// ============================================================================

/// Prefix for user subjects in stored entries.
pub const USER_PREFIX: &str = "U.";

/// Prefix for group subjects in stored entries.
pub const GROUP_PREFIX: &str = "G.";

/// Returns a stored subject with its prefix letter uppercased.
///
/// `u.bob` and `U.bob` name the same user; every comparison of stored
/// subjects goes through this form. Strings without a user or group prefix
/// are returned unchanged.
pub fn canonical_subject(subject: &str) -> Cow<'_, str> {
    match subject.as_bytes() {
        [b'u' | b'g', b'.', ..] => Cow::Owned(subject[..1].to_ascii_uppercase() + &subject[1..]),
        _ => Cow::Borrowed(subject),
    }
}

/// A user or group that entries are bound to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subject {
    User(String),
    Group(String),
}

impl Subject {
    pub fn user(name: impl Into<String>) -> Self {
        Subject::User(name.into())
    }

    pub fn group(name: impl Into<String>) -> Self {
        Subject::Group(name.into())
    }

    /// Returns the bare name without prefix.
    pub fn name(&self) -> &str {
        match self {
            Subject::User(name) | Subject::Group(name) => name,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Subject::Group(_))
    }

    /// Returns the prefixed form stored in entries, e.g. `U.alice`.
    pub fn to_entry_subject(&self) -> String {
        match self {
            Subject::User(name) => format!("{USER_PREFIX}{name}"),
            Subject::Group(name) => format!("{GROUP_PREFIX}{name}"),
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_entry_subject())
    }
}

/// Error returned when a stored subject string has no valid prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid subject '{0}': expected U.<name> or G.<name>")]
pub struct InvalidSubject(pub String);

impl FromStr for Subject {
    type Err = InvalidSubject;

    /// The prefix letter is case-insensitive: `u.alice` and `U.alice` are the
    /// same user.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = chars.next();
        let dot = chars.next();
        let name = chars.as_str();

        if dot != Some('.') || name.is_empty() {
            return Err(InvalidSubject(s.to_string()));
        }

        match kind {
            Some('U' | 'u') => Ok(Subject::user(name)),
            Some('G' | 'g') => Ok(Subject::group(name)),
            _ => Err(InvalidSubject(s.to_string())),
        }
    }
}

// ============================================================================
// Verdict
// ============================================================================

/// Outcome of evaluating entries at one resource level.
///
/// `Unknown` means no applicable entry was found; it drives escalation and is
/// collapsed to "not authorized" at the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Granted,
    Denied,
    Unknown,
}

impl Verdict {
    pub fn is_granted(self) -> bool {
        self == Verdict::Granted
    }

    /// Returns whether this verdict ends resolution.
    pub fn is_conclusive(self) -> bool {
        self != Verdict::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_roundtrip() {
        for value in [EntryValue::Grant, EntryValue::Deny] {
            let flag = value.as_flag().to_string();
            assert_eq!(EntryValue::from_flag(&flag), Some(value));
        }
        assert_eq!(EntryValue::from_flag("2"), None);
        assert_eq!(EntryValue::from_flag(""), None);
    }

    #[test]
    fn subject_prefixes() {
        assert_eq!(Subject::user("alice").to_entry_subject(), "U.alice");
        assert_eq!(Subject::group("editors").to_entry_subject(), "G.editors");
        assert_eq!(Subject::group("editors").to_string(), "G.editors");
    }

    #[test]
    fn subject_parse_is_prefix_case_insensitive() {
        assert_eq!("U.alice".parse::<Subject>(), Ok(Subject::user("alice")));
        assert_eq!("u.alice".parse::<Subject>(), Ok(Subject::user("alice")));
        assert_eq!("g.Staff".parse::<Subject>(), Ok(Subject::group("Staff")));
    }

    #[test]
    fn lowercase_prefixes_are_canonicalized() {
        assert_eq!(canonical_subject("u.bob"), "U.bob");
        assert_eq!(canonical_subject("g.staff"), "G.staff");
        assert_eq!(canonical_subject("U.bob"), "U.bob");
        assert_eq!(canonical_subject("x.bob"), "x.bob");
        // Only the prefix letter changes.
        assert_eq!(canonical_subject("u.Bob"), "U.Bob");

        let entry = AccessEntry::new("P.Main", "read_page", "u.bob", EntryValue::Deny);
        assert_eq!(entry.subject(), "U.bob");
        assert!(entry.has_key("P.Main", "read_page", "U.bob"));
        assert!(entry.has_key("P.Main", "read_page", "u.bob"));
        assert!(!entry.has_key("P.Main", "read_page", "G.bob"));
    }

    #[test]
    fn subject_parse_rejects_malformed() {
        assert!("".parse::<Subject>().is_err());
        assert!("U.".parse::<Subject>().is_err());
        assert!("Ualice".parse::<Subject>().is_err());
        assert!("X.alice".parse::<Subject>().is_err());
    }

    #[test]
    fn entry_rebinding_keeps_key_fields() {
        let entry = AccessEntry::new("P.Main", "read_page", "U.bob", EntryValue::Deny);
        let moved = entry.with_resource("P.Home");

        assert_eq!(moved.resource(), "P.Home");
        assert_eq!(moved.action(), "read_page");
        assert_eq!(moved.subject(), "U.bob");
        assert_eq!(moved.value(), EntryValue::Deny);
        assert!(moved.has_key("P.Home", "read_page", "U.bob"));
        assert!(!moved.has_key("P.Main", "read_page", "U.bob"));
    }

    #[test]
    fn verdict_helpers() {
        assert!(Verdict::Granted.is_granted());
        assert!(!Verdict::Denied.is_granted());
        assert!(!Verdict::Unknown.is_granted());
        assert!(Verdict::Denied.is_conclusive());
        assert!(!Verdict::Unknown.is_conclusive());
    }
}
