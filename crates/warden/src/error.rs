//! Error types for the public facades.

use thiserror::Error;
use warden_store::StoreError;
use warden_types::ResourceKind;

/// Errors raised at the API boundary, before any store access.
///
/// Store failures during checks and writes are not errors: checks resolve to
/// the default deny and writes report `false` or
/// [`ChangeOutcome::Failed`](crate::ChangeOutcome::Failed). The only store error surfaced
/// here is the one from [`AclEngine::open`](crate::AclEngine::open).
#[derive(Debug, Error)]
pub enum AclError {
    /// The action is empty.
    #[error("action must not be empty")]
    EmptyAction,

    /// The action is not defined for the resource category.
    #[error("'{action}' is not a valid {kind} action")]
    InvalidAction { kind: ResourceKind, action: String },

    /// The user name is empty.
    #[error("user must not be empty")]
    EmptyUser,

    /// A name holds a character the durable format cannot carry.
    #[error("invalid {what} '{value}'")]
    InvalidName { what: &'static str, value: String },

    /// A directory path that cannot be normalized.
    #[error("malformed directory path '{0}'")]
    MalformedPath(String),

    /// The entry store could not be opened.
    #[error("failed to open acl store: {0}")]
    Store(#[from] StoreError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, AclError>;
