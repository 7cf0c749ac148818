//! # Warden
//!
//! Access-control resolution for hierarchical content: decides whether a
//! user, with their groups, may perform an action on the global scope, a
//! namespace, a page, or a directory of a storage provider.
//!
//! - **Default deny**: only an explicit grant, found at the most specific
//!   level that has an opinion, authorizes an action
//! - **Deny beats grant** at the same level, whether it names the user or a
//!   group
//! - **Escalation**: stronger actions imply weaker ones, and unresolved
//!   checks fall back to the owning namespace, the root namespace, parent
//!   directories, and finally the global scope
//! - **Audit**: every permission change is logged on the
//!   [`AUDIT_TARGET`](writer::AUDIT_TARGET) tracing target
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                        AclEngine                        │
//! │  ┌─────────────┐   ┌─────────────┐   ┌──────────────┐  │
//! │  │ AuthChecker │   │ AuthWriter  │   │  AuthReader  │  │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬───────┘  │
//! │         ▼                 │                 │          │
//! │  ┌─────────────┐          │                 │          │
//! │  │  Resolver   │          │                 │          │
//! │  └──────┬──────┘          ▼                 ▼          │
//! │         └──────────► EntryStore ◄───────────┘          │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use warden::{AclEngine, EscalationRules, MemoryEntryStore, PermissionStatus, Subject};
//! use warden::actions::{namespace, page};
//!
//! let engine = AclEngine::with_store(
//!     Arc::new(MemoryEntryStore::new()),
//!     EscalationRules::standard(),
//!     "admin",
//! );
//!
//! // Editors may manage every page in the "Docs" namespace.
//! engine.writer().set_permission_for_namespace(
//!     PermissionStatus::Grant,
//!     Some("Docs"),
//!     namespace::MANAGE_PAGES,
//!     &Subject::group("editors"),
//! )?;
//!
//! let checker = engine.checker();
//! let editors = vec!["editors".to_string()];
//! assert!(checker.check_action_for_page("Docs.Install", page::READ_PAGE, "bob", &editors)?);
//! assert!(!checker.check_action_for_page("Docs.Install", page::READ_PAGE, "eve", &[])?);
//! # Ok::<(), warden::AclError>(())
//! ```

mod checker;
mod engine;
mod error;
mod reader;
mod validate;
pub mod writer;


pub use checker::AuthChecker;
pub use engine::AclEngine;
pub use error::{AclError, Result};
pub use reader::AuthReader;
pub use writer::{AUDIT_TARGET, AuthWriter, ChangeOutcome, PermissionStatus, PermissionTarget};

// Re-export the pieces embedders need to build an engine.
pub use warden_acl::EscalationRules;
pub use warden_config::WardenConfig;
pub use warden_store::{EntryStore, FileEntryStore, MemoryEntryStore, StoreError};
pub use warden_types::{
    AccessEntry, EntryValue, ResourceId, ResourceKind, Subject, Verdict, actions,
};
