//! # warden-acl: Access-control resolution
//!
//! Turns stored entries into verdicts:
//! - **Evaluator** ([`evaluate`]): one resource level, pure, deny beats grant
//! - **Escalation rules** ([`EscalationRules`]): which other actions, at the
//!   same or a broader resource, imply an action
//! - **Resolver** ([`Resolver`]): walks the resource hierarchy applying the
//!   evaluator at each level until a level is conclusive
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Check (resource, action, user, groups)      │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Resolver                                    │
//! │  ├─ Direct: evaluate at the resource         │
//! │  ├─ Local: implied actions, same resource    │
//! │  ├─ Parent: root namespace / owning          │
//! │  │          namespace / parent directory     │
//! │  └─ Global: escalated actions on "G"         │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Verdict: Granted | Denied | Unknown         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The first conclusive tier wins, so the most specific resource always
//! overrides a broader one, whether it grants or denies.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use warden_acl::{EscalationRules, Resolver};
//! use warden_store::{EntryStore, MemoryEntryStore};
//! use warden_types::{AccessEntry, EntryValue, ResourceKind, Verdict};
//!
//! let store = Arc::new(MemoryEntryStore::new());
//! store.store(AccessEntry::new("P.Main", "manage", "U.alice", EntryValue::Grant))?;
//!
//! let rules = EscalationRules::new().with_local(ResourceKind::Page, "read", &["manage"]);
//! let resolver = Resolver::new(store, rules);
//!
//! let verdict = resolver.resolve_page("Main", "read", "alice", &[]);
//! assert_eq!(verdict, Verdict::Granted);
//! # Ok::<(), warden_store::StoreError>(())
//! ```

pub mod escalation;
pub mod evaluator;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use escalation::EscalationRules;
pub use evaluator::evaluate;
pub use resolver::Resolver;
