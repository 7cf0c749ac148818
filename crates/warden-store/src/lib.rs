//! # warden-store: Access-control entry storage
//!
//! Persists [`AccessEntry`] records and retrieves them by resource or by
//! subject. Two implementations share the [`EntryStore`] contract:
//!
//! - [`FileEntryStore`]: one flat file, one line per entry, rewritten in full
//!   on every mutation
//! - [`MemoryEntryStore`]: a `Vec` for tests and embedders without durability
//!
//! # Concurrency
//!
//! Each store instance owns a single mutex held for the whole of every
//! operation, reads included. A reader never observes a half-applied write,
//! and writers are serialized.
//!
//! # Scalability
//!
//! Every file-store write re-reads and rewrites the whole entry set, so writes
//! are O(total entries). ACL entry counts are small next to content volume;
//! a store with very large entry counts needs an append log with compaction
//! instead.
//!
//! # Example
//!
//! ```
//! use warden_store::{EntryStore, MemoryEntryStore};
//! use warden_types::{AccessEntry, EntryValue};
//!
//! let store = MemoryEntryStore::new();
//! store.store(AccessEntry::new("P.Main", "read_page", "U.alice", EntryValue::Grant))?;
//!
//! assert_eq!(store.entries_for_resource("P.Main")?.len(), 1);
//! assert!(store.delete("P.Main", "read_page", "U.alice")?);
//! assert!(!store.delete("P.Main", "read_page", "U.alice")?);
//! # Ok::<(), warden_store::StoreError>(())
//! ```

use warden_types::AccessEntry;

pub mod codec;
mod entries;
mod error;
mod file;
mod memory;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use file::{DEFAULT_FILE_NAME, FileEntryStore};
pub use memory::MemoryEntryStore;

/// Durable CRUD over access-control entries.
///
/// Implementations must be safe to call from many request threads at once.
/// Runtime failures are returned as [`StoreError`]; callers decide whether to
/// log, retry, or collapse them to a default-deny outcome.
pub trait EntryStore: Send + Sync {
    /// Returns every stored entry.
    fn load_all(&self) -> Result<Vec<AccessEntry>, StoreError>;

    /// Returns the entries whose resource equals `resource` exactly.
    fn entries_for_resource(&self, resource: &str) -> Result<Vec<AccessEntry>, StoreError>;

    /// Returns the entries whose subject equals `subject` exactly.
    fn entries_for_subject(&self, subject: &str) -> Result<Vec<AccessEntry>, StoreError>;

    /// Inserts `entry`, replacing any entry with the same
    /// `(resource, action, subject)` key.
    fn store(&self, entry: AccessEntry) -> Result<(), StoreError>;

    /// Removes the entry with the given key. Returns whether one was removed.
    fn delete(&self, resource: &str, action: &str, subject: &str) -> Result<bool, StoreError>;

    /// Removes every entry whose resource equals `resource`. Never matches by
    /// prefix. Returns the number of entries removed.
    fn delete_all_for_resource(&self, resource: &str) -> Result<usize, StoreError>;

    /// Rebinds every entry of `old` to `new`, keeping action, subject and
    /// value. Returns whether any entry matched.
    fn rename_resource(&self, old: &str, new: &str) -> Result<bool, StoreError>;
}
