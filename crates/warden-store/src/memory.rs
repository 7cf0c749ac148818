//! In-memory entry store.

use std::sync::{Mutex, MutexGuard};

use warden_types::AccessEntry;

use crate::{EntryStore, StoreError, codec, entries};

/// Entry store holding everything in a `Vec`.
///
/// Applies the same field validation as [`FileEntryStore`](crate::FileEntryStore)
/// so code tested against it behaves the same against the file store.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: Mutex<Vec<AccessEntry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = AccessEntry>) -> Self {
        let mut all = Vec::new();
        for entry in entries {
            entries::upsert(&mut all, entry);
        }
        Self {
            entries: Mutex::new(all),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<AccessEntry>>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl EntryStore for MemoryEntryStore {
    fn load_all(&self) -> Result<Vec<AccessEntry>, StoreError> {
        Ok(self.guard()?.clone())
    }

    fn entries_for_resource(&self, resource: &str) -> Result<Vec<AccessEntry>, StoreError> {
        Ok(entries::for_resource(&self.guard()?, resource))
    }

    fn entries_for_subject(&self, subject: &str) -> Result<Vec<AccessEntry>, StoreError> {
        Ok(entries::for_subject(&self.guard()?, subject))
    }

    fn store(&self, entry: AccessEntry) -> Result<(), StoreError> {
        codec::validate_entry(&entry)?;
        let mut all = self.guard()?;
        entries::upsert(&mut all, entry);
        Ok(())
    }

    fn delete(&self, resource: &str, action: &str, subject: &str) -> Result<bool, StoreError> {
        let mut all = self.guard()?;
        Ok(entries::remove(&mut all, resource, action, subject))
    }

    fn delete_all_for_resource(&self, resource: &str) -> Result<usize, StoreError> {
        let mut all = self.guard()?;
        Ok(entries::remove_resource(&mut all, resource))
    }

    fn rename_resource(&self, old: &str, new: &str) -> Result<bool, StoreError> {
        codec::validate_field("resource", new)?;
        let mut all = self.guard()?;
        Ok(entries::rename_resource(&mut all, old, new))
    }
}
