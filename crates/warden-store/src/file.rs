//! Flat-file entry store.
//!
//! # File Layout
//!
//! ```text
//! {data_dir}/
//! ├── acl.dat      <- one `Resource|Action|Subject|Flag\r\n` record per entry
//! └── acl.dat.tmp  <- transient, exists only while a rewrite is in flight
//! ```
//!
//! Mutations re-read the file, apply the change in memory, write the full set
//! to the temporary sibling, fsync it, and rename it over the live file.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;
use warden_types::AccessEntry;

use crate::{EntryStore, StoreError, codec, entries};

/// Default store file name inside the data directory.
pub const DEFAULT_FILE_NAME: &str = "acl.dat";

/// Entry store backed by a single flat file.
///
/// # Invariants
///
/// - Every operation runs under one mutex, so no operation observes another
///   half-done
/// - The live file is only ever replaced by rename, never truncated in place
#[derive(Debug)]
pub struct FileEntryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileEntryStore {
    /// Opens the store at `path`, creating parent directories and an empty
    /// file when absent.
    ///
    /// Failure here means the store cannot be used at all and should abort
    /// startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        store.ensure_exists()?;
        debug!(path = %store.path.display(), "acl store opened");
        Ok(store)
    }

    /// Opens `{data_dir}/acl.dat`.
    pub fn open_in(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(data_dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    /// Returns the path of the live store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock.lock().map_err(|_| StoreError::Poisoned)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn ensure_exists(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map(drop)
            .map_err(|e| StoreError::io(&self.path, e))
    }

    /// Reads the full entry set. Caller must hold the lock.
    fn read_entries(&self) -> Result<Vec<AccessEntry>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.ensure_exists()?;
                String::new()
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        Ok(codec::decode_entries(&text).entries)
    }

    /// Replaces the file with `entries`. Caller must hold the lock.
    fn write_entries(&self, entries: &[AccessEntry]) -> Result<(), StoreError> {
        let text = codec::encode_entries(entries)?;
        let tmp = self.tmp_path();

        let mut file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }

    /// Runs `mutate` against the current entry set and rewrites the file if
    /// it reports a change.
    fn rewrite<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<AccessEntry>) -> (T, bool),
    ) -> Result<T, StoreError> {
        let _guard = self.guard()?;
        let mut entries = self.read_entries()?;
        let (result, changed) = mutate(&mut entries);
        if changed {
            self.write_entries(&entries)?;
        }
        Ok(result)
    }
}

impl EntryStore for FileEntryStore {
    fn load_all(&self) -> Result<Vec<AccessEntry>, StoreError> {
        let _guard = self.guard()?;
        self.read_entries()
    }

    fn entries_for_resource(&self, resource: &str) -> Result<Vec<AccessEntry>, StoreError> {
        let _guard = self.guard()?;
        Ok(entries::for_resource(&self.read_entries()?, resource))
    }

    fn entries_for_subject(&self, subject: &str) -> Result<Vec<AccessEntry>, StoreError> {
        let _guard = self.guard()?;
        Ok(entries::for_subject(&self.read_entries()?, subject))
    }

    fn store(&self, entry: AccessEntry) -> Result<(), StoreError> {
        codec::validate_entry(&entry)?;
        self.rewrite(|all| ((), entries::upsert(all, entry)))
    }

    fn delete(&self, resource: &str, action: &str, subject: &str) -> Result<bool, StoreError> {
        self.rewrite(|all| {
            let removed = entries::remove(all, resource, action, subject);
            (removed, removed)
        })
    }

    fn delete_all_for_resource(&self, resource: &str) -> Result<usize, StoreError> {
        self.rewrite(|all| {
            let removed = entries::remove_resource(all, resource);
            (removed, removed > 0)
        })
    }

    fn rename_resource(&self, old: &str, new: &str) -> Result<bool, StoreError> {
        codec::validate_field("resource", new)?;
        self.rewrite(|all| {
            let renamed = entries::rename_resource(all, old, new);
            (renamed, renamed && old != new)
        })
    }
}
