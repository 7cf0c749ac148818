//! Contract tests run against every store implementation.

use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use test_case::test_case;
use warden_types::{AccessEntry, EntryValue};

use crate::{EntryStore, FileEntryStore, MemoryEntryStore};

#[derive(Debug, Clone, Copy)]
enum Backend {
    Memory,
    File,
}

/// Keeps the temp dir alive as long as the store.
struct Fixture {
    store: Arc<dyn EntryStore>,
    _dir: Option<TempDir>,
}

fn fixture(backend: Backend) -> Fixture {
    match backend {
        Backend::Memory => Fixture {
            store: Arc::new(MemoryEntryStore::new()),
            _dir: None,
        },
        Backend::File => {
            let dir = TempDir::new().unwrap();
            let store = FileEntryStore::open_in(dir.path()).unwrap();
            Fixture {
                store: Arc::new(store),
                _dir: Some(dir),
            }
        }
    }
}

fn grant(resource: &str, action: &str, subject: &str) -> AccessEntry {
    AccessEntry::new(resource, action, subject, EntryValue::Grant)
}

fn deny(resource: &str, action: &str, subject: &str) -> AccessEntry {
    AccessEntry::new(resource, action, subject, EntryValue::Deny)
}

// ============================================================================
// Retrieval
// ============================================================================

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn filters_by_exact_resource_and_subject(backend: Backend) {
    let fx = fixture(backend);
    let store = &fx.store;
    store.store(grant("P.Docs.Main", "read_page", "U.alice")).unwrap();
    store.store(grant("P.Docs.Main2", "read_page", "U.alice")).unwrap();
    store.store(deny("P.Docs.Main", "modify_page", "G.guests")).unwrap();

    let by_resource = store.entries_for_resource("P.Docs.Main").unwrap();
    assert_eq!(by_resource.len(), 2);
    assert!(by_resource.iter().all(|e| e.resource() == "P.Docs.Main"));

    let by_subject = store.entries_for_subject("U.alice").unwrap();
    assert_eq!(by_subject.len(), 2);
    assert!(store.entries_for_subject("U.ali").unwrap().is_empty());
}

// ============================================================================
// Store / Delete
// ============================================================================

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn store_overwrites_same_key(backend: Backend) {
    let fx = fixture(backend);
    let store = &fx.store;
    store.store(grant("N.Docs", "read_pages", "G.users")).unwrap();
    store.store(deny("N.Docs", "read_pages", "G.users")).unwrap();

    let all = store.load_all().unwrap();
    assert_eq!(all, vec![deny("N.Docs", "read_pages", "G.users")]);
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn delete_is_idempotent(backend: Backend) {
    let fx = fixture(backend);
    let store = &fx.store;
    store.store(grant("G", "manage_files", "U.root")).unwrap();

    assert!(store.delete("G", "manage_files", "U.root").unwrap());
    assert!(!store.delete("G", "manage_files", "U.root").unwrap());
    assert!(!store.delete("G", "never_stored", "U.nobody").unwrap());
    assert!(store.load_all().unwrap().is_empty());
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn delete_all_for_resource_is_exact(backend: Backend) {
    let fx = fixture(backend);
    let store = &fx.store;
    store.store(grant("N.Docs", "read_pages", "G.users")).unwrap();
    store.store(grant("N.Docs", "modify_pages", "G.editors")).unwrap();
    store.store(grant("N.DocsArchive", "read_pages", "G.users")).unwrap();

    assert_eq!(store.delete_all_for_resource("N.Docs").unwrap(), 2);
    assert_eq!(store.delete_all_for_resource("N.Docs").unwrap(), 0);
    assert_eq!(
        store.load_all().unwrap(),
        vec![grant("N.DocsArchive", "read_pages", "G.users")]
    );
}

// ============================================================================
// Rename
// ============================================================================

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn rename_moves_entries_unchanged(backend: Backend) {
    let fx = fixture(backend);
    let store = &fx.store;
    let originals = vec![
        grant("P.old", "read_page", "U.alice"),
        deny("P.old", "modify_page", "G.guests"),
    ];
    for entry in &originals {
        store.store(entry.clone()).unwrap();
    }
    store.store(grant("P.other", "read_page", "U.alice")).unwrap();

    assert!(store.rename_resource("P.old", "P.new").unwrap());

    assert!(store.entries_for_resource("P.old").unwrap().is_empty());
    let moved = store.entries_for_resource("P.new").unwrap();
    let expected: Vec<_> = originals.iter().map(|e| e.with_resource("P.new")).collect();
    assert_eq!(moved, expected);
    assert_eq!(store.entries_for_resource("P.other").unwrap().len(), 1);
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn rename_of_unknown_resource_reports_nothing(backend: Backend) {
    let fx = fixture(backend);
    assert!(!fx.store.rename_resource("P.missing", "P.new").unwrap());
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn rename_keeps_one_entry_per_key(backend: Backend) {
    let fx = fixture(backend);
    let store = &fx.store;
    store.store(deny("P.new", "read_page", "U.alice")).unwrap();
    store.store(grant("P.old", "read_page", "U.alice")).unwrap();

    store.rename_resource("P.old", "P.new").unwrap();

    assert_eq!(
        store.entries_for_resource("P.new").unwrap(),
        vec![grant("P.new", "read_page", "U.alice")]
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn concurrent_writers_lose_nothing(backend: Backend) {
    let fx = fixture(backend);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&fx.store);
            thread::spawn(move || {
                for i in 0..10 {
                    let resource = format!("P.page{t}");
                    let subject = format!("U.user{i}");
                    store.store(grant(&resource, "read_page", &subject)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(fx.store.load_all().unwrap().len(), 80);
}

// ============================================================================
// Subject prefixes
// ============================================================================

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
fn prefix_letter_case_is_not_significant(backend: Backend) {
    let fx = fixture(backend);
    let store = &fx.store;
    store.store(grant("P.Main", "read_page", "U.bob")).unwrap();
    store.store(deny("P.Main", "read_page", "u.bob")).unwrap();

    // Same key: the deny replaced the grant.
    let stored = store.entries_for_resource("P.Main").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].subject(), "U.bob");
    assert_eq!(stored[0].value(), EntryValue::Deny);

    assert_eq!(store.entries_for_subject("u.bob").unwrap().len(), 1);
    assert!(store.delete("P.Main", "read_page", "u.bob").unwrap());
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn lowercase_prefix_in_file_is_read_canonical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("acl.dat");
    std::fs::write(
        &path,
        "P.Main|read_page|U.bob|1\r\nP.Main|read_page|u.bob|0\r\nN.|read_pages|g.staff|1\r\n",
    )
    .unwrap();
    let store = FileEntryStore::open(&path).unwrap();

    let bob = store.entries_for_subject("U.bob").unwrap();
    assert_eq!(bob.len(), 2);
    assert!(bob.iter().any(|e| e.value() == EntryValue::Deny));
    assert_eq!(store.entries_for_subject("G.staff").unwrap().len(), 1);

    // Deleting the key removes both spellings.
    assert!(store.delete("P.Main", "read_page", "U.bob").unwrap());
    assert!(store.entries_for_subject("U.bob").unwrap().is_empty());
}
