//! Resolver tests against synthetic escalation tables.

use std::sync::Arc;

use proptest::prelude::*;
use test_case::test_case;
use warden_store::{EntryStore, MemoryEntryStore, StoreError};
use warden_types::{AccessEntry, EntryValue, ResourceKind, Verdict};

use crate::{EscalationRules, Resolver};

/// "manage" implies "read" everywhere; page "read" maps onto namespace
/// "read_all" or "manage_all" and page "manage" onto "manage_all"; namespaces
/// and directories escalate to global "admin_all".
fn rules() -> EscalationRules {
    EscalationRules::new()
        .with_local(ResourceKind::Page, "read", &["manage"])
        .with_local(ResourceKind::Namespace, "read_all", &["manage_all"])
        .with_local(ResourceKind::Directory, "read", &["manage"])
        .with_parent(ResourceKind::Page, "read", &["read_all", "manage_all"])
        .with_parent(ResourceKind::Page, "manage", &["manage_all"])
        .with_parent(ResourceKind::Namespace, "read_all", &["admin_all"])
        .with_parent(ResourceKind::Namespace, "manage_all", &["admin_all"])
        .with_parent(ResourceKind::Directory, "read", &["admin_all"])
        .with_parent(ResourceKind::Directory, "manage", &["admin_all"])
}

fn resolver_with(entries: &[AccessEntry]) -> Resolver {
    let store = MemoryEntryStore::with_entries(entries.iter().cloned());
    Resolver::new(Arc::new(store), rules())
}

fn grant(resource: &str, action: &str, subject: &str) -> AccessEntry {
    AccessEntry::new(resource, action, subject, EntryValue::Grant)
}

fn deny(resource: &str, action: &str, subject: &str) -> AccessEntry {
    AccessEntry::new(resource, action, subject, EntryValue::Deny)
}

fn groups(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

// ============================================================================
// Global
// ============================================================================

#[test]
fn global_has_no_escalation() {
    let resolver = resolver_with(&[grant("G", "admin_all", "U.alice")]);

    assert_eq!(resolver.resolve_global("admin_all", "alice", &[]), Verdict::Granted);
    assert_eq!(resolver.resolve_global("read", "alice", &[]), Verdict::Unknown);
}

#[test]
fn empty_store_is_unknown_everywhere() {
    let resolver = resolver_with(&[]);

    assert_eq!(resolver.resolve_global("admin_all", "bob", &[]), Verdict::Unknown);
    assert_eq!(resolver.resolve_namespace(Some("Docs"), "read_all", "bob", &[]), Verdict::Unknown);
    assert_eq!(resolver.resolve_page("Docs.Main", "read", "bob", &[]), Verdict::Unknown);
    assert_eq!(resolver.resolve_directory("fs", "/a/b/", "read", "bob", &[]), Verdict::Unknown);
}

// ============================================================================
// Namespaces
// ============================================================================

#[test]
fn namespace_local_escalation() {
    let resolver = resolver_with(&[grant("N.Docs", "manage_all", "G.editors")]);

    assert_eq!(
        resolver.resolve_namespace(Some("Docs"), "read_all", "bob", &groups(&["editors"])),
        Verdict::Granted
    );
    // The escalation is one way.
    let resolver = resolver_with(&[grant("N.Docs", "read_all", "G.editors")]);
    assert_eq!(
        resolver.resolve_namespace(Some("Docs"), "manage_all", "bob", &groups(&["editors"])),
        Verdict::Unknown
    );
}

#[test]
fn namespace_escalates_to_root() {
    let resolver = resolver_with(&[grant("N.", "read_all", "U.bob")]);

    assert_eq!(resolver.resolve_namespace(Some("Docs"), "read_all", "bob", &[]), Verdict::Granted);
    assert_eq!(resolver.resolve_namespace(None, "read_all", "bob", &[]), Verdict::Granted);
    assert_eq!(resolver.resolve_namespace(Some(""), "read_all", "bob", &[]), Verdict::Granted);
}

#[test]
fn namespace_deny_overrides_root_grant() {
    let resolver = resolver_with(&[
        grant("N.", "read_all", "U.bob"),
        deny("N.Docs", "read_all", "U.bob"),
    ]);

    assert_eq!(resolver.resolve_namespace(Some("Docs"), "read_all", "bob", &[]), Verdict::Denied);
    assert_eq!(resolver.resolve_namespace(Some("Other"), "read_all", "bob", &[]), Verdict::Granted);
}

#[test]
fn namespace_escalates_to_global() {
    let resolver = resolver_with(&[grant("G", "admin_all", "G.admins")]);

    assert_eq!(
        resolver.resolve_namespace(Some("Docs"), "read_all", "bob", &groups(&["admins"])),
        Verdict::Granted
    );
    assert_eq!(
        resolver.resolve_namespace(Some("Docs"), "unmapped", "bob", &groups(&["admins"])),
        Verdict::Unknown
    );
}

// ============================================================================
// Pages
// ============================================================================

#[test]
fn page_local_escalation() {
    let resolver = resolver_with(&[grant("P.Main", "manage", "U.alice")]);

    assert_eq!(resolver.resolve_page("Main", "read", "alice", &[]), Verdict::Granted);
    assert_eq!(resolver.resolve_page("Main", "read", "bob", &[]), Verdict::Unknown);
}

#[test_case("Docs.Main", "N.Docs" ; "owning namespace")]
#[test_case("Docs.Main", "N." ; "root through owning namespace")]
#[test_case("Main", "N." ; "root page")]
fn page_escalates_to_namespace(page: &str, namespace: &str) {
    let resolver = resolver_with(&[grant(namespace, "read_all", "U.alice")]);

    assert_eq!(resolver.resolve_page(page, "read", "alice", &[]), Verdict::Granted);
}

#[test]
fn page_escalates_to_stronger_namespace_actions() {
    // Page "read" lists namespace "manage_all" among its parents.
    let resolver = resolver_with(&[grant("N.Docs", "manage_all", "U.alice")]);

    assert_eq!(resolver.resolve_page("Docs.Main", "read", "alice", &[]), Verdict::Granted);
}

#[test]
fn namespace_tier_for_pages_skips_local_escalation() {
    // A deny on a stronger namespace action does not hide a root grant.
    let resolver = resolver_with(&[
        deny("N.Docs", "manage_all", "U.alice"),
        grant("N.", "read_all", "U.alice"),
    ]);
    assert_eq!(resolver.resolve_page("Docs.Main", "read", "alice", &[]), Verdict::Granted);

    // Without "manage_all" as a parent, a namespace "manage_all" grant does
    // not reach page "read" through the namespace's local table.
    let rules = EscalationRules::new()
        .with_local(ResourceKind::Namespace, "read_all", &["manage_all"])
        .with_parent(ResourceKind::Page, "read", &["read_all"]);
    let store = MemoryEntryStore::with_entries([grant("N.Docs", "manage_all", "U.alice")]);
    let resolver = Resolver::new(Arc::new(store), rules);
    assert_eq!(resolver.resolve_page("Docs.Main", "read", "alice", &[]), Verdict::Unknown);
    assert_eq!(
        resolver.resolve_namespace(Some("Docs"), "read_all", "alice", &[]),
        Verdict::Granted
    );
}

#[test]
fn page_escalates_to_global() {
    let resolver = resolver_with(&[grant("G", "admin_all", "U.alice")]);

    assert_eq!(resolver.resolve_page("Docs.Main", "read", "alice", &[]), Verdict::Granted);
    assert_eq!(resolver.resolve_page("Docs.Main", "unmapped", "alice", &[]), Verdict::Unknown);
}

#[test]
fn most_specific_resource_wins() {
    // A page grant beats a namespace deny.
    let resolver = resolver_with(&[
        grant("P.Docs.Main", "read", "U.alice"),
        deny("N.Docs", "read_all", "U.alice"),
    ]);
    assert_eq!(resolver.resolve_page("Docs.Main", "read", "alice", &[]), Verdict::Granted);
    assert_eq!(resolver.resolve_page("Docs.Other", "read", "alice", &[]), Verdict::Denied);

    // A page deny beats a global grant.
    let resolver = resolver_with(&[
        deny("P.Docs.Main", "read", "G.staff"),
        grant("G", "admin_all", "G.staff"),
    ]);
    assert_eq!(
        resolver.resolve_page("Docs.Main", "read", "alice", &groups(&["staff"])),
        Verdict::Denied
    );
}

#[test]
fn namespace_deny_stops_root_for_pages() {
    let resolver = resolver_with(&[
        deny("N.Docs", "read_all", "U.alice"),
        grant("N.", "read_all", "U.alice"),
    ]);

    assert_eq!(resolver.resolve_page("Docs.Main", "read", "alice", &[]), Verdict::Denied);
}

// ============================================================================
// Directories
// ============================================================================

#[test]
fn directory_walks_up_to_ancestor_grant() {
    let resolver = resolver_with(&[grant("D.fs/a/", "read", "U.carol")]);

    assert_eq!(resolver.resolve_directory("fs", "/a/b/c/", "read", "carol", &[]), Verdict::Granted);
    assert_eq!(resolver.resolve_directory("fs", "a/b/c", "read", "carol", &[]), Verdict::Granted);
    assert_eq!(resolver.resolve_directory("fs", "/z/", "read", "carol", &[]), Verdict::Unknown);
}

#[test]
fn closer_directory_deny_stops_the_walk() {
    let resolver = resolver_with(&[
        grant("D.fs/a/", "read", "U.carol"),
        deny("D.fs/a/b/", "read", "U.carol"),
    ]);

    assert_eq!(resolver.resolve_directory("fs", "/a/b/c/", "read", "carol", &[]), Verdict::Denied);
    assert_eq!(resolver.resolve_directory("fs", "/a/x/", "read", "carol", &[]), Verdict::Granted);
}

#[test]
fn directory_local_escalation_at_each_level() {
    let resolver = resolver_with(&[grant("D.fs/", "manage", "U.carol")]);

    assert_eq!(resolver.resolve_directory("fs", "/a/b/", "read", "carol", &[]), Verdict::Granted);
}

#[test]
fn directory_escalates_to_global_after_root() {
    let resolver = resolver_with(&[grant("G", "admin_all", "U.carol")]);
    assert_eq!(resolver.resolve_directory("fs", "/a/b/", "read", "carol", &[]), Verdict::Granted);

    let resolver = resolver_with(&[
        grant("G", "admin_all", "U.carol"),
        deny("D.fs/", "read", "U.carol"),
    ]);
    assert_eq!(resolver.resolve_directory("fs", "/a/b/", "read", "carol", &[]), Verdict::Denied);
}

#[test]
fn providers_are_distinct() {
    let resolver = resolver_with(&[grant("D.fs/a/", "read", "U.carol")]);

    assert_eq!(resolver.resolve_directory("s3", "/a/", "read", "carol", &[]), Verdict::Unknown);
}

// ============================================================================
// Store failures
// ============================================================================

struct FailingStore;

impl EntryStore for FailingStore {
    fn load_all(&self) -> Result<Vec<AccessEntry>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn entries_for_resource(&self, _resource: &str) -> Result<Vec<AccessEntry>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn entries_for_subject(&self, _subject: &str) -> Result<Vec<AccessEntry>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn store(&self, _entry: AccessEntry) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }

    fn delete(&self, _resource: &str, _action: &str, _subject: &str) -> Result<bool, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn delete_all_for_resource(&self, _resource: &str) -> Result<usize, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn rename_resource(&self, _old: &str, _new: &str) -> Result<bool, StoreError> {
        Err(StoreError::Poisoned)
    }
}

#[test]
fn store_failure_resolves_to_unknown() {
    let resolver = Resolver::new(Arc::new(FailingStore), rules());

    assert_eq!(resolver.resolve_page("Docs.Main", "read", "alice", &[]), Verdict::Unknown);
    assert_eq!(resolver.resolve_directory("fs", "/a/", "read", "alice", &[]), Verdict::Unknown);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: a grant on an ancestor directory reaches every descendant
    /// that has no entries of its own.
    #[test]
    fn prop_ancestor_grant_reaches_descendants(
        ancestor in prop::collection::vec("[a-z]{1,6}", 0..3),
        rest in prop::collection::vec("[a-z]{1,6}", 0..4),
    ) {
        let ancestor_path = format!("/{}", ancestor.iter().map(|s| format!("{s}/")).collect::<String>());
        let full_path = format!(
            "{ancestor_path}{}",
            rest.iter().map(|s| format!("{s}/")).collect::<String>()
        );
        let resolver = resolver_with(&[grant(&format!("D.fs{ancestor_path}"), "read", "U.dave")]);

        prop_assert_eq!(
            resolver.resolve_directory("fs", &full_path, "read", "dave", &[]),
            Verdict::Granted
        );
    }
}
