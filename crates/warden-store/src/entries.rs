//! Entry-set operations shared by every store implementation.
//!
//! Each mutation reports whether it changed the set so the file store can
//! skip rewriting an unchanged file.

use warden_types::{AccessEntry, canonical_subject};

pub(crate) fn for_resource(entries: &[AccessEntry], resource: &str) -> Vec<AccessEntry> {
    entries
        .iter()
        .filter(|e| e.resource() == resource)
        .cloned()
        .collect()
}

/// The prefix letter of `subject` is not significant.
pub(crate) fn for_subject(entries: &[AccessEntry], subject: &str) -> Vec<AccessEntry> {
    let subject = canonical_subject(subject);
    entries
        .iter()
        .filter(|e| e.subject() == subject)
        .cloned()
        .collect()
}

/// Replaces the entry with the same key in place, or appends.
pub(crate) fn upsert(entries: &mut Vec<AccessEntry>, entry: AccessEntry) -> bool {
    let existing = entries
        .iter()
        .position(|e| e.has_key(entry.resource(), entry.action(), entry.subject()));

    match existing {
        Some(index) if entries[index] == entry => false,
        Some(index) => {
            entries[index] = entry;
            true
        }
        None => {
            entries.push(entry);
            true
        }
    }
}

/// Removes every entry with the key; duplicates left by older writers go too.
pub(crate) fn remove(
    entries: &mut Vec<AccessEntry>,
    resource: &str,
    action: &str,
    subject: &str,
) -> bool {
    let before = entries.len();
    entries.retain(|e| !e.has_key(resource, action, subject));
    entries.len() != before
}

pub(crate) fn remove_resource(entries: &mut Vec<AccessEntry>, resource: &str) -> usize {
    let before = entries.len();
    entries.retain(|e| e.resource() != resource);
    before - entries.len()
}

/// Rebinds `old` entries to `new`. A renamed entry replaces any entry already
/// stored under `new` with the same action and subject.
pub(crate) fn rename_resource(entries: &mut Vec<AccessEntry>, old: &str, new: &str) -> bool {
    if old == new {
        return entries.iter().any(|e| e.resource() == old);
    }

    let moving: Vec<(String, String)> = entries
        .iter()
        .filter(|e| e.resource() == old)
        .map(|e| (e.action().to_string(), e.subject().to_string()))
        .collect();
    entries.retain(|e| {
        e.resource() != new
            || !moving
                .iter()
                .any(|(action, subject)| e.action() == action && e.subject() == subject)
    });

    let mut renamed = false;
    for entry in entries.iter_mut().filter(|e| e.resource() == old) {
        *entry = entry.with_resource(new);
        renamed = true;
    }
    renamed
}
