//! Single-level evaluation.
//!
//! Looks at the entries of one resource only. Escalation to other actions or
//! broader resources is the [`Resolver`](crate::Resolver)'s job.

use warden_types::actions::FULL_CONTROL;
use warden_types::{
    AccessEntry, EntryValue, GROUP_PREFIX, USER_PREFIX, Verdict, canonical_subject,
};

/// Evaluates `action` for a user and their groups against one resource's
/// entries.
///
/// An entry applies when its subject is the user or one of the groups and its
/// action is `action` or the full-control action. Any applicable Deny wins,
/// whether it names the user or a group; otherwise any Grant wins; otherwise
/// the level is `Unknown`.
///
/// # Postcondition
///
/// Pure: no I/O, no locking, never panics.
pub fn evaluate<G: AsRef<str>>(
    entries: &[AccessEntry],
    action: &str,
    user: &str,
    groups: &[G],
) -> Verdict {
    let mut granted = false;

    for entry in entries {
        if entry.action() != action && entry.action() != FULL_CONTROL {
            continue;
        }
        if !is_candidate(entry.subject(), user, groups) {
            continue;
        }

        match entry.value() {
            EntryValue::Deny => return Verdict::Denied,
            EntryValue::Grant => granted = true,
        }
    }

    if granted {
        Verdict::Granted
    } else {
        Verdict::Unknown
    }
}

/// Returns whether a stored subject names the user or one of the groups.
/// The case of the prefix letter is not significant.
fn is_candidate<G: AsRef<str>>(subject: &str, user: &str, groups: &[G]) -> bool {
    let subject: &str = &canonical_subject(subject);
    if let Some(name) = subject.strip_prefix(USER_PREFIX) {
        return name == user;
    }
    if let Some(name) = subject.strip_prefix(GROUP_PREFIX) {
        return groups.iter().any(|g| g.as_ref() == name);
    }
    false
}
