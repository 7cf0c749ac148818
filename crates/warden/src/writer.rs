//! Permission changes and their audit trail.
//!
//! Every store mutation emits one event on the `warden::audit` target with
//! the resource prefix and name, the action, the subject, the requested
//! status, and the outcome. Successful changes log at `info`, failed ones at
//! `error`.
//!
//! Store failures are not returned as errors: the `set_permission_for_*`,
//! removal, and rename operations report `false` and the caller decides
//! whether to retry. [`AuthWriter::change_permission`] reports a
//! [`ChangeOutcome`] instead, which tells a missing entry from a failed
//! store.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::sync::Arc;

use tracing::{error, info};
use warden_store::StoreError;
use warden_types::{
    AccessEntry, EntryValue, ResourceId, ResourceKind, Subject, namespace_of_page,
};

use crate::engine::EngineInner;
use crate::error::Result;
use crate::validate;

/// Tracing target for audit events.
pub const AUDIT_TARGET: &str = "warden::audit";

/// Requested state of one (resource, action, subject) entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Grant,
    Deny,
    /// Remove the entry, whatever its value.
    Delete,
}

impl Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PermissionStatus::Grant => "grant",
            PermissionStatus::Deny => "deny",
            PermissionStatus::Delete => "delete",
        })
    }
}

/// Resource whose entry [`AuthWriter::change_permission`] changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionTarget<'a> {
    Global,
    /// `None` is the root namespace.
    Namespace(Option<&'a str>),
    /// A page, by full name.
    Page(&'a str),
    Directory { provider: &'a str, path: &'a str },
}

impl PermissionTarget<'_> {
    fn resource(self) -> Result<ResourceId> {
        Ok(match self {
            PermissionTarget::Global => ResourceId::global(),
            PermissionTarget::Namespace(namespace) => {
                validate::namespace(namespace)?;
                ResourceId::namespace(namespace)
            }
            PermissionTarget::Page(page) => {
                validate::page(page)?;
                ResourceId::page(page)
            }
            PermissionTarget::Directory { provider, path } => {
                validate::provider(provider)?;
                validate::directory_path(path)?;
                ResourceId::directory(provider, path)
            }
        })
    }
}

/// What a single entry change did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The entry was written or removed.
    Applied,
    /// `Delete` found no entry to remove.
    NotFound,
    /// The store could not be read or written.
    Failed,
}

impl ChangeOutcome {
    pub fn is_applied(self) -> bool {
        self == ChangeOutcome::Applied
    }
}

/// Grants, denies, and removes entries; propagates deletes and renames of
/// the protected objects.
#[derive(Clone)]
pub struct AuthWriter {
    inner: Arc<EngineInner>,
}

impl AuthWriter {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    // ========================================================================
    // Set permission
    // ========================================================================

    /// Sets an entry on the global resource.
    ///
    /// Returns `false` when the store failed, or when `Delete` found nothing
    /// to remove.
    pub fn set_permission_for_global(
        &self,
        status: PermissionStatus,
        action: &str,
        subject: &Subject,
    ) -> Result<bool> {
        self.change_permission(PermissionTarget::Global, status, action, subject)
            .map(ChangeOutcome::is_applied)
    }

    /// `None` targets the root namespace.
    pub fn set_permission_for_namespace(
        &self,
        status: PermissionStatus,
        namespace: Option<&str>,
        action: &str,
        subject: &Subject,
    ) -> Result<bool> {
        self.change_permission(PermissionTarget::Namespace(namespace), status, action, subject)
            .map(ChangeOutcome::is_applied)
    }

    pub fn set_permission_for_page(
        &self,
        status: PermissionStatus,
        page: &str,
        action: &str,
        subject: &Subject,
    ) -> Result<bool> {
        self.change_permission(PermissionTarget::Page(page), status, action, subject)
            .map(ChangeOutcome::is_applied)
    }

    pub fn set_permission_for_directory(
        &self,
        status: PermissionStatus,
        provider: &str,
        path: &str,
        action: &str,
        subject: &Subject,
    ) -> Result<bool> {
        self.change_permission(
            PermissionTarget::Directory { provider, path },
            status,
            action,
            subject,
        )
        .map(ChangeOutcome::is_applied)
    }

    /// Sets or deletes one entry and reports what happened to it.
    ///
    /// Invalid arguments are errors. A store failure is
    /// [`ChangeOutcome::Failed`], and a `Delete` with nothing to remove is
    /// [`ChangeOutcome::NotFound`].
    pub fn change_permission(
        &self,
        target: PermissionTarget<'_>,
        status: PermissionStatus,
        action: &str,
        subject: &Subject,
    ) -> Result<ChangeOutcome> {
        let resource = target.resource()?;
        validate::assignable_action(resource.kind(), action)?;
        validate::subject(subject)?;

        let subject = subject.to_entry_subject();
        let outcome = match status {
            PermissionStatus::Grant | PermissionStatus::Deny => {
                let value = if status == PermissionStatus::Grant {
                    EntryValue::Grant
                } else {
                    EntryValue::Deny
                };
                let entry = AccessEntry::new(resource.as_str(), action, subject.as_str(), value);
                self.inner.store.store(entry).map(|()| true)
            }
            PermissionStatus::Delete => {
                self.inner
                    .store
                    .delete(resource.as_str(), action, &subject)
            }
        };

        Ok(audit_change(resource.as_str(), action, &subject, status, &outcome))
    }

    // ========================================================================
    // Subject removal
    // ========================================================================

    /// Removes every entry `subject` holds on the global resource.
    ///
    /// Stops at the first failed deletion and reports `false`.
    pub fn remove_entries_for_global(&self, subject: &Subject) -> Result<bool> {
        self.remove_entries_on(subject, &ResourceId::global())
    }

    pub fn remove_entries_for_namespace(
        &self,
        subject: &Subject,
        namespace: Option<&str>,
    ) -> Result<bool> {
        validate::namespace(namespace)?;
        self.remove_entries_on(subject, &ResourceId::namespace(namespace))
    }

    pub fn remove_entries_for_page(&self, subject: &Subject, page: &str) -> Result<bool> {
        validate::page(page)?;
        self.remove_entries_on(subject, &ResourceId::page(page))
    }

    pub fn remove_entries_for_directory(
        &self,
        subject: &Subject,
        provider: &str,
        path: &str,
    ) -> Result<bool> {
        validate::provider(provider)?;
        validate::directory_path(path)?;
        self.remove_entries_on(subject, &ResourceId::directory(provider, path))
    }

    /// Removes every entry of a user or group, on every resource. Called when
    /// the account or group itself is deleted.
    pub fn remove_all_for_subject(&self, subject: &Subject) -> Result<bool> {
        validate::subject(subject)?;
        Ok(self.remove_subject_entries(subject, |_| true))
    }

    fn remove_entries_on(&self, subject: &Subject, resource: &ResourceId) -> Result<bool> {
        validate::subject(subject)?;
        Ok(self.remove_subject_entries(subject, |entry| entry.resource() == resource.as_str()))
    }

    fn remove_subject_entries(
        &self,
        subject: &Subject,
        keep: impl Fn(&AccessEntry) -> bool,
    ) -> bool {
        let subject = subject.to_entry_subject();
        let entries = match self.inner.store.entries_for_subject(&subject) {
            Ok(entries) => entries,
            Err(e) => {
                error!(
                    target: AUDIT_TARGET,
                    subject = %subject,
                    error = %e,
                    "failed to list subject entries"
                );
                return false;
            }
        };

        for entry in entries.iter().filter(|entry| keep(entry)) {
            let outcome = self
                .inner
                .store
                .delete(entry.resource(), entry.action(), entry.subject());
            audit_change(
                entry.resource(),
                entry.action(),
                &subject,
                PermissionStatus::Delete,
                &outcome,
            );
            if outcome.is_err() {
                return false;
            }
        }
        true
    }

    // ========================================================================
    // Resource removal
    // ========================================================================

    /// Removes the entries of a deleted namespace and of all its pages.
    pub fn clear_entries_for_namespace(&self, namespace: Option<&str>) -> Result<bool> {
        validate::namespace(namespace)?;
        let namespace = namespace.filter(|ns| !ns.is_empty());

        let Some(pages) = self.stored_resources(|resource| {
            resource
                .strip_prefix(ResourceKind::Page.prefix())
                .is_some_and(|page| namespace_of_page(page) == namespace)
        }) else {
            return Ok(false);
        };

        let mut resources = vec![String::from(ResourceId::namespace(namespace))];
        resources.extend(pages);
        Ok(self.clear_resources(&resources))
    }

    /// Removes the entries of a deleted page.
    pub fn clear_entries_for_page(&self, page: &str) -> Result<bool> {
        validate::page(page)?;
        Ok(self.clear_resources(&[String::from(ResourceId::page(page))]))
    }

    /// Removes the entries of a deleted directory and of every directory
    /// below it.
    pub fn clear_entries_for_directory(&self, provider: &str, path: &str) -> Result<bool> {
        validate::provider(provider)?;
        validate::directory_path(path)?;

        let root = ResourceId::directory(provider, path);
        let Some(resources) =
            self.stored_resources(|resource| resource.starts_with(root.as_str()))
        else {
            return Ok(false);
        };

        let mut resources: Vec<String> = resources.into_iter().collect();
        if resources.is_empty() {
            resources.push(root.into());
        }
        Ok(self.clear_resources(&resources))
    }

    fn clear_resources(&self, resources: &[String]) -> bool {
        for resource in resources {
            match self.inner.store.delete_all_for_resource(resource) {
                Ok(removed) => {
                    info!(
                        target: AUDIT_TARGET,
                        resource_prefix = prefix_of(resource),
                        resource = name_of(resource),
                        removed,
                        outcome = "cleared",
                        "acl entries cleared"
                    );
                }
                Err(e) => {
                    error!(
                        target: AUDIT_TARGET,
                        resource_prefix = prefix_of(resource),
                        resource = name_of(resource),
                        outcome = "failed",
                        error = %e,
                        "acl entries clear failed"
                    );
                    return false;
                }
            }
        }
        true
    }

    // ========================================================================
    // Renames
    // ========================================================================

    /// Moves the entries of a renamed namespace, and of every page in it, to
    /// the new name.
    pub fn process_namespace_renaming(&self, old: &str, new: &str) -> Result<bool> {
        validate::named_namespace(old)?;
        validate::named_namespace(new)?;
        if old == new {
            return Ok(true);
        }

        let old_pages = format!("{}{old}.", ResourceKind::Page.prefix());
        let new_pages = format!("{}{new}.", ResourceKind::Page.prefix());
        let Some(pages) = self.stored_resources(|resource| resource.starts_with(&old_pages)) else {
            return Ok(false);
        };

        let mut renames = vec![(
            String::from(ResourceId::namespace(Some(old))),
            String::from(ResourceId::namespace(Some(new))),
        )];
        renames.extend(pages.into_iter().map(|page| {
            let renamed = format!("{new_pages}{}", &page[old_pages.len()..]);
            (page, renamed)
        }));
        Ok(self.rename_resources(&renames))
    }

    /// Moves the entries of a renamed page to its new full name.
    pub fn process_page_renaming(&self, old: &str, new: &str) -> Result<bool> {
        validate::page(old)?;
        validate::page(new)?;
        if old == new {
            return Ok(true);
        }

        Ok(self.rename_resources(&[(
            ResourceId::page(old).into(),
            ResourceId::page(new).into(),
        )]))
    }

    /// Moves the entries of a renamed directory, and of every directory below
    /// it, to the new path within the same provider.
    pub fn process_directory_renaming(&self, provider: &str, old: &str, new: &str) -> Result<bool> {
        validate::provider(provider)?;
        validate::directory_path(old)?;
        validate::directory_path(new)?;

        let old_root = ResourceId::directory(provider, old);
        let new_root = ResourceId::directory(provider, new);
        if old_root == new_root {
            return Ok(true);
        }

        let Some(resources) =
            self.stored_resources(|resource| resource.starts_with(old_root.as_str()))
        else {
            return Ok(false);
        };

        // Deepest first, so moving a directory below itself never renames
        // entries that were already moved.
        let mut renames: Vec<(String, String)> = resources
            .into_iter()
            .map(|resource| {
                let renamed = format!(
                    "{}{}",
                    new_root.as_str(),
                    &resource[old_root.as_str().len()..]
                );
                (resource, renamed)
            })
            .collect();
        renames.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Ok(self.rename_resources(&renames))
    }

    fn rename_resources(&self, renames: &[(String, String)]) -> bool {
        for (old, new) in renames {
            match self.inner.store.rename_resource(old, new) {
                Ok(moved) => {
                    info!(
                        target: AUDIT_TARGET,
                        resource_prefix = prefix_of(old),
                        resource = name_of(old),
                        renamed_to = name_of(new),
                        moved,
                        outcome = "renamed",
                        "acl resource renamed"
                    );
                }
                Err(e) => {
                    error!(
                        target: AUDIT_TARGET,
                        resource_prefix = prefix_of(old),
                        resource = name_of(old),
                        renamed_to = name_of(new),
                        outcome = "failed",
                        error = %e,
                        "acl resource rename failed"
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Distinct stored resources matching `matches`, or `None` when the store
    /// cannot be read.
    fn stored_resources(&self, matches: impl Fn(&str) -> bool) -> Option<BTreeSet<String>> {
        match self.inner.store.load_all() {
            Ok(entries) => Some(
                entries
                    .iter()
                    .map(AccessEntry::resource)
                    .filter(|resource| matches(resource))
                    .map(str::to_string)
                    .collect(),
            ),
            Err(e) => {
                error!(target: AUDIT_TARGET, error = %e, "failed to load acl entries");
                None
            }
        }
    }
}

/// Logs one entry change and classifies its outcome.
fn audit_change(
    resource: &str,
    action: &str,
    subject: &str,
    status: PermissionStatus,
    outcome: &std::result::Result<bool, StoreError>,
) -> ChangeOutcome {
    match outcome {
        Ok(true) => {
            info!(
                target: AUDIT_TARGET,
                resource_prefix = prefix_of(resource),
                resource = name_of(resource),
                action,
                subject,
                status = %status,
                outcome = "applied",
                "acl entry changed"
            );
            ChangeOutcome::Applied
        }
        Ok(false) => {
            info!(
                target: AUDIT_TARGET,
                resource_prefix = prefix_of(resource),
                resource = name_of(resource),
                action,
                subject,
                status = %status,
                outcome = "not_found",
                "acl entry not found"
            );
            ChangeOutcome::NotFound
        }
        Err(e) => {
            error!(
                target: AUDIT_TARGET,
                resource_prefix = prefix_of(resource),
                resource = name_of(resource),
                action,
                subject,
                status = %status,
                outcome = "failed",
                error = %e,
                "acl entry change failed"
            );
            ChangeOutcome::Failed
        }
    }
}

fn prefix_of(resource: &str) -> &'static str {
    ResourceKind::of_resource(resource).map_or("", ResourceKind::prefix)
}

fn name_of(resource: &str) -> &str {
    &resource[prefix_of(resource).len()..]
}
