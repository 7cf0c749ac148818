//! Read-only views of stored entries.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{error, warn};
use warden_types::{AccessEntry, EntryValue, ResourceId, Subject};

use crate::engine::EngineInner;
use crate::error::Result;
use crate::validate;

/// Lists what a subject holds on a resource, and who holds anything on it.
///
/// Reads are exact: entries on a broader resource are not included, and no
/// escalation is applied. A store failure reads as an empty result and is
/// logged.
#[derive(Clone)]
pub struct AuthReader {
    inner: Arc<EngineInner>,
}

impl AuthReader {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    // ========================================================================
    // Grants
    // ========================================================================

    /// Actions explicitly granted to `subject` on the global resource.
    pub fn retrieve_grants_for_global(&self, subject: &Subject) -> Result<Vec<String>> {
        self.actions(subject, &ResourceId::global(), EntryValue::Grant)
    }

    pub fn retrieve_grants_for_namespace(
        &self,
        subject: &Subject,
        namespace: Option<&str>,
    ) -> Result<Vec<String>> {
        validate::namespace(namespace)?;
        self.actions(subject, &ResourceId::namespace(namespace), EntryValue::Grant)
    }

    pub fn retrieve_grants_for_page(&self, subject: &Subject, page: &str) -> Result<Vec<String>> {
        validate::page(page)?;
        self.actions(subject, &ResourceId::page(page), EntryValue::Grant)
    }

    pub fn retrieve_grants_for_directory(
        &self,
        subject: &Subject,
        provider: &str,
        path: &str,
    ) -> Result<Vec<String>> {
        validate::provider(provider)?;
        validate::directory_path(path)?;
        self.actions(
            subject,
            &ResourceId::directory(provider, path),
            EntryValue::Grant,
        )
    }

    // ========================================================================
    // Denials
    // ========================================================================

    /// Actions explicitly denied to `subject` on the global resource.
    pub fn retrieve_denials_for_global(&self, subject: &Subject) -> Result<Vec<String>> {
        self.actions(subject, &ResourceId::global(), EntryValue::Deny)
    }

    pub fn retrieve_denials_for_namespace(
        &self,
        subject: &Subject,
        namespace: Option<&str>,
    ) -> Result<Vec<String>> {
        validate::namespace(namespace)?;
        self.actions(subject, &ResourceId::namespace(namespace), EntryValue::Deny)
    }

    pub fn retrieve_denials_for_page(&self, subject: &Subject, page: &str) -> Result<Vec<String>> {
        validate::page(page)?;
        self.actions(subject, &ResourceId::page(page), EntryValue::Deny)
    }

    pub fn retrieve_denials_for_directory(
        &self,
        subject: &Subject,
        provider: &str,
        path: &str,
    ) -> Result<Vec<String>> {
        validate::provider(provider)?;
        validate::directory_path(path)?;
        self.actions(
            subject,
            &ResourceId::directory(provider, path),
            EntryValue::Deny,
        )
    }

    // ========================================================================
    // Subjects
    // ========================================================================

    /// Users and groups with any entry on the global resource, sorted.
    pub fn retrieve_subjects_for_global(&self) -> Vec<Subject> {
        self.subjects(&ResourceId::global())
    }

    pub fn retrieve_subjects_for_namespace(&self, namespace: Option<&str>) -> Result<Vec<Subject>> {
        validate::namespace(namespace)?;
        Ok(self.subjects(&ResourceId::namespace(namespace)))
    }

    pub fn retrieve_subjects_for_page(&self, page: &str) -> Result<Vec<Subject>> {
        validate::page(page)?;
        Ok(self.subjects(&ResourceId::page(page)))
    }

    pub fn retrieve_subjects_for_directory(
        &self,
        provider: &str,
        path: &str,
    ) -> Result<Vec<Subject>> {
        validate::provider(provider)?;
        validate::directory_path(path)?;
        Ok(self.subjects(&ResourceId::directory(provider, path)))
    }

    /// Every entry stored on one exact resource.
    pub fn entries_for_resource(&self, resource: &ResourceId) -> Vec<AccessEntry> {
        self.inner
            .store
            .entries_for_resource(resource.as_str())
            .unwrap_or_else(|e| {
                error!(resource = %resource, error = %e, "failed to read acl entries");
                Vec::new()
            })
    }

    fn actions(
        &self,
        subject: &Subject,
        resource: &ResourceId,
        value: EntryValue,
    ) -> Result<Vec<String>> {
        validate::subject(subject)?;

        let subject = subject.to_entry_subject();
        let entries = self
            .inner
            .store
            .entries_for_subject(&subject)
            .unwrap_or_else(|e| {
                error!(subject = %subject, error = %e, "failed to read acl entries");
                Vec::new()
            });

        Ok(entries
            .into_iter()
            .filter(|entry| entry.resource() == resource.as_str() && entry.value() == value)
            .map(|entry| entry.action().to_string())
            .collect())
    }

    fn subjects(&self, resource: &ResourceId) -> Vec<Subject> {
        let subjects: BTreeSet<Subject> = self
            .entries_for_resource(resource)
            .iter()
            .filter_map(|entry| match entry.subject().parse::<Subject>() {
                Ok(subject) => Some(subject),
                Err(e) => {
                    warn!(resource = %resource, error = %e, "skipping entry with invalid subject");
                    None
                }
            })
            .collect();
        subjects.into_iter().collect()
    }
}
