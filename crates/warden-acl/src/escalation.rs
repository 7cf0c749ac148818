//! Escalation tables.
//!
//! Escalation rules are configuration, not logic. They are built once and
//! handed to the [`Resolver`](crate::Resolver), so tests can inject synthetic
//! tables and deployments can ship their own.
//!
//! Two maps are kept per resource kind:
//!
//! - **local**: `action -> [actions]` at the *same* resource that imply
//!   `action` (holding "manage_page" on a page implies "read_page" there)
//! - **parent**: `action -> [actions]` to check at the broader scope
//!   (page actions map to namespace actions; namespace and directory actions
//!   map to global actions)

use std::collections::HashMap;

use warden_types::ResourceKind;
use warden_types::actions::{directory, global, namespace, page};

type ActionMap = HashMap<String, Vec<String>>;

/// Action escalation tables, per resource kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscalationRules {
    local: HashMap<ResourceKind, ActionMap>,
    parent: HashMap<ResourceKind, ActionMap>,
}

impl EscalationRules {
    /// Creates empty tables: no action implies any other.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that any of `implied_by`, held on the same resource, implies
    /// `action`.
    pub fn with_local(mut self, kind: ResourceKind, action: &str, implied_by: &[&str]) -> Self {
        extend(self.local.entry(kind).or_default(), action, implied_by);
        self
    }

    /// Declares which actions to check at the broader scope when `action` is
    /// unresolved on a resource of `kind`.
    pub fn with_parent(mut self, kind: ResourceKind, action: &str, escalate_to: &[&str]) -> Self {
        extend(self.parent.entry(kind).or_default(), action, escalate_to);
        self
    }

    /// Returns the same-resource actions that imply `action`.
    pub fn local(&self, kind: ResourceKind, action: &str) -> &[String] {
        lookup(&self.local, kind, action)
    }

    /// Returns the broader-scope actions to check for `action`.
    pub fn parent(&self, kind: ResourceKind, action: &str) -> &[String] {
        lookup(&self.parent, kind, action)
    }

    /// The tables shipped with Warden for the standard action catalog.
    pub fn standard() -> Self {
        use ResourceKind::{Directory, Namespace, Page};

        Self::new()
            // Pages: stronger page actions imply weaker ones.
            .with_local(Page, page::READ_PAGE, &[page::MODIFY_PAGE, page::MANAGE_PAGE])
            .with_local(Page, page::MODIFY_PAGE, &[page::MANAGE_PAGE])
            .with_local(Page, page::MANAGE_CATEGORIES, &[page::MANAGE_PAGE])
            .with_local(
                Page,
                page::READ_DISCUSSION,
                &[page::POST_DISCUSSION, page::MANAGE_DISCUSSION],
            )
            .with_local(Page, page::POST_DISCUSSION, &[page::MANAGE_DISCUSSION])
            .with_local(
                Page,
                page::DOWNLOAD_ATTACHMENTS,
                &[page::UPLOAD_ATTACHMENTS, page::DELETE_ATTACHMENTS],
            )
            .with_local(Page, page::UPLOAD_ATTACHMENTS, &[page::DELETE_ATTACHMENTS])
            // Pages escalate to the namespace actions that cover them. The
            // namespace tier runs without local escalation, so each list
            // names the stronger namespace actions too.
            .with_parent(
                Page,
                page::READ_PAGE,
                &[
                    namespace::READ_PAGES,
                    namespace::CREATE_PAGES,
                    namespace::MODIFY_PAGES,
                    namespace::DELETE_PAGES,
                    namespace::MANAGE_PAGES,
                ],
            )
            .with_parent(
                Page,
                page::MODIFY_PAGE,
                &[namespace::MODIFY_PAGES, namespace::MANAGE_PAGES],
            )
            .with_parent(Page, page::MANAGE_PAGE, &[namespace::MANAGE_PAGES])
            .with_parent(
                Page,
                page::READ_DISCUSSION,
                &[
                    namespace::READ_DISCUSSION,
                    namespace::POST_DISCUSSION,
                    namespace::MANAGE_DISCUSSION,
                ],
            )
            .with_parent(
                Page,
                page::POST_DISCUSSION,
                &[namespace::POST_DISCUSSION, namespace::MANAGE_DISCUSSION],
            )
            .with_parent(Page, page::MANAGE_DISCUSSION, &[namespace::MANAGE_DISCUSSION])
            .with_parent(
                Page,
                page::MANAGE_CATEGORIES,
                &[namespace::MANAGE_CATEGORIES, namespace::MANAGE_PAGES],
            )
            .with_parent(
                Page,
                page::DOWNLOAD_ATTACHMENTS,
                &[
                    namespace::DOWNLOAD_ATTACHMENTS,
                    namespace::UPLOAD_ATTACHMENTS,
                    namespace::DELETE_ATTACHMENTS,
                ],
            )
            .with_parent(
                Page,
                page::UPLOAD_ATTACHMENTS,
                &[namespace::UPLOAD_ATTACHMENTS, namespace::DELETE_ATTACHMENTS],
            )
            .with_parent(Page, page::DELETE_ATTACHMENTS, &[namespace::DELETE_ATTACHMENTS])
            // Namespaces.
            .with_local(
                Namespace,
                namespace::READ_PAGES,
                &[
                    namespace::CREATE_PAGES,
                    namespace::MODIFY_PAGES,
                    namespace::DELETE_PAGES,
                    namespace::MANAGE_PAGES,
                ],
            )
            .with_local(Namespace, namespace::CREATE_PAGES, &[namespace::MANAGE_PAGES])
            .with_local(Namespace, namespace::MODIFY_PAGES, &[namespace::MANAGE_PAGES])
            .with_local(Namespace, namespace::DELETE_PAGES, &[namespace::MANAGE_PAGES])
            .with_local(Namespace, namespace::MANAGE_CATEGORIES, &[namespace::MANAGE_PAGES])
            .with_local(
                Namespace,
                namespace::READ_DISCUSSION,
                &[namespace::POST_DISCUSSION, namespace::MANAGE_DISCUSSION],
            )
            .with_local(
                Namespace,
                namespace::POST_DISCUSSION,
                &[namespace::MANAGE_DISCUSSION],
            )
            .with_local(
                Namespace,
                namespace::DOWNLOAD_ATTACHMENTS,
                &[namespace::UPLOAD_ATTACHMENTS, namespace::DELETE_ATTACHMENTS],
            )
            .with_local(
                Namespace,
                namespace::UPLOAD_ATTACHMENTS,
                &[namespace::DELETE_ATTACHMENTS],
            )
            .with_namespace_to_global(
                &[
                    namespace::READ_PAGES,
                    namespace::CREATE_PAGES,
                    namespace::MODIFY_PAGES,
                    namespace::DELETE_PAGES,
                    namespace::MANAGE_PAGES,
                    namespace::MANAGE_CATEGORIES,
                    namespace::DOWNLOAD_ATTACHMENTS,
                    namespace::UPLOAD_ATTACHMENTS,
                    namespace::DELETE_ATTACHMENTS,
                ],
                global::MANAGE_PAGES_AND_CATEGORIES,
            )
            .with_namespace_to_global(
                &[
                    namespace::READ_DISCUSSION,
                    namespace::POST_DISCUSSION,
                    namespace::MANAGE_DISCUSSION,
                ],
                global::MANAGE_DISCUSSIONS,
            )
            .with_namespace_to_global(
                &[namespace::MANAGE_NAVIGATION_PATHS],
                global::MANAGE_NAVIGATION_PATHS,
            )
            // Directories: the walk to the parent is structural, only the
            // local and global tables are configured.
            .with_local(
                Directory,
                directory::LIST,
                &[
                    directory::DOWNLOAD_FILES,
                    directory::UPLOAD_FILES,
                    directory::CREATE_DIRECTORIES,
                    directory::DELETE_FILES,
                    directory::DELETE_DIRECTORIES,
                ],
            )
            .with_local(
                Directory,
                directory::DOWNLOAD_FILES,
                &[directory::UPLOAD_FILES, directory::DELETE_FILES],
            )
            .with_local(Directory, directory::UPLOAD_FILES, &[directory::DELETE_FILES])
            .with_local(
                Directory,
                directory::CREATE_DIRECTORIES,
                &[directory::DELETE_DIRECTORIES],
            )
            .with_directory_to_global(directory::ALL, global::MANAGE_FILES)
    }

    fn with_namespace_to_global(self, actions: &[&str], global_action: &str) -> Self {
        actions.iter().fold(self, |rules, action| {
            rules.with_parent(ResourceKind::Namespace, action, &[global_action])
        })
    }

    fn with_directory_to_global(self, actions: &[&str], global_action: &str) -> Self {
        actions.iter().fold(self, |rules, action| {
            rules.with_parent(ResourceKind::Directory, action, &[global_action])
        })
    }
}

fn extend(map: &mut ActionMap, action: &str, targets: &[&str]) {
    let list = map.entry(action.to_string()).or_default();
    for target in targets {
        if !list.iter().any(|t| t == target) {
            list.push((*target).to_string());
        }
    }
}

fn lookup<'a>(tables: &'a HashMap<ResourceKind, ActionMap>, kind: ResourceKind, action: &str) -> &'a [String] {
    tables
        .get(&kind)
        .and_then(|map| map.get(action))
        .map_or(&[], Vec::as_slice)
}
