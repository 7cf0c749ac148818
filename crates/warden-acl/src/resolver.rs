//! Hierarchical resolution.
//!
//! The resolver composes [`evaluate`] calls across the resource hierarchy.
//! Each public method walks a fixed sequence of tiers and stops at the first
//! conclusive verdict:
//!
//! | Kind      | Tiers                                                              |
//! |-----------|--------------------------------------------------------------------|
//! | Global    | Direct                                                             |
//! | Namespace | Direct, Local, Root namespace, Global                              |
//! | Page      | Direct, Local, Owning namespace then root (no Local), Global       |
//! | Directory | Direct + Local at each level from the directory up to `/`, Global  |
//!
//! Recursion state is carried by [`Reach`], which names the tiers a call may
//! still enter, so a local escalation can never re-enter local escalation.

use std::sync::Arc;

use tracing::{debug, error};
use warden_store::EntryStore;
use warden_types::{
    AccessEntry, ResourceId, ResourceKind, Verdict, namespace_of_page, normalize_directory,
    parent_directory,
};

use crate::escalation::EscalationRules;
use crate::evaluator::evaluate;

// ============================================================================
// Reach
// ============================================================================

/// Escalation tiers still permitted for one resolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reach {
    local: bool,
    parent: bool,
    global: bool,
}

impl Reach {
    const ALL: Self = Self {
        local: true,
        parent: true,
        global: true,
    };

    fn without_local(self) -> Self {
        Self {
            local: false,
            ..self
        }
    }

    fn without_global(self) -> Self {
        Self {
            global: false,
            ..self
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves verdicts against a shared entry store and fixed escalation rules.
///
/// Holds no locks of its own; every level reads a fresh snapshot from the
/// store.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn EntryStore>,
    rules: Arc<EscalationRules>,
}

impl Resolver {
    pub fn new(store: Arc<dyn EntryStore>, rules: EscalationRules) -> Self {
        Self {
            store,
            rules: Arc::new(rules),
        }
    }

    pub fn rules(&self) -> &EscalationRules {
        &self.rules
    }

    /// Resolves an action on the global resource. There is no broader scope.
    pub fn resolve_global(&self, action: &str, user: &str, groups: &[String]) -> Verdict {
        let verdict = self.evaluate_at(ResourceId::global().as_str(), action, user, groups);
        debug!(action, user, ?verdict, "resolved global action");
        verdict
    }

    /// Resolves an action on a namespace; `None` is the root namespace.
    pub fn resolve_namespace(
        &self,
        namespace: Option<&str>,
        action: &str,
        user: &str,
        groups: &[String],
    ) -> Verdict {
        let verdict = self.namespace(namespace, action, user, groups, Reach::ALL);
        debug!(namespace, action, user, ?verdict, "resolved namespace action");
        verdict
    }

    /// Resolves an action on a page, by full name.
    pub fn resolve_page(&self, page: &str, action: &str, user: &str, groups: &[String]) -> Verdict {
        let verdict = self.page(page, action, user, groups, Reach::ALL);
        debug!(page, action, user, ?verdict, "resolved page action");
        verdict
    }

    /// Resolves an action on a directory of a storage provider.
    ///
    /// The path is normalized first, so `"a/b"` and `"/a/b/"` are the same
    /// directory.
    pub fn resolve_directory(
        &self,
        provider: &str,
        path: &str,
        action: &str,
        user: &str,
        groups: &[String],
    ) -> Verdict {
        let verdict = self.directory(provider, path, action, user, groups);
        debug!(provider, path, action, user, ?verdict, "resolved directory action");
        verdict
    }

    // ========================================================================
    // Tiers
    // ========================================================================

    fn namespace(
        &self,
        namespace: Option<&str>,
        action: &str,
        user: &str,
        groups: &[String],
        reach: Reach,
    ) -> Verdict {
        let namespace = namespace.filter(|name| !name.is_empty());
        let resource = ResourceId::namespace(namespace);

        // Direct
        let verdict = self.evaluate_at(resource.as_str(), action, user, groups);
        if verdict.is_conclusive() {
            return verdict;
        }

        // Local
        if reach.local {
            let verdict = first_conclusive(
                self.rules.local(ResourceKind::Namespace, action),
                |implied| self.namespace(namespace, implied, user, groups, reach.without_local()),
            );
            if verdict.is_conclusive() {
                return verdict;
            }
        }

        // Root namespace, with the original action
        if reach.parent && namespace.is_some() {
            let verdict = self.namespace(None, action, user, groups, reach.without_global());
            if verdict.is_conclusive() {
                return verdict;
            }
        }

        // Global
        if reach.global {
            return self.global_escalation(ResourceKind::Namespace, action, user, groups);
        }

        Verdict::Unknown
    }

    fn page(&self, page: &str, action: &str, user: &str, groups: &[String], reach: Reach) -> Verdict {
        let resource = ResourceId::page(page);

        // Direct
        let verdict = self.evaluate_at(resource.as_str(), action, user, groups);
        if verdict.is_conclusive() {
            return verdict;
        }

        // Local
        if reach.local {
            let verdict = first_conclusive(self.rules.local(ResourceKind::Page, action), |implied| {
                self.page(page, implied, user, groups, reach.without_local())
            });
            if verdict.is_conclusive() {
                return verdict;
            }
        }

        let namespace_actions = self.rules.parent(ResourceKind::Page, action);

        // Owning namespace and then the root, with the namespace actions only
        if reach.parent {
            let owner = namespace_of_page(page);
            let verdict = first_conclusive(namespace_actions, |namespace_action| {
                self.namespace(
                    owner,
                    namespace_action,
                    user,
                    groups,
                    Reach::ALL.without_local().without_global(),
                )
            });
            if verdict.is_conclusive() {
                return verdict;
            }
        }

        // Global, through the namespace actions' global escalators
        if reach.global {
            return first_conclusive(namespace_actions, |namespace_action| {
                self.global_escalation(ResourceKind::Namespace, namespace_action, user, groups)
            });
        }

        Verdict::Unknown
    }

    fn directory(
        &self,
        provider: &str,
        path: &str,
        action: &str,
        user: &str,
        groups: &[String],
    ) -> Verdict {
        let mut current = Some(normalize_directory(path));

        while let Some(directory) = current {
            let resource = ResourceId::directory(provider, &directory);
            let entries = self.entries(resource.as_str());

            let verdict = evaluate(&entries, action, user, groups);
            if verdict.is_conclusive() {
                return verdict;
            }

            // Local escalation stays on this exact directory.
            let verdict = first_conclusive(
                self.rules.local(ResourceKind::Directory, action),
                |implied| evaluate(&entries, implied, user, groups),
            );
            if verdict.is_conclusive() {
                return verdict;
            }

            current = parent_directory(&directory);
        }

        self.global_escalation(ResourceKind::Directory, action, user, groups)
    }

    /// Checks the global escalators of `action` directly on the global
    /// resource.
    fn global_escalation(
        &self,
        kind: ResourceKind,
        action: &str,
        user: &str,
        groups: &[String],
    ) -> Verdict {
        let escalators = self.rules.parent(kind, action);
        if escalators.is_empty() {
            return Verdict::Unknown;
        }

        let entries = self.entries(ResourceId::global().as_str());
        first_conclusive(escalators, |global_action| {
            evaluate(&entries, global_action, user, groups)
        })
    }

    fn evaluate_at(&self, resource: &str, action: &str, user: &str, groups: &[String]) -> Verdict {
        evaluate(&self.entries(resource), action, user, groups)
    }

    /// Reads one resource's entries. A failing store reads as empty, which
    /// resolves to the default deny.
    fn entries(&self, resource: &str) -> Vec<AccessEntry> {
        self.store
            .entries_for_resource(resource)
            .unwrap_or_else(|e| {
                error!(resource, error = %e, "failed to read acl entries, denying");
                Vec::new()
            })
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

/// Returns the first conclusive verdict produced for `actions`, in order.
fn first_conclusive(actions: &[String], mut resolve: impl FnMut(&str) -> Verdict) -> Verdict {
    actions
        .iter()
        .map(|action| resolve(action))
        .find(|verdict| verdict.is_conclusive())
        .unwrap_or(Verdict::Unknown)
}
