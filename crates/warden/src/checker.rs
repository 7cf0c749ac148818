//! Permission checks.

use std::sync::Arc;

use tracing::debug;
use warden_types::{ResourceKind, Verdict};

use crate::engine::EngineInner;
use crate::error::Result;
use crate::validate;

/// Answers "may this user do this here?".
///
/// Only [`Verdict::Granted`] maps to `true`; `Denied` and `Unknown` are both
/// `false`. The configured super-user is granted everything without reading
/// the store, so corrupt ACL data can never lock them out.
#[derive(Clone)]
pub struct AuthChecker {
    inner: Arc<EngineInner>,
}

impl AuthChecker {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    pub fn check_action_for_global(
        &self,
        action: &str,
        user: &str,
        groups: &[String],
    ) -> Result<bool> {
        validate::check_action(ResourceKind::Global, action)?;
        self.validate_caller(user, groups)?;

        if self.is_admin(user) {
            return Ok(true);
        }

        let verdict = self.inner.resolver.resolve_global(action, user, groups);
        Ok(collapse(verdict))
    }

    /// `None` checks the root namespace.
    pub fn check_action_for_namespace(
        &self,
        namespace: Option<&str>,
        action: &str,
        user: &str,
        groups: &[String],
    ) -> Result<bool> {
        validate::namespace(namespace)?;
        validate::check_action(ResourceKind::Namespace, action)?;
        self.validate_caller(user, groups)?;

        if self.is_admin(user) {
            return Ok(true);
        }

        let verdict = self
            .inner
            .resolver
            .resolve_namespace(namespace, action, user, groups);
        Ok(collapse(verdict))
    }

    /// `page` is the full name, `Namespace.Page` or `Page` for the root.
    pub fn check_action_for_page(
        &self,
        page: &str,
        action: &str,
        user: &str,
        groups: &[String],
    ) -> Result<bool> {
        validate::page(page)?;
        validate::check_action(ResourceKind::Page, action)?;
        self.validate_caller(user, groups)?;

        if self.is_admin(user) {
            return Ok(true);
        }

        let verdict = self.inner.resolver.resolve_page(page, action, user, groups);
        Ok(collapse(verdict))
    }

    pub fn check_action_for_directory(
        &self,
        provider: &str,
        path: &str,
        action: &str,
        user: &str,
        groups: &[String],
    ) -> Result<bool> {
        validate::provider(provider)?;
        validate::directory_path(path)?;
        validate::check_action(ResourceKind::Directory, action)?;
        self.validate_caller(user, groups)?;

        if self.is_admin(user) {
            return Ok(true);
        }

        let verdict = self
            .inner
            .resolver
            .resolve_directory(provider, path, action, user, groups);
        Ok(collapse(verdict))
    }

    fn validate_caller(&self, user: &str, groups: &[String]) -> Result<()> {
        validate::user(user)?;
        validate::groups(groups)
    }

    fn is_admin(&self, user: &str) -> bool {
        let admin = user == self.inner.admin_user;
        if admin {
            debug!(user, "admin bypass");
        }
        admin
    }
}

/// Default deny: anything short of an explicit grant is "not authorized".
fn collapse(verdict: Verdict) -> bool {
    verdict.is_granted()
}
