//! The engine handle and its shared state.

use std::sync::Arc;

use tracing::info;
use warden_acl::{EscalationRules, Resolver};
use warden_config::WardenConfig;
use warden_store::{EntryStore, FileEntryStore};

use crate::checker::AuthChecker;
use crate::error::Result;
use crate::reader::AuthReader;
use crate::writer::AuthWriter;

/// State shared by every facade handed out by one engine.
pub(crate) struct EngineInner {
    pub(crate) store: Arc<dyn EntryStore>,
    pub(crate) resolver: Resolver,
    pub(crate) admin_user: String,
}

/// Entry point: owns the entry store, the escalation rules, and the name of
/// the super-user.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct AclEngine {
    inner: Arc<EngineInner>,
}

impl AclEngine {
    /// Opens the file store named by `config` with the standard escalation
    /// rules.
    ///
    /// Creates the data directory and an empty ACL file if needed. Failing to
    /// do so is fatal.
    pub fn open(config: &WardenConfig) -> Result<Self> {
        let path = config.store_path();
        let store = FileEntryStore::open(&path)?;
        info!(path = %path.display(), admin = %config.security.admin_user, "acl store opened");

        Ok(Self::with_store(
            Arc::new(store),
            EscalationRules::standard(),
            config.security.admin_user.clone(),
        ))
    }

    /// Builds an engine over any store and rule set.
    pub fn with_store(
        store: Arc<dyn EntryStore>,
        rules: EscalationRules,
        admin_user: impl Into<String>,
    ) -> Self {
        let resolver = Resolver::new(Arc::clone(&store), rules);
        Self {
            inner: Arc::new(EngineInner {
                store,
                resolver,
                admin_user: admin_user.into(),
            }),
        }
    }

    pub fn checker(&self) -> AuthChecker {
        AuthChecker::new(Arc::clone(&self.inner))
    }

    pub fn writer(&self) -> AuthWriter {
        AuthWriter::new(Arc::clone(&self.inner))
    }

    pub fn reader(&self) -> AuthReader {
        AuthReader::new(Arc::clone(&self.inner))
    }

    pub fn admin_user(&self) -> &str {
        &self.inner.admin_user
    }

    pub fn store(&self) -> &Arc<dyn EntryStore> {
        &self.inner.store
    }
}

impl std::fmt::Debug for AclEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AclEngine")
            .field("admin_user", &self.inner.admin_user)
            .finish_non_exhaustive()
    }
}
