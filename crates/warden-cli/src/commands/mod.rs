//! CLI command implementations.

pub mod check;
pub mod config;
pub mod list;
pub mod permission;
pub mod rename;

use std::fmt::{self, Display};
use std::str::FromStr;

use anyhow::{Context, Result};
use warden::{AclEngine, PermissionTarget, ResourceId};
use warden_config::WardenConfig;

/// A resource named on the command line.
///
/// Accepted forms: `global`, `namespace:<name>` (empty name for the root),
/// `page:<full name>`, `directory:<provider>:<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceArg {
    Global,
    Namespace(Option<String>),
    Page(String),
    Directory { provider: String, path: String },
}

impl ResourceArg {
    pub fn id(&self) -> ResourceId {
        match self {
            ResourceArg::Global => ResourceId::global(),
            ResourceArg::Namespace(name) => ResourceId::namespace(name.as_deref()),
            ResourceArg::Page(page) => ResourceId::page(page),
            ResourceArg::Directory { provider, path } => ResourceId::directory(provider, path),
        }
    }

    pub fn target(&self) -> PermissionTarget<'_> {
        match self {
            ResourceArg::Global => PermissionTarget::Global,
            ResourceArg::Namespace(name) => PermissionTarget::Namespace(name.as_deref()),
            ResourceArg::Page(page) => PermissionTarget::Page(page),
            ResourceArg::Directory { provider, path } => PermissionTarget::Directory { provider, path },
        }
    }
}

impl FromStr for ResourceArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "global" {
            return Ok(ResourceArg::Global);
        }

        let (kind, rest) = s.split_once(':').ok_or_else(|| {
            format!("'{s}' is not a resource (global, namespace:<name>, page:<name>, directory:<provider>:<path>)")
        })?;

        match kind {
            "namespace" | "ns" => Ok(ResourceArg::Namespace(
                Some(rest.to_string()).filter(|name| !name.is_empty()),
            )),
            "page" if !rest.is_empty() => Ok(ResourceArg::Page(rest.to_string())),
            "directory" | "dir" => {
                let (provider, path) = rest
                    .split_once(':')
                    .ok_or_else(|| format!("'{s}' needs both a provider and a path"))?;
                if provider.is_empty() {
                    return Err(format!("'{s}' has an empty provider"));
                }
                Ok(ResourceArg::Directory {
                    provider: provider.to_string(),
                    path: path.to_string(),
                })
            }
            _ => Err(format!("unknown resource '{s}'")),
        }
    }
}

impl Display for ResourceArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceArg::Global => f.write_str("global"),
            ResourceArg::Namespace(None) => f.write_str("root namespace"),
            ResourceArg::Namespace(Some(name)) => write!(f, "namespace {name}"),
            ResourceArg::Page(page) => write!(f, "page {page}"),
            ResourceArg::Directory { provider, path } => {
                write!(f, "directory {path} ({provider})")
            }
        }
    }
}

/// Opens the engine over the project's ACL file.
pub fn open_engine(config: &WardenConfig) -> Result<AclEngine> {
    AclEngine::open(config).with_context(|| {
        format!(
            "Failed to open ACL store at {}",
            config.store_path().display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_resource_form() {
        assert_eq!("global".parse::<ResourceArg>(), Ok(ResourceArg::Global));
        assert_eq!("namespace:".parse::<ResourceArg>(), Ok(ResourceArg::Namespace(None)));
        assert_eq!(
            "ns:Docs".parse::<ResourceArg>(),
            Ok(ResourceArg::Namespace(Some("Docs".to_string())))
        );
        assert_eq!(
            "page:Docs.Install".parse::<ResourceArg>(),
            Ok(ResourceArg::Page("Docs.Install".to_string()))
        );
        assert_eq!(
            "directory:fs:/img/".parse::<ResourceArg>(),
            Ok(ResourceArg::Directory {
                provider: "fs".to_string(),
                path: "/img/".to_string(),
            })
        );
    }

    #[test]
    fn rejects_malformed_resources() {
        assert!("page:".parse::<ResourceArg>().is_err());
        assert!("directory:/img/".parse::<ResourceArg>().is_err());
        assert!("directory::/img/".parse::<ResourceArg>().is_err());
        assert!("blob:x".parse::<ResourceArg>().is_err());
        assert!("Docs".parse::<ResourceArg>().is_err());
    }

    #[test]
    fn maps_to_stored_resource_ids() {
        let dir: ResourceArg = "dir:fs:img".parse().unwrap();
        assert_eq!(dir.id().as_str(), "D.fs/img/");
        assert_eq!(ResourceArg::Namespace(None).id().as_str(), "N.");
    }
}
