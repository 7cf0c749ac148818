//! Resource naming.
//!
//! Every protected object is identified by a flat string made of a category
//! prefix and a category-specific identifier. The prefixes keep the four
//! categories disjoint inside one store:
//!
//! | Kind      | Prefix | Identifier                          | Example              |
//! |-----------|--------|-------------------------------------|----------------------|
//! | Global    | `G`    | none                                | `G`                  |
//! | Namespace | `N.`   | namespace name (empty for root)     | `N.Docs`, `N.`       |
//! | Page      | `P.`   | full page name                      | `P.Docs.Install`     |
//! | Directory | `D.`   | provider id + normalized path       | `D.local-fs/img/`    |

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Separates the namespace from the local page name in a full page name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Category of a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Global,
    Namespace,
    Page,
    Directory,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Global,
        ResourceKind::Namespace,
        ResourceKind::Page,
        ResourceKind::Directory,
    ];

    /// Returns the prefix that starts every resource string of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            ResourceKind::Global => "G",
            ResourceKind::Namespace => "N.",
            ResourceKind::Page => "P.",
            ResourceKind::Directory => "D.",
        }
    }

    /// Classifies a stored resource string by its prefix.
    pub fn of_resource(resource: &str) -> Option<Self> {
        if resource == ResourceKind::Global.prefix() {
            return Some(ResourceKind::Global);
        }

        [
            ResourceKind::Namespace,
            ResourceKind::Page,
            ResourceKind::Directory,
        ]
        .into_iter()
        .find(|kind| resource.starts_with(kind.prefix()))
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Global => "global",
            ResourceKind::Namespace => "namespace",
            ResourceKind::Page => "page",
            ResourceKind::Directory => "directory",
        };
        f.write_str(name)
    }
}

/// Canonical resource key as stored in entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    /// The single global resource.
    pub fn global() -> Self {
        Self(ResourceKind::Global.prefix().to_string())
    }

    /// A namespace; `None` (or an empty name) is the root namespace.
    pub fn namespace(name: Option<&str>) -> Self {
        Self(format!(
            "{}{}",
            ResourceKind::Namespace.prefix(),
            name.unwrap_or_default()
        ))
    }

    /// A page, by full name (`Namespace.Page` or `Page` in the root).
    pub fn page(full_name: &str) -> Self {
        Self(format!("{}{full_name}", ResourceKind::Page.prefix()))
    }

    /// A directory within a storage provider.
    ///
    /// The same path in two providers is two different resources.
    pub fn directory(provider: &str, path: &str) -> Self {
        Self(format!(
            "{}{provider}{}",
            ResourceKind::Directory.prefix(),
            normalize_directory(path)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> ResourceKind {
        ResourceKind::of_resource(&self.0).unwrap_or(ResourceKind::Global)
    }

    /// Returns the identifier with the category prefix stripped.
    pub fn name(&self) -> &str {
        &self.0[self.kind().prefix().len()..]
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

/// Returns the namespace owning a page, or `None` for the root namespace.
pub fn namespace_of_page(full_name: &str) -> Option<&str> {
    full_name
        .split_once(NAMESPACE_SEPARATOR)
        .map(|(namespace, _)| namespace)
        .filter(|namespace| !namespace.is_empty())
}

/// Normalizes a directory path so it starts and ends with `/`.
///
/// An empty path is the root directory.
pub fn normalize_directory(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Returns the parent of a normalized directory path.
///
/// `"/a/b/"` has parent `"/a/"`; the root `"/"` has none.
pub fn parent_directory(path: &str) -> Option<String> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return None;
    }

    let cut = trimmed.rfind('/')?;
    Some(trimmed[..=cut].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn builders_use_category_prefixes() {
        assert_eq!(ResourceId::global().as_str(), "G");
        assert_eq!(ResourceId::namespace(Some("Docs")).as_str(), "N.Docs");
        assert_eq!(ResourceId::namespace(None).as_str(), "N.");
        assert_eq!(ResourceId::page("Docs.Install").as_str(), "P.Docs.Install");
        assert_eq!(
            ResourceId::directory("local-fs", "img/icons").as_str(),
            "D.local-fs/img/icons/"
        );
    }

    #[test]
    fn directory_is_scoped_per_provider() {
        assert_ne!(
            ResourceId::directory("local-fs", "/img/"),
            ResourceId::directory("s3", "/img/")
        );
    }

    #[test]
    fn kind_and_name_roundtrip() {
        let page = ResourceId::page("Docs.Install");
        assert_eq!(page.kind(), ResourceKind::Page);
        assert_eq!(page.name(), "Docs.Install");

        let global = ResourceId::global();
        assert_eq!(global.kind(), ResourceKind::Global);
        assert_eq!(global.name(), "");

        assert_eq!(ResourceKind::of_resource("D.fs/"), Some(ResourceKind::Directory));
        assert_eq!(ResourceKind::of_resource("X.thing"), None);
    }

    #[test_case("Docs.Install", Some("Docs"); "namespaced page")]
    #[test_case("Install", None; "root page")]
    #[test_case(".Install", None; "empty namespace")]
    #[test_case("Docs.Setup.Linux", Some("Docs"); "first separator wins")]
    fn owning_namespace(full_name: &str, expected: Option<&str>) {
        assert_eq!(namespace_of_page(full_name), expected);
    }

    #[test_case("", "/"; "empty is root")]
    #[test_case("/", "/"; "root")]
    #[test_case("a/b", "/a/b/"; "bare")]
    #[test_case("/a/b/", "/a/b/"; "already normalized")]
    fn normalize(input: &str, expected: &str) {
        assert_eq!(normalize_directory(input), expected);
    }

    #[test_case("/a/b/c/", Some("/a/b/"); "deep")]
    #[test_case("/a/b/", Some("/a/"); "two levels")]
    #[test_case("/a/", Some("/"); "one level")]
    #[test_case("/", None; "root has no parent")]
    fn parent(path: &str, expected: Option<&str>) {
        assert_eq!(parent_directory(path).as_deref(), expected);
    }
}
