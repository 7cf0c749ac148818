//! Action catalog.
//!
//! Each resource category accepts a closed set of actions. The store does not
//! check them; the facades validate against [`valid_actions`] before touching
//! it. [`FULL_CONTROL`] is reserved: it may be granted or denied on any
//! resource and then applies to every action there.

use crate::ResourceKind;

/// Reserved action covering every action of a resource.
pub const FULL_CONTROL: &str = "*";

/// Actions on the global resource.
pub mod global {
    pub const MANAGE_ACCOUNTS: &str = "manage_accounts";
    pub const MANAGE_GROUPS: &str = "manage_groups";
    pub const MANAGE_PAGES_AND_CATEGORIES: &str = "manage_pages_and_categories";
    pub const MANAGE_DISCUSSIONS: &str = "manage_discussions";
    pub const MANAGE_NAMESPACES: &str = "manage_namespaces";
    pub const MANAGE_CONFIGURATION: &str = "manage_configuration";
    pub const MANAGE_PROVIDERS: &str = "manage_providers";
    pub const MANAGE_FILES: &str = "manage_files";
    pub const MANAGE_SNIPPETS_AND_TEMPLATES: &str = "manage_snippets_and_templates";
    pub const MANAGE_NAVIGATION_PATHS: &str = "manage_navigation_paths";
    pub const MANAGE_META_FILES: &str = "manage_meta_files";

    pub const ALL: &[&str] = &[
        MANAGE_ACCOUNTS,
        MANAGE_GROUPS,
        MANAGE_PAGES_AND_CATEGORIES,
        MANAGE_DISCUSSIONS,
        MANAGE_NAMESPACES,
        MANAGE_CONFIGURATION,
        MANAGE_PROVIDERS,
        MANAGE_FILES,
        MANAGE_SNIPPETS_AND_TEMPLATES,
        MANAGE_NAVIGATION_PATHS,
        MANAGE_META_FILES,
    ];
}

/// Actions on a namespace (and, by escalation, every page in it).
pub mod namespace {
    pub const READ_PAGES: &str = "read_pages";
    pub const CREATE_PAGES: &str = "create_pages";
    pub const MODIFY_PAGES: &str = "modify_pages";
    pub const DELETE_PAGES: &str = "delete_pages";
    pub const MANAGE_PAGES: &str = "manage_pages";
    pub const READ_DISCUSSION: &str = "read_discussion";
    pub const POST_DISCUSSION: &str = "post_discussion";
    pub const MANAGE_DISCUSSION: &str = "manage_discussion";
    pub const MANAGE_CATEGORIES: &str = "manage_categories";
    pub const DOWNLOAD_ATTACHMENTS: &str = "download_attachments";
    pub const UPLOAD_ATTACHMENTS: &str = "upload_attachments";
    pub const DELETE_ATTACHMENTS: &str = "delete_attachments";
    pub const MANAGE_NAVIGATION_PATHS: &str = "manage_navigation_paths";

    pub const ALL: &[&str] = &[
        READ_PAGES,
        CREATE_PAGES,
        MODIFY_PAGES,
        DELETE_PAGES,
        MANAGE_PAGES,
        READ_DISCUSSION,
        POST_DISCUSSION,
        MANAGE_DISCUSSION,
        MANAGE_CATEGORIES,
        DOWNLOAD_ATTACHMENTS,
        UPLOAD_ATTACHMENTS,
        DELETE_ATTACHMENTS,
        MANAGE_NAVIGATION_PATHS,
    ];
}

/// Actions on a single page.
pub mod page {
    pub const READ_PAGE: &str = "read_page";
    pub const MODIFY_PAGE: &str = "modify_page";
    pub const MANAGE_PAGE: &str = "manage_page";
    pub const READ_DISCUSSION: &str = "read_discussion";
    pub const POST_DISCUSSION: &str = "post_discussion";
    pub const MANAGE_DISCUSSION: &str = "manage_discussion";
    pub const MANAGE_CATEGORIES: &str = "manage_categories";
    pub const DOWNLOAD_ATTACHMENTS: &str = "download_attachments";
    pub const UPLOAD_ATTACHMENTS: &str = "upload_attachments";
    pub const DELETE_ATTACHMENTS: &str = "delete_attachments";

    pub const ALL: &[&str] = &[
        READ_PAGE,
        MODIFY_PAGE,
        MANAGE_PAGE,
        READ_DISCUSSION,
        POST_DISCUSSION,
        MANAGE_DISCUSSION,
        MANAGE_CATEGORIES,
        DOWNLOAD_ATTACHMENTS,
        UPLOAD_ATTACHMENTS,
        DELETE_ATTACHMENTS,
    ];
}

/// Actions on a provider directory (and, by walk-up, its sub-directories).
pub mod directory {
    pub const LIST: &str = "list";
    pub const DOWNLOAD_FILES: &str = "download_files";
    pub const UPLOAD_FILES: &str = "upload_files";
    pub const CREATE_DIRECTORIES: &str = "create_directories";
    pub const DELETE_FILES: &str = "delete_files";
    pub const DELETE_DIRECTORIES: &str = "delete_directories";

    pub const ALL: &[&str] = &[
        LIST,
        DOWNLOAD_FILES,
        UPLOAD_FILES,
        CREATE_DIRECTORIES,
        DELETE_FILES,
        DELETE_DIRECTORIES,
    ];
}

/// Returns the closed action set of a resource category.
pub fn valid_actions(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Global => global::ALL,
        ResourceKind::Namespace => namespace::ALL,
        ResourceKind::Page => page::ALL,
        ResourceKind::Directory => directory::ALL,
    }
}

/// Returns whether `action` may be checked on a resource of this kind.
pub fn is_valid_action(kind: ResourceKind, action: &str) -> bool {
    valid_actions(kind).contains(&action)
}

/// Returns whether `action` may be granted or denied on a resource of this
/// kind. Unlike checks, writes also accept [`FULL_CONTROL`].
pub fn is_assignable_action(kind: ResourceKind, action: &str) -> bool {
    action == FULL_CONTROL || is_valid_action(kind, action)
}
