//! Warden administrative CLI.
//!
//! Inspects and edits the ACL of a project without going through the content
//! system.
//!
//! # Quick Start
//!
//! ```bash
//! # Let editors manage every page of the Docs namespace
//! warden grant namespace:Docs manage_pages G.editors
//!
//! # Ask whether bob, an editor, may read a page
//! warden check page:Docs.Install read_page --user bob --group editors
//!
//! # Show who holds what on the namespace
//! warden list namespace:Docs
//! ```

mod commands;
mod style;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use warden_config::ConfigLoader;

use crate::commands::ResourceArg;

/// Warden - access-control resolution for pages, namespaces, and directories.
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding warden.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: String,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a user may perform an action.
    Check {
        /// Resource: global, namespace:<name>, page:<full name>, or
        /// directory:<provider>:<path>. An empty namespace name is the root.
        resource: ResourceArg,

        /// Action to check.
        action: String,

        /// User performing the action.
        #[arg(short, long)]
        user: String,

        /// Group the user belongs to (repeatable).
        #[arg(short, long = "group")]
        groups: Vec<String>,
    },

    /// Grant an action to a subject (U.<user> or G.<group>).
    Grant {
        resource: ResourceArg,
        action: String,
        subject: String,
    },

    /// Deny an action to a subject (U.<user> or G.<group>).
    Deny {
        resource: ResourceArg,
        action: String,
        subject: String,
    },

    /// Remove a subject's entry for an action.
    Revoke {
        resource: ResourceArg,
        action: String,
        subject: String,
    },

    /// List the entries stored on a resource.
    List {
        resource: ResourceArg,
    },

    /// Propagate a rename to the ACL.
    #[command(subcommand)]
    Rename(RenameCommands),

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum RenameCommands {
    /// Rename a namespace and every page in it.
    Namespace { old: String, new: String },

    /// Rename a page (full names).
    Page { old: String, new: String },

    /// Rename a directory and every directory below it.
    Directory {
        provider: String,
        old: String,
        new: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format (text, toml, json).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    let config = ConfigLoader::new().with_project_dir(&cli.project).load()?;

    // Logs go to stderr so command output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            resource,
            action,
            user,
            groups,
        } => commands::check::run(&config, &resource, &action, &user, &groups),
        Commands::Grant {
            resource,
            action,
            subject,
        } => commands::permission::grant(&config, &resource, &action, &subject),
        Commands::Deny {
            resource,
            action,
            subject,
        } => commands::permission::deny(&config, &resource, &action, &subject),
        Commands::Revoke {
            resource,
            action,
            subject,
        } => commands::permission::revoke(&config, &resource, &action, &subject),
        Commands::List { resource } => commands::list::run(&config, &resource),
        Commands::Rename(cmd) => match cmd {
            RenameCommands::Namespace { old, new } => {
                commands::rename::namespace(&config, &old, &new)
            }
            RenameCommands::Page { old, new } => commands::rename::page(&config, &old, &new),
            RenameCommands::Directory { provider, old, new } => {
                commands::rename::directory(&config, &provider, &old, &new)
            }
        },
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { format } => commands::config::show(&config, &format),
        },
    }
}
