//! Command-line surface.
//!
//! Mirrors the original single-page UI: the entry form (`add`/`edit`), the
//! search box and tabs (`list`), per-card actions (`show`/`open`/`delete`)
//! and the tab badges (`counts`).

use clap::{Args, Parser, Subcommand, ValueEnum};
use projlink_core::{ProjectKind, ViewTab};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "projlink")]
#[command(about = "Personal portfolio of project and web-app links")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Record a web app
    projlink add --title Blog --url https://x.com --kind webapp --tags "css, astro"

    # Search across titles, descriptions and tags
    projlink list --search react

    # Only web apps
    projlink list --tab webapps

    # Change the url of an entry, keeping every other field
    projlink edit <ID> --url https://new.example.com

    # Open an entry in the browser
    projlink open <ID>
"#)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Directory holding the persisted collection and logs
    #[arg(long, global = true, env = "PROJLINK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Where the collection blob is kept
    #[arg(long, global = true, value_enum, env = "PROJLINK_BACKEND", default_value_t = BackendArg::Sqlite)]
    pub backend: BackendArg,

    /// Key the collection is stored under
    #[arg(long, global = true, default_value = projlink_core::DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, global = true, env = "PROJLINK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log directory (defaults to <data-dir>/logs)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Start from an empty collection if the persisted data is corrupt
    #[arg(long, global = true)]
    pub reset_corrupt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Local SQLite key-value table
    Sqlite,
    /// Single JSON file
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Project,
    Webapp,
}

impl From<KindArg> for ProjectKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Project => ProjectKind::Project,
            KindArg::Webapp => ProjectKind::Webapp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    #[default]
    All,
    Projects,
    Webapps,
}

impl From<TabArg> for ViewTab {
    fn from(value: TabArg) -> Self {
        match value {
            TabArg::All => ViewTab::All,
            TabArg::Projects => ViewTab::Projects,
            TabArg::Webapps => ViewTab::Webapps,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new project link
    Add(AddArgs),

    /// Edit an existing entry; omitted fields keep their current value
    Edit(EditArgs),

    /// Delete an entry (no error if it does not exist)
    Delete {
        /// Entry id
        id: String,
    },

    /// List entries, optionally filtered
    List {
        /// Case-insensitive match on title, description and tags
        #[arg(long, short, default_value = "")]
        search: String,

        /// Restrict to one kind
        #[arg(long, value_enum, default_value_t = TabArg::All)]
        tab: TabArg,
    },

    /// Show one entry
    Show {
        /// Entry id
        id: String,
    },

    /// Open an entry's url in the browser
    Open {
        /// Entry id
        id: String,

        /// Print the url instead of launching a browser
        #[arg(long)]
        print: bool,
    },

    /// Show per-kind counts
    Counts {
        /// Count only entries matching this search term
        #[arg(long, short, default_value = "")]
        search: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub url: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, value_enum, default_value_t = KindArg::Project)]
    pub kind: KindArg,

    /// Comma separated, e.g. "React, Next.js, TypeScript"
    #[arg(long, default_value = "")]
    pub tags: String,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Entry id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Replaces all tags; pass "" to clear
    #[arg(long)]
    pub tags: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_defaults_to_project_kind() {
        let cli = Cli::try_parse_from([
            "projlink", "add", "--title", "Blog", "--url", "https://x.com",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.kind, KindArg::Project);
                assert!(args.tags.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "projlink",
            "list",
            "--tab",
            "webapps",
            "--backend",
            "file",
            "--reset-corrupt",
        ])
        .unwrap();
        assert_eq!(cli.global.backend, BackendArg::File);
        assert!(cli.global.reset_corrupt);
        assert!(matches!(
            cli.command,
            Command::List {
                tab: TabArg::Webapps,
                ..
            }
        ));
    }

    #[test]
    fn add_requires_title_and_url() {
        assert!(Cli::try_parse_from(["projlink", "add", "--title", "x"]).is_err());
    }
}
