//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Category hierarchy engine for retail catalogs
#[derive(Parser, Debug)]
#[command(name = "cattree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d -d -d)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Catalog snapshot (overrides catalog_file from config)
    #[arg(short = 'f', long, global = true, env = "CATTREE_CATALOG", value_hint = ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the category forest
    Tree {
        /// Annotate every category with its subtree product total
        #[arg(long)]
        counts: bool,
    },

    /// List all descendants of a category
    Descendants {
        /// Category id
        id: String,
    },

    /// Show the parent chain of a category
    Ancestors {
        /// Category id
        id: String,
    },

    /// Product totals including subcategories
    Counts {
        /// Every category instead of roots only
        #[arg(long)]
        all: bool,
    },

    /// Resolve a listing selection into category ids
    Filter {
        /// Subcategory id (wins over everything else)
        #[arg(long)]
        subcategory: Option<String>,
        /// Category id from primary navigation
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated ids from the filter sidebar
        #[arg(long)]
        categories: Option<String>,
        /// Also list matching product rows
        #[arg(long)]
        products: bool,
    },

    /// Indented option list for a parent picker
    Options {
        /// Category being edited: it and its subtree are not offered
        #[arg(long, conflicts_with = "parent")]
        exclude: Option<String>,
        /// Only list the subtree below this category
        #[arg(long)]
        parent: Option<String>,
    },

    /// Check whether a category may move under a new parent
    Validate {
        /// Category to move
        id: String,
        /// New parent id, or "null" for root
        parent: String,
    },

    /// Move a category under a new parent
    Reparent {
        /// Category to move
        id: String,
        /// New parent id, or "null" for root
        parent: String,
    },

    /// Report cycles, duplicates and dangling parents
    Check,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
