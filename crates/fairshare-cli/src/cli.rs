//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fairshare_core::{MemberRole, TaskCategory};

/// Fairshare - Split household chores fairly
#[derive(Parser)]
#[command(name = "fairshare")]
#[command(about = "Fair allocation and insight engine for shared household chores", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "fairshare.db", global = true)]
    pub db: PathBuf,

    /// Engine config file (TOML)
    ///
    /// Defaults to ~/.local/share/fairshare/config/engine.toml when present,
    /// otherwise the built-in policy.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import task history from CSV
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Space (household) the tasks belong to
        #[arg(short, long)]
        space: String,
    },

    /// Manage household members
    Members {
        #[command(subcommand)]
        action: MembersAction,
    },

    /// Show per-member workload statistics
    Stats {
        #[arg(short, long)]
        space: String,
    },

    /// Show a member's fairness score
    Fairness {
        #[arg(short, long)]
        space: String,

        #[arg(short, long)]
        member: String,
    },

    /// Rank open tasks for a member
    Recommend {
        #[arg(short, long)]
        space: String,

        #[arg(short, long)]
        member: String,

        /// Category the member likes (repeatable)
        #[arg(long = "prefer")]
        prefer: Vec<TaskCategory>,

        /// Category the member dislikes (repeatable)
        #[arg(long = "avoid")]
        avoid: Vec<TaskCategory>,

        /// Maximum recommendations to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Distribute every open, unassigned task across members
    Assign {
        #[arg(short, long)]
        space: String,

        /// Write the assignments to the database (default: dry run)
        #[arg(long)]
        apply: bool,
    },

    /// Show a member's inferred habits
    Habits {
        #[arg(short, long)]
        space: String,

        #[arg(short, long)]
        member: String,
    },

    /// Show insights for a member (generated or reused)
    Insights {
        #[arg(short, long)]
        space: String,

        #[arg(short, long)]
        member: String,
    },

    /// Act on a single insight
    Insight {
        #[command(subcommand)]
        action: InsightAction,
    },
}

#[derive(Subcommand)]
pub enum MembersAction {
    /// Add or rename a member
    Add {
        #[arg(short, long)]
        space: String,

        /// Member ID (as used in task assignments)
        id: String,

        /// Display name (defaults to the ID)
        #[arg(short, long)]
        name: Option<String>,

        /// Role: owner, admin, member
        #[arg(short, long, default_value = "member")]
        role: MemberRole,
    },

    /// List members of a space
    List {
        #[arg(short, long)]
        space: String,
    },
}

#[derive(Subcommand)]
pub enum InsightAction {
    /// Mark an insight as acted on
    Accept { id: i64 },

    /// Dismiss an insight
    Reject { id: i64 },

    /// Hide an insight for a number of days
    Snooze {
        id: i64,

        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=3650))]
        days: u32,
    },
}
