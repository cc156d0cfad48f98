//! Fairshare CLI - Fair chore allocation for shared households
//!
//! Usage:
//!   fairshare init                                 Initialize database
//!   fairshare import --file history.csv --space home
//!   fairshare recommend --space home --member alice
//!   fairshare assign --space home --apply
//!   fairshare insights --space home --member alice

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let now = Utc::now();
    let out = if cli.json {
        commands::Output::Json
    } else {
        commands::Output::Text
    };

    if let Commands::Init = cli.command {
        return commands::cmd_init(&cli.db);
    }

    let db = commands::open_db(&cli.db)?;
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Import { file, space } => commands::cmd_import(&db, &file, &space),
        Commands::Members { action } => match action {
            MembersAction::Add {
                space,
                id,
                name,
                role,
            } => commands::cmd_members_add(&db, &space, &id, name.as_deref(), role, now),
            MembersAction::List { space } => commands::cmd_members_list(&db, &space, out),
        },
        Commands::Stats { space } => commands::cmd_stats(&db, &config, &space, out),
        Commands::Fairness { space, member } => {
            commands::cmd_fairness(&db, &config, &space, &member, out)
        }
        Commands::Recommend {
            space,
            member,
            prefer,
            avoid,
            limit,
        } => {
            let opts = commands::RecommendOptions {
                preferences: fairshare_core::MemberPreferences {
                    preferred: prefer,
                    avoided: avoid,
                },
                limit,
            };
            commands::cmd_recommend(&db, &config, &space, &member, &opts, now, out)
        }
        Commands::Assign { space, apply } => commands::cmd_assign(&db, &space, apply, out),
        Commands::Habits { space, member } => commands::cmd_habits(&db, &space, &member, out),
        Commands::Insights { space, member } => {
            commands::cmd_insights(&db, &config, &space, &member, now, out)
        }
        Commands::Insight { action } => match action {
            InsightAction::Accept { id } => commands::cmd_insight_accept(&db, id),
            InsightAction::Reject { id } => commands::cmd_insight_reject(&db, id),
            InsightAction::Snooze { id, days } => {
                commands::cmd_insight_snooze(&db, id, days, now)
            }
        },
    }
}
