//! Task recommendation command

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use fairshare_core::{
    compute_stats, db::Database, member_history, open_tasks, EngineConfig, MemberPreferences,
    RecommendationContext, RecommendationScorer,
};

use super::{print_json, truncate, Output};

/// Per-request recommendation settings from the command line
#[derive(Debug, Clone, Default)]
pub struct RecommendOptions {
    pub preferences: MemberPreferences,
    pub limit: usize,
}

pub fn cmd_recommend(
    db: &Database,
    config: &EngineConfig,
    space: &str,
    member: &str,
    opts: &RecommendOptions,
    now: DateTime<Utc>,
    out: Output,
) -> Result<()> {
    let tasks = db.list_tasks(space)?;
    let members = db.list_members(space)?;
    let stats = compute_stats(&tasks, &members);

    let Some(me) = stats.iter().find(|s| s.user_id == member) else {
        bail!("'{}' is not a member of '{}'", member, space);
    };

    let history = member_history(&tasks, member, config.recommend.history_window);
    let ctx = RecommendationContext {
        member: me,
        history: &history,
        preferences: &opts.preferences,
        group: &stats,
        now,
    };

    let mut recommendations =
        RecommendationScorer::new(config.recommend.clone()).recommend(&open_tasks(&tasks), &ctx);
    recommendations.truncate(opts.limit);

    if out == Output::Json {
        return print_json(&recommendations);
    }

    if recommendations.is_empty() {
        println!("No open tasks in '{}'. 🎉", space);
        return Ok(());
    }

    println!();
    println!("✨ Suggested tasks for {} in '{}'", member, space);
    println!("   ─────────────────────────────────────────────────────────");
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "   {}. {:<28} {:>5.1}  {}",
            i + 1,
            truncate(&rec.task.title, 28),
            rec.score,
            rec.reason
        );
        let due = rec
            .task
            .due_date
            .map(|d| format!(", due {}", d.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default();
        println!(
            "      {} · difficulty {}{} · {}",
            rec.task.category,
            rec.task.difficulty,
            due,
            rec.task.id
        );
    }
    Ok(())
}
