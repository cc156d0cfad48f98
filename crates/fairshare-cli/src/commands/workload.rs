//! Workload commands (stats, fairness, assign)

use anyhow::{bail, Context, Result};
use fairshare_core::{
    assignments_by_member, auto_assign, compute_stats, db::Database, fairness_score_with,
    group_averages, open_tasks, EngineConfig, FairnessStats,
};
use serde_json::json;
use tracing::info;

use super::{print_json, truncate, Output};

/// Stats for every member of a space, in roster order
fn space_stats(db: &Database, space: &str) -> Result<Vec<FairnessStats>> {
    let tasks = db.list_tasks(space)?;
    let members = db.list_members(space)?;
    Ok(compute_stats(&tasks, &members))
}

pub fn cmd_stats(db: &Database, config: &EngineConfig, space: &str, out: Output) -> Result<()> {
    let stats = space_stats(db, space)?;

    if out == Output::Json {
        let rows: Vec<_> = stats
            .iter()
            .map(|s| {
                json!({
                    "stats": s,
                    "fairness_score": fairness_score_with(&config.fairness, s, &stats),
                })
            })
            .collect();
        return print_json(&rows);
    }

    if stats.is_empty() {
        println!("No members in '{}'.", space);
        return Ok(());
    }

    let averages = group_averages(&stats);

    println!();
    println!("📊 Workload in '{}'", space);
    println!("   ──────────────────────────────────────────────────────────────");
    println!(
        "   {:<16} {:>6} {:>5} {:>5} {:>5} {:>5} {:>6} {:>5}",
        "Member", "Points", "Done", "Easy", "Med", "Hard", "AvgDif", "Fair"
    );
    for s in &stats {
        println!(
            "   {:<16} {:>6} {:>5} {:>5} {:>5} {:>5} {:>6.1} {:>5}",
            truncate(&s.user_id, 16),
            s.total_points,
            s.tasks_completed,
            s.easy_tasks,
            s.medium_tasks,
            s.hard_tasks,
            s.avg_difficulty,
            fairness_score_with(&config.fairness, s, &stats)
        );
    }
    println!();
    println!(
        "   Household average: {:.1} points, difficulty {:.1}",
        averages.avg_points, averages.avg_difficulty
    );
    Ok(())
}

pub fn cmd_fairness(
    db: &Database,
    config: &EngineConfig,
    space: &str,
    member: &str,
    out: Output,
) -> Result<()> {
    let stats = space_stats(db, space)?;
    let Some(me) = stats.iter().find(|s| s.user_id == member) else {
        bail!("'{}' is not a member of '{}'", member, space);
    };

    let score = fairness_score_with(&config.fairness, me, &stats);
    let averages = group_averages(&stats);

    if out == Output::Json {
        return print_json(&json!({
            "user_id": member,
            "space_id": space,
            "fairness_score": score,
            "total_points": me.total_points,
            "avg_points": averages.avg_points,
            "avg_difficulty": me.avg_difficulty,
            "group_avg_difficulty": averages.avg_difficulty,
        }));
    }

    let verdict = match score {
        90..=100 => "right on the household average",
        70..=89 => "close to the household average",
        40..=69 => "noticeably off the household average",
        _ => "far from the household average",
    };

    println!();
    println!("⚖️  Fairness for {} in '{}': {}/100", member, space, score);
    println!(
        "   Points: {} (household average {:.1})",
        me.total_points, averages.avg_points
    );
    println!(
        "   Avg difficulty: {:.1} (household average {:.1})",
        me.avg_difficulty, averages.avg_difficulty
    );
    println!("   Workload is {}", verdict);
    Ok(())
}

pub fn cmd_assign(db: &Database, space: &str, apply: bool, out: Output) -> Result<()> {
    let tasks = db.list_tasks(space)?;
    let members = db.list_members(space)?;
    let open = open_tasks(&tasks);

    if open.is_empty() {
        if out == Output::Json {
            return print_json(&json!({ "assignments": [], "loads": [], "applied": apply }));
        }
        println!("Nothing to assign: no open, unassigned tasks in '{}'.", space);
        return Ok(());
    }

    let stats = compute_stats(&tasks, &members);
    let plan = auto_assign(&open, &stats)
        .with_context(|| format!("Cannot assign tasks in '{}'", space))?;
    let loads = assignments_by_member(&plan, &stats);

    if apply {
        db.apply_assignments(&plan)
            .with_context(|| format!("Failed to apply assignments in '{}'", space))?;
        info!(space = space, tasks = plan.len(), "Applied bulk assignment");
    }

    if out == Output::Json {
        return print_json(&json!({
            "assignments": plan,
            "loads": loads,
            "applied": apply,
        }));
    }

    println!();
    if apply {
        println!("📋 Assigned {} tasks in '{}'", plan.len(), space);
    } else {
        println!("📋 Proposed assignment for '{}' (dry run)", space);
    }
    println!("   ─────────────────────────────────────────────");
    for a in &plan {
        let title = open
            .iter()
            .find(|t| t.id == a.task_id)
            .map(|t| t.title.as_str())
            .unwrap_or("");
        println!(
            "   {:<28} {:>2} pts → {}",
            truncate(title, 28),
            a.difficulty,
            a.user_id
        );
    }
    println!();
    for load in &loads {
        println!(
            "   {:<16} {:>4} → {:>4} points (+{} tasks)",
            truncate(&load.user_id, 16),
            load.current_points,
            load.projected_points(),
            load.assigned_tasks
        );
    }
    if !apply {
        println!();
        println!("   Run again with --apply to save these assignments.");
    }
    Ok(())
}
