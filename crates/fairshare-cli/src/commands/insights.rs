//! Habit and insight commands

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use fairshare_core::{db::Database, user_habits, EngineConfig, InsightCache, InsightKind};

use super::{print_json, Output};

fn ensure_member(db: &Database, space: &str, member: &str) -> Result<()> {
    if db.get_member(space, member)?.is_none() {
        bail!("'{}' is not a member of '{}'", member, space);
    }
    Ok(())
}

pub fn cmd_habits(db: &Database, space: &str, member: &str, out: Output) -> Result<()> {
    ensure_member(db, space, member)?;
    let tasks = db.list_tasks(space)?;
    let habit = user_habits(&tasks, member);

    if out == Output::Json {
        return print_json(&habit);
    }

    let Some(habit) = habit else {
        println!("{} hasn't completed any tasks in '{}' yet.", member, space);
        return Ok(());
    };

    let categories: Vec<String> = habit
        .preferred_categories
        .iter()
        .map(|c| c.to_string())
        .collect();

    println!();
    println!("🔁 Habits of {} in '{}'", member, space);
    println!("   ─────────────────────────────────────────────");
    println!("   Usually does: {}", categories.join(", "));
    match habit.avg_days_between_tasks {
        Some(days) => println!("   Completes a task every {:.1} days", days),
        None => println!("   Only one completed task so far"),
    }
    println!("   Typical time: {}", habit.typical_time.as_str());
    println!("   Consistency: {:.0}%", habit.consistency_score * 100.0);
    Ok(())
}

pub fn cmd_insights(
    db: &Database,
    config: &EngineConfig,
    space: &str,
    member: &str,
    now: DateTime<Utc>,
    out: Output,
) -> Result<()> {
    ensure_member(db, space, member)?;

    let cache = InsightCache::with_config(db, db, &config.insights);
    let insights = cache
        .get_insights(space, member, now)
        .context("Failed to generate insights")?;

    if out == Output::Json {
        return print_json(&insights);
    }

    if insights.is_empty() {
        println!("✅ Nothing to flag in '{}' right now.", space);
        return Ok(());
    }

    println!();
    println!("💡 Insights for {} in '{}'", member, space);
    println!("   ─────────────────────────────────────────────");
    for stored in &insights {
        let icon = match stored.insight.kind {
            InsightKind::Prediction => "🔮",
            InsightKind::Anomaly => "⚠️ ",
            InsightKind::Suggestion => "💬",
        };
        println!(
            "   {} [{}] {} ({:.0}%)",
            icon,
            stored.id,
            stored.insight.title,
            stored.insight.confidence * 100.0
        );
        println!("        {}", stored.insight.description);
    }
    println!();
    println!("   Respond with: fairshare insight accept|reject|snooze <id>");
    Ok(())
}

pub fn cmd_insight_accept(db: &Database, id: i64) -> Result<()> {
    InsightCache::new(db, db)
        .accept(id)
        .with_context(|| format!("Failed to accept insight {}", id))?;
    println!("✅ Accepted insight {}", id);
    Ok(())
}

pub fn cmd_insight_reject(db: &Database, id: i64) -> Result<()> {
    InsightCache::new(db, db)
        .reject(id)
        .with_context(|| format!("Failed to reject insight {}", id))?;
    println!("🗑️  Rejected insight {}", id);
    Ok(())
}

pub fn cmd_insight_snooze(db: &Database, id: i64, days: u32, now: DateTime<Utc>) -> Result<()> {
    InsightCache::new(db, db)
        .snooze(id, days, now)
        .with_context(|| format!("Failed to snooze insight {}", id))?;
    println!("😴 Snoozed insight {} for {} day(s)", id, days);
    Ok(())
}
