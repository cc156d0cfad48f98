//! Task history import

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use fairshare_core::{db::Database, import::parse_tasks_csv};
use tracing::warn;

pub fn cmd_import(db: &Database, file: &Path, space: &str) -> Result<()> {
    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;

    println!("📥 Importing tasks for '{}' from {}...", space, file.display());

    let tasks = parse_tasks_csv(csv_file, space)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    println!("   Found {} tasks", tasks.len());

    let known: Vec<String> = db
        .list_members(space)?
        .into_iter()
        .map(|m| m.id)
        .collect();

    let mut unknown_assignees = Vec::new();
    for task in &tasks {
        db.upsert_task(task)
            .with_context(|| format!("Failed to store task {}", task.id))?;
        if let Some(user) = &task.assigned_to {
            if !known.contains(user) && !unknown_assignees.contains(user) {
                unknown_assignees.push(user.clone());
            }
        }
    }

    if !unknown_assignees.is_empty() {
        // Their completions are stored but count toward nobody's stats
        warn!(
            space = space,
            members = ?unknown_assignees,
            "Tasks assigned to unknown members"
        );
        println!(
            "   ⚠️  Not members of '{}': {} (add them with 'fairshare members add')",
            space,
            unknown_assignees.join(", ")
        );
    }

    let open = tasks.iter().filter(|t| t.is_open()).count();
    let done = tasks.iter().filter(|t| t.is_done()).count();

    println!("✅ Import complete!");
    println!("   Completed: {}", done);
    println!("   Open (unassigned): {}", open);

    Ok(())
}
