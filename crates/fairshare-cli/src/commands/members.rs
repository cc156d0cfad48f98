//! Member management commands

use anyhow::Result;
use chrono::{DateTime, Utc};
use fairshare_core::{db::Database, Member, MemberRole};

use super::{print_json, Output};

pub fn cmd_members_add(
    db: &Database,
    space: &str,
    id: &str,
    name: Option<&str>,
    role: MemberRole,
    now: DateTime<Utc>,
) -> Result<()> {
    let existing = db.get_member(space, id)?;
    let joined_at = existing.as_ref().map(|m| m.joined_at).unwrap_or(now);

    let member = Member::new(id, space, name.unwrap_or(id), joined_at).with_role(role);
    db.upsert_member(&member)?;

    if existing.is_some() {
        println!("✅ Updated member {} in '{}'", member.name, space);
    } else {
        println!("✅ Added {} to '{}' as {}", member.name, space, member.role);
    }
    Ok(())
}

pub fn cmd_members_list(db: &Database, space: &str, out: Output) -> Result<()> {
    let members = db.list_members(space)?;

    if out == Output::Json {
        return print_json(&members);
    }

    if members.is_empty() {
        println!("No members in '{}'. Add one with: fairshare members add --space {} <id>", space, space);
        return Ok(());
    }

    println!();
    println!("👥 Members of '{}'", space);
    println!("   ─────────────────────────────────────────────");
    for m in &members {
        println!(
            "   {:<16} {:<20} {:<7} joined {}",
            m.id,
            super::truncate(&m.name, 20),
            m.role,
            m.joined_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}
