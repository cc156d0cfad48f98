//! Member and task history operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{format_datetime, parse_column, parse_datetime, parse_optional_datetime, Database};
use crate::allocate::Assignment;
use crate::error::{Error, Result};
use crate::insights::TaskSource;
use crate::models::{Member, Task, TaskStatus};

const TASK_COLUMNS: &str = "id, space_id, title, category, difficulty, status, assigned_to, \
                            created_at, due_date, completed_at";

impl Database {
    /// Insert or update a member
    pub fn upsert_member(&self, member: &Member) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO members (id, space_id, name, role, joined_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(space_id, id) DO UPDATE SET
                name = excluded.name,
                role = excluded.role
            "#,
            params![
                member.id,
                member.space_id,
                member.name,
                member.role.as_str(),
                format_datetime(&member.joined_at)
            ],
        )?;
        Ok(())
    }

    /// Members of a space, oldest first
    pub fn list_members(&self, space_id: &str) -> Result<Vec<Member>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, space_id, name, role, joined_at
            FROM members
            WHERE space_id = ?
            ORDER BY joined_at, id
            "#,
        )?;

        let rows = stmt.query_map(params![space_id], row_to_member)?;
        let members: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(members?)
    }

    pub fn get_member(&self, space_id: &str, id: &str) -> Result<Option<Member>> {
        let conn = self.conn()?;
        let member = conn
            .query_row(
                "SELECT id, space_id, name, role, joined_at FROM members WHERE space_id = ? AND id = ?",
                params![space_id, id],
                row_to_member,
            )
            .optional()?;
        Ok(member)
    }

    /// Insert or replace a task by id
    pub fn upsert_task(&self, task: &Task) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO tasks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                TASK_COLUMNS
            ),
            params![
                task.id,
                task.space_id,
                task.title,
                task.category.as_str(),
                task.difficulty,
                task.status.as_str(),
                task.assigned_to,
                format_datetime(&task.created_at),
                task.due_date.as_ref().map(format_datetime),
                task.completed_at.as_ref().map(format_datetime),
            ],
        )?;
        Ok(())
    }

    /// Every task of a space, oldest first
    pub fn list_tasks(&self, space_id: &str) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE space_id = ? ORDER BY created_at, id",
            TASK_COLUMNS
        ))?;

        let rows = stmt.query_map(params![space_id], row_to_task)?;
        let tasks: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(tasks?)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(
                &format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Assign an open task to a member
    pub fn assign_task(&self, task_id: &str, user_id: &str) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE tasks SET assigned_to = ? WHERE id = ? AND status = 'todo'",
            params![user_id, task_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("open task {}", task_id)));
        }
        Ok(())
    }

    /// Apply a bulk assignment plan atomically
    ///
    /// Every task must still be open; if any is not, nothing is written.
    pub fn apply_assignments(&self, assignments: &[Assignment]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for a in assignments {
            let updated = tx.execute(
                "UPDATE tasks SET assigned_to = ? WHERE id = ? AND status = 'todo' AND assigned_to IS NULL",
                params![a.user_id, a.task_id],
            )?;
            if updated == 0 {
                // Dropping the transaction rolls back
                return Err(Error::NotFound(format!("open task {}", a.task_id)));
            }
        }

        tx.commit()?;
        info!(tasks = assignments.len(), "Applied assignments");
        Ok(assignments.len())
    }

    /// Mark a task done by a member
    pub fn complete_task(&self, task_id: &str, user_id: &str, at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE tasks SET status = ?, assigned_to = ?, completed_at = ? WHERE id = ?",
            params![TaskStatus::Done.as_str(), user_id, format_datetime(&at), task_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("task {}", task_id)));
        }
        Ok(())
    }
}

impl TaskSource for Database {
    fn space_tasks(&self, space_id: &str) -> Result<Vec<Task>> {
        self.list_tasks(space_id)
    }

    fn space_members(&self, space_id: &str) -> Result<Vec<Member>> {
        self.list_members(space_id)
    }
}

fn row_to_member(row: &rusqlite::Row) -> rusqlite::Result<Member> {
    let role: String = row.get(3)?;
    let joined_at: String = row.get(4)?;

    Ok(Member {
        id: row.get(0)?,
        space_id: row.get(1)?,
        name: row.get(2)?,
        role: parse_column(3, &role)?,
        joined_at: parse_datetime(&joined_at)?,
    })
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let category: String = row.get(3)?;
    let status: String = row.get(5)?;
    let created_at: String = row.get(7)?;

    Ok(Task {
        id: row.get(0)?,
        space_id: row.get(1)?,
        title: row.get(2)?,
        category: parse_column(3, &category)?,
        difficulty: row.get(4)?,
        status: parse_column(5, &status)?,
        assigned_to: row.get(6)?,
        created_at: parse_datetime(&created_at)?,
        due_date: parse_optional_datetime(row.get(8)?)?,
        completed_at: parse_optional_datetime(row.get(9)?)?,
    })
}
