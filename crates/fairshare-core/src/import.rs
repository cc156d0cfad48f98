//! CSV import of task history
//!
//! Expected header (column order is free, names are not):
//!
//! ```text
//! id,title,category,difficulty,status,assigned_to,created_at,due_date,completed_at
//! ```
//!
//! Timestamps are RFC 3339 or plain `YYYY-MM-DD` (midnight UTC). Empty
//! optional cells become `None`. Unknown categories fall back to `other`;
//! an invalid difficulty or status rejects the row with its line number.

use std::io::Read;

use chrono::{DateTime, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Task, TaskCategory, TaskStatus, MAX_DIFFICULTY, MIN_DIFFICULTY};

#[derive(Debug, Deserialize)]
struct TaskRecord {
    id: String,
    title: String,
    category: String,
    difficulty: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    assigned_to: Option<String>,
    created_at: String,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    completed_at: Option<String>,
}

/// Parse a task history export into tasks for `space_id`
pub fn parse_tasks_csv<R: Read>(reader: R, space_id: &str) -> Result<Vec<Task>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut tasks = Vec::new();

    for (i, result) in rdr.deserialize::<TaskRecord>().enumerate() {
        // Header is line 1
        let line = i + 2;
        let record = result?;
        tasks.push(record_to_task(record, space_id, line)?);
    }

    debug!(space = space_id, count = tasks.len(), "Parsed task CSV");
    Ok(tasks)
}

fn record_to_task(record: TaskRecord, space_id: &str, line: usize) -> Result<Task> {
    let row_err = |msg: String| Error::Import(format!("line {}: {}", line, msg));

    if record.id.is_empty() {
        return Err(row_err("missing id".to_string()));
    }

    let difficulty: u8 = record
        .difficulty
        .parse()
        .map_err(|_| row_err(format!("invalid difficulty '{}'", record.difficulty)))?;
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        return Err(row_err(format!(
            "difficulty {} outside {}-{}",
            difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY
        )));
    }

    let status = match non_empty(record.status) {
        Some(s) => s.parse::<TaskStatus>().map_err(row_err)?,
        None => TaskStatus::Todo,
    };

    let created_at = parse_timestamp(&record.created_at).map_err(row_err)?;
    let due_date = non_empty(record.due_date)
        .map(|s| parse_timestamp(&s))
        .transpose()
        .map_err(row_err)?;
    let completed_at = non_empty(record.completed_at)
        .map(|s| parse_timestamp(&s))
        .transpose()
        .map_err(row_err)?;

    let mut task = Task::new(
        record.id,
        space_id,
        record.title,
        TaskCategory::parse_lossy(&record.category),
        difficulty,
        created_at,
    );
    task.status = status;
    task.assigned_to = non_empty(record.assigned_to);
    task.due_date = due_date;
    task.completed_at = completed_at;

    Ok(task)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// RFC 3339 or `YYYY-MM-DD`
pub fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ts;
    use chrono::{TimeZone, Timelike};

    const HISTORY: &str = "\
id,title,category,difficulty,status,assigned_to,created_at,due_date,completed_at
t1,Dishes,kitchen,3,done,alice,2026-01-01,,2026-01-02T19:30:00Z
t2,Mow lawn,Garden,8,todo,,2026-01-03,2026-01-05,
t3,Feed the fish,aquarium,1,in_progress,bob,2026-01-04T08:00:00+02:00,,
";

    #[test]
    fn test_parse_history() {
        let tasks = parse_tasks_csv(HISTORY.as_bytes(), "home").unwrap();
        assert_eq!(tasks.len(), 3);

        let dishes = &tasks[0];
        assert_eq!(dishes.space_id, "home");
        assert_eq!(dishes.category, TaskCategory::Kitchen);
        assert_eq!(dishes.status, TaskStatus::Done);
        assert_eq!(dishes.assigned_to.as_deref(), Some("alice"));
        assert_eq!(dishes.created_at, ts(0));
        assert_eq!(dishes.completed_at.unwrap().hour(), 19);

        let lawn = &tasks[1];
        assert_eq!(lawn.category, TaskCategory::Outdoor);
        assert!(lawn.is_open());
        assert_eq!(lawn.due_date, Some(ts(4)));

        let fish = &tasks[2];
        assert_eq!(fish.category, TaskCategory::Other);
        assert_eq!(
            fish.created_at,
            Utc.with_ymd_and_hms(2026, 1, 4, 6, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_status_defaults_to_todo() {
        let csv = "id,title,category,difficulty,created_at\nt1,Sweep,bedroom,2,2026-01-01\n";
        let tasks = parse_tasks_csv(csv.as_bytes(), "home").unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Todo);
        assert!(tasks[0].assigned_to.is_none());
    }

    #[test]
    fn test_invalid_difficulty_names_line() {
        let csv = "id,title,category,difficulty,created_at\n\
                   t1,Sweep,bedroom,2,2026-01-01\n\
                   t2,Paint,maintenance,11,2026-01-01\n";
        let err = parse_tasks_csv(csv.as_bytes(), "home").unwrap_err();
        match err {
            Error::Import(msg) => assert!(msg.starts_with("line 3:"), "{}", msg),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_status_and_timestamp() {
        let csv = "id,title,category,difficulty,status,created_at\nt1,Sweep,bedroom,2,finished,2026-01-01\n";
        assert!(matches!(
            parse_tasks_csv(csv.as_bytes(), "home"),
            Err(Error::Import(_))
        ));

        let csv = "id,title,category,difficulty,created_at\nt1,Sweep,bedroom,2,yesterday\n";
        assert!(matches!(
            parse_tasks_csv(csv.as_bytes(), "home"),
            Err(Error::Import(_))
        ));
    }
}
