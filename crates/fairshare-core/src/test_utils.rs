//! Fixture builders for tests
//!
//! All fixtures live in a single space (`TEST_SPACE`) and use timestamps
//! offset from a fixed epoch so assertions stay deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{Member, Task, TaskCategory};

pub const TEST_SPACE: &str = "home";

/// Fixed reference point: 2026-01-01 00:00 UTC
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

/// `epoch() + days`
pub fn ts(days: i64) -> DateTime<Utc> {
    epoch() + Duration::days(days)
}

/// `epoch() + days + hours`
pub fn ts_hours(days: i64, hours: i64) -> DateTime<Utc> {
    ts(days) + Duration::hours(hours)
}

pub fn member(id: &str) -> Member {
    Member::new(id, TEST_SPACE, id, epoch())
}

/// Unassigned `todo` task created at the epoch
pub fn open_task(id: &str, category: TaskCategory, difficulty: u8) -> Task {
    Task::new(id, TEST_SPACE, format!("{} chore", category), category, difficulty, epoch())
}

/// Task completed by `member_id` at `at`
pub fn done_task(
    id: &str,
    category: TaskCategory,
    difficulty: u8,
    member_id: &str,
    at: DateTime<Utc>,
) -> Task {
    open_task(id, category, difficulty)
        .assigned(member_id)
        .completed(at)
}
