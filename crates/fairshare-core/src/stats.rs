//! Statistics aggregation
//!
//! Derives per-member workload figures from raw task history. Everything
//! downstream (fairness, recommendations, allocation, insights) reads these
//! numbers instead of walking the task list again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{DifficultyBand, Member, Task};

/// Completed-work summary for one member of a space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessStats {
    pub user_id: String,
    pub space_id: String,
    /// Sum of difficulty over completed tasks
    pub total_points: u32,
    pub tasks_completed: u32,
    pub easy_tasks: u32,
    pub medium_tasks: u32,
    pub hard_tasks: u32,
    /// `total_points / max(tasks_completed, 1)`, 0 when nothing is done
    pub avg_difficulty: f64,
    pub last_task_date: Option<DateTime<Utc>>,
}

impl FairnessStats {
    /// Zeroed stats for a member with no history
    pub fn empty(user_id: impl Into<String>, space_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            space_id: space_id.into(),
            total_points: 0,
            tasks_completed: 0,
            easy_tasks: 0,
            medium_tasks: 0,
            hard_tasks: 0,
            avg_difficulty: 0.0,
            last_task_date: None,
        }
    }

    /// Share of completed tasks that were hard
    pub fn hard_ratio(&self) -> f64 {
        f64::from(self.hard_tasks) / f64::from(self.tasks_completed.max(1))
    }

    fn record(&mut self, task: &Task) {
        self.total_points += task.points();
        self.tasks_completed += 1;
        match task.band() {
            DifficultyBand::Easy => self.easy_tasks += 1,
            DifficultyBand::Medium => self.medium_tasks += 1,
            DifficultyBand::Hard => self.hard_tasks += 1,
        }
        if let Some(at) = task.completion_time() {
            if self.last_task_date.map_or(true, |last| at > last) {
                self.last_task_date = Some(at);
            }
        }
    }

    fn finish(&mut self) {
        self.avg_difficulty = f64::from(self.total_points) / f64::from(self.tasks_completed.max(1));
    }
}

/// Group means shared by the scorers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupAverages {
    pub avg_points: f64,
    pub avg_difficulty: f64,
}

/// Compute stats for one member from the space's task list
pub fn compute_member_stats(tasks: &[Task], member: &Member) -> FairnessStats {
    let mut stats = FairnessStats::empty(&member.id, &member.space_id);

    for task in tasks
        .iter()
        .filter(|t| t.is_done() && t.assigned_to.as_deref() == Some(member.id.as_str()))
    {
        stats.record(task);
    }
    stats.finish();

    stats
}

/// Compute stats for every member, in roster order
pub fn compute_stats(tasks: &[Task], members: &[Member]) -> Vec<FairnessStats> {
    let stats: Vec<FairnessStats> = members
        .iter()
        .map(|m| compute_member_stats(tasks, m))
        .collect();

    debug!(
        members = stats.len(),
        tasks = tasks.len(),
        "Computed fairness stats"
    );

    stats
}

/// Mean points and mean average difficulty across the group (0 when empty)
pub fn group_averages(all: &[FairnessStats]) -> GroupAverages {
    if all.is_empty() {
        return GroupAverages::default();
    }

    let n = all.len() as f64;
    GroupAverages {
        avg_points: all.iter().map(|s| f64::from(s.total_points)).sum::<f64>() / n,
        avg_difficulty: all.iter().map(|s| s.avg_difficulty).sum::<f64>() / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskCategory, TaskStatus};
    use crate::test_utils::{done_task, member, ts};

    #[test]
    fn test_member_without_history_is_zeroed() {
        let alice = member("alice");
        let stats = compute_member_stats(&[], &alice);

        assert_eq!(stats.total_points, 0);
        assert_eq!(stats.tasks_completed, 0);
        assert_eq!(stats.avg_difficulty, 0.0);
        assert!(!stats.avg_difficulty.is_nan());
        assert!(stats.last_task_date.is_none());
    }

    #[test]
    fn test_bands_and_points() {
        let alice = member("alice");
        let tasks = vec![
            done_task("t1", TaskCategory::Kitchen, 2, "alice", ts(1)),
            done_task("t2", TaskCategory::Trash, 5, "alice", ts(3)),
            done_task("t3", TaskCategory::Bathroom, 8, "alice", ts(2)),
            done_task("t4", TaskCategory::Bathroom, 9, "bob", ts(4)),
        ];

        let stats = compute_member_stats(&tasks, &alice);
        assert_eq!(stats.total_points, 15);
        assert_eq!(stats.tasks_completed, 3);
        assert_eq!(stats.easy_tasks, 1);
        assert_eq!(stats.medium_tasks, 1);
        assert_eq!(stats.hard_tasks, 1);
        assert_eq!(stats.avg_difficulty, 5.0);
        assert_eq!(stats.last_task_date, Some(ts(3)));
    }

    #[test]
    fn test_only_done_tasks_count() {
        let alice = member("alice");
        let mut pending = done_task("t1", TaskCategory::Kitchen, 6, "alice", ts(1));
        pending.status = TaskStatus::PendingVerification;
        let tasks = vec![
            pending,
            done_task("t2", TaskCategory::Kitchen, 4, "alice", ts(2)),
        ];

        let stats = compute_member_stats(&tasks, &alice);
        assert_eq!(stats.total_points, 4);
        assert_eq!(stats.tasks_completed, 1);
    }

    #[test]
    fn test_compute_stats_roster_order() {
        let members = vec![member("bob"), member("alice")];
        let tasks = vec![done_task("t1", TaskCategory::Kitchen, 3, "alice", ts(1))];

        let stats = compute_stats(&tasks, &members);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].user_id, "bob");
        assert_eq!(stats[1].total_points, 3);
    }

    #[test]
    fn test_group_averages() {
        assert_eq!(group_averages(&[]), GroupAverages::default());

        let mut a = FairnessStats::empty("a", "s");
        a.total_points = 10;
        a.avg_difficulty = 2.0;
        let mut b = FairnessStats::empty("b", "s");
        b.total_points = 100;
        b.avg_difficulty = 6.0;

        let avg = group_averages(&[a, b]);
        assert_eq!(avg.avg_points, 55.0);
        assert_eq!(avg.avg_difficulty, 4.0);
    }
}
