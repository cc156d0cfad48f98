//! Bulk auto-assignment
//!
//! Single greedy pass: members ordered by points (neediest first), tasks by
//! difficulty (hardest first), then dealt round-robin. The hardest task lands
//! on the least-loaded member and the rotation spreads the rest. There is no
//! re-balancing after the pass; this is a heuristic, not a solver.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Task;
use crate::stats::FairnessStats;

/// One task handed to one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: String,
    pub user_id: String,
    pub difficulty: u8,
}

/// Projected load for a member once a plan is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLoad {
    pub user_id: String,
    pub current_points: u32,
    pub assigned_points: u32,
    pub assigned_tasks: usize,
}

impl MemberLoad {
    pub fn projected_points(&self) -> u32 {
        self.current_points + self.assigned_points
    }
}

/// Assign every task to a member
///
/// Fails with [`Error::NoMembers`] when `members` is empty rather than
/// dropping tasks. The result is in assignment order (hardest task first).
pub fn auto_assign(tasks: &[Task], members: &[FairnessStats]) -> Result<Vec<Assignment>> {
    if members.is_empty() {
        return Err(Error::NoMembers { tasks: tasks.len() });
    }

    let mut by_need: Vec<&FairnessStats> = members.iter().collect();
    by_need.sort_by_key(|s| s.total_points);

    let mut by_difficulty: Vec<&Task> = tasks.iter().collect();
    by_difficulty.sort_by(|a, b| b.difficulty.cmp(&a.difficulty));

    let assignments: Vec<Assignment> = by_difficulty
        .into_iter()
        .enumerate()
        .map(|(i, task)| Assignment {
            task_id: task.id.clone(),
            user_id: by_need[i % by_need.len()].user_id.clone(),
            difficulty: task.difficulty,
        })
        .collect();

    debug!(
        tasks = assignments.len(),
        members = members.len(),
        "Planned bulk assignment"
    );

    Ok(assignments)
}

/// Task id to member id lookup for a plan
pub fn assignment_map(assignments: &[Assignment]) -> HashMap<String, String> {
    assignments
        .iter()
        .map(|a| (a.task_id.clone(), a.user_id.clone()))
        .collect()
}

/// Summarise a plan per member, in the order of `members`
pub fn assignments_by_member(
    assignments: &[Assignment],
    members: &[FairnessStats],
) -> Vec<MemberLoad> {
    members
        .iter()
        .map(|m| {
            let mine = assignments.iter().filter(|a| a.user_id == m.user_id);
            MemberLoad {
                user_id: m.user_id.clone(),
                current_points: m.total_points,
                assigned_points: mine.clone().map(|a| u32::from(a.difficulty)).sum(),
                assigned_tasks: mine.count(),
            }
        })
        .collect()
}
