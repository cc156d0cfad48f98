//! Task recommendations
//!
//! Ranks open tasks for one member. Every task starts at a base score and
//! picks up independent adjustments for workload balance, category variety,
//! difficulty balance, stated preferences and urgency. Each adjustment that
//! fires records a reason; the first one is the reason shown to the member.
//!
//! Adjustments are applied in a fixed order so the surfaced reason is stable:
//! workload, variety, difficulty, preference, urgency, then the point value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RecommendConfig;
use crate::models::{DifficultyBand, Task, TaskCategory};
use crate::stats::{group_averages, FairnessStats};

/// Category likes and dislikes for a member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberPreferences {
    pub preferred: Vec<TaskCategory>,
    pub avoided: Vec<TaskCategory>,
}

impl MemberPreferences {
    pub fn prefers(&self, category: TaskCategory) -> bool {
        self.preferred.contains(&category)
    }

    pub fn avoids(&self, category: TaskCategory) -> bool {
        self.avoided.contains(&category)
    }
}

/// Everything the scorer knows about the requesting member
#[derive(Debug, Clone, Copy)]
pub struct RecommendationContext<'a> {
    pub member: &'a FairnessStats,
    /// Member's completed tasks, newest first
    pub history: &'a [Task],
    pub preferences: &'a MemberPreferences,
    /// Stats for every member of the space (including this one)
    pub group: &'a [FairnessStats],
    pub now: DateTime<Utc>,
}

/// A scored task for one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecommendation {
    pub task: Task,
    /// 0-100
    pub score: f64,
    /// Primary reason shown to the member
    pub reason: String,
    /// Every adjustment that fired, in application order
    pub reasons: Vec<String>,
}

/// Scores open tasks against a member's workload profile
#[derive(Debug, Clone, Default)]
pub struct RecommendationScorer {
    config: RecommendConfig,
}

impl RecommendationScorer {
    pub fn new(config: RecommendConfig) -> Self {
        Self { config }
    }

    /// Score every task and return them best first
    ///
    /// Equal scores keep their input order.
    pub fn recommend(&self, tasks: &[Task], ctx: &RecommendationContext<'_>) -> Vec<TaskRecommendation> {
        let avg_points = group_averages(ctx.group).avg_points;

        let mut recommendations: Vec<TaskRecommendation> = tasks
            .iter()
            .map(|task| self.score_task(task, ctx, avg_points))
            .collect();

        // Vec::sort_by is stable
        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            member = ctx.member.user_id.as_str(),
            tasks = recommendations.len(),
            top_score = recommendations.first().map(|r| r.score),
            "Scored task recommendations"
        );

        recommendations
    }

    fn score_task(
        &self,
        task: &Task,
        ctx: &RecommendationContext<'_>,
        avg_points: f64,
    ) -> TaskRecommendation {
        let cfg = &self.config;
        let member = ctx.member;
        let mut score = cfg.base_score;
        let mut reasons = Vec::new();

        // Workload balance
        let deficit = avg_points - f64::from(member.total_points);
        if deficit > 0.0 {
            score += (deficit / 2.0).min(cfg.max_deficit_bonus);
            reasons.push("You're below the household average".to_string());
        } else if deficit < -cfg.ahead_threshold {
            score -= cfg.ahead_penalty;
            reasons.push("Others may need this more".to_string());
        }

        // Category variety
        let recent = ctx
            .history
            .iter()
            .take(cfg.history_window)
            .filter(|t| t.category == task.category)
            .count();
        if recent == 0 {
            score += cfg.fresh_category_bonus;
            reasons.push(format!("You haven't done {} tasks recently", task.category));
        } else if recent >= cfg.repeat_category_threshold {
            score -= cfg.repeat_category_penalty;
            reasons.push(format!("You've done {} tasks often recently", task.category));
        }

        // Difficulty balance
        match task.band() {
            DifficultyBand::Hard if member.hard_ratio() < cfg.hard_ratio_threshold => {
                score += cfg.hard_balance_bonus;
                reasons.push("A harder task balances your workload".to_string());
            }
            DifficultyBand::Easy if member.easy_tasks > 2 * member.hard_tasks => {
                score -= cfg.easy_streak_penalty;
                reasons.push("You've been taking mostly easy tasks".to_string());
            }
            _ => {}
        }

        // Preferences; avoidance goes last so it wins when both match
        if ctx.preferences.prefers(task.category) {
            score += cfg.preferred_bonus;
            reasons.push("Matches your preferences".to_string());
        }
        if ctx.preferences.avoids(task.category) {
            score -= cfg.avoided_penalty;
            reasons.push(format!("You usually avoid {} tasks", task.category));
        }

        // Urgency
        if let Some(due) = task.due_date {
            if due - ctx.now <= cfg.due_soon_window() {
                score += cfg.due_soon_bonus;
                reasons.push("Due soon".to_string());
            }
        }

        reasons.push(format!("Worth {} points", task.points()));

        TaskRecommendation {
            task: task.clone(),
            score: score.clamp(0.0, 100.0),
            reason: reasons[0].clone(),
            reasons,
        }
    }
}

/// Rank tasks for a member with the default policy
pub fn recommend_tasks(tasks: &[Task], ctx: &RecommendationContext<'_>) -> Vec<TaskRecommendation> {
    RecommendationScorer::default().recommend(tasks, ctx)
}

/// A member's completed tasks, newest first, at most `limit`
pub fn member_history(tasks: &[Task], member_id: &str, limit: usize) -> Vec<Task> {
    let mut done: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.is_done() && t.assigned_to.as_deref() == Some(member_id))
        .collect();
    done.sort_by(|a, b| b.completion_time().cmp(&a.completion_time()));

    done.into_iter().take(limit).cloned().collect()
}
