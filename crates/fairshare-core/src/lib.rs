//! Fairshare Core Library
//!
//! Fair allocation and insight engine for shared household chores:
//! - Per-member workload statistics
//! - Fairness scoring relative to the household
//! - Ranked task recommendations with explanations
//! - Greedy bulk assignment balancing difficulty against need
//! - Habit mining, predictions and anomaly insights with a de-duplicating cache
//! - SQLite-backed task snapshot and insight store
//! - CSV import of task history

pub mod allocate;
pub mod config;
pub mod db;
pub mod error;
pub mod fairness;
pub mod import;
pub mod insights;
pub mod models;
pub mod recommend;
pub mod stats;

/// Fixture builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use allocate::{assignment_map, assignments_by_member, auto_assign, Assignment, MemberLoad};
pub use config::{EngineConfig, FairnessConfig, InsightConfig, RecommendConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use fairness::{fairness_score, fairness_score_with};
pub use insights::{
    user_habits, AnalysisContext, Insight, InsightCache, InsightEngine, InsightKind,
    InsightStatus, InsightStore, StoredInsight, SuggestedAction, TaskSource, UserHabit,
};
pub use models::{open_tasks, Member, MemberRole, Task, TaskCategory, TaskStatus};
pub use recommend::{
    member_history, recommend_tasks, MemberPreferences, RecommendationContext,
    RecommendationScorer, TaskRecommendation,
};
pub use stats::{compute_member_stats, compute_stats, group_averages, FairnessStats};
