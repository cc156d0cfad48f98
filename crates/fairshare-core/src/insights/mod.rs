//! Insight Engine - household habit mining
//!
//! Surfaces observations about a space instead of waiting for members to
//! notice them:
//!
//! - **Category Frequency** - predicts chores that are overdue relative to
//!   how often they usually happen
//! - **Member Activity** - flags members falling behind or gone quiet
//!
//! The analyzers are pure functions of a task snapshot. [`InsightCache`] adds
//! the only stateful piece: reusing pending insights inside a time window.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fairshare_core::insights::InsightCache;
//!
//! let cache = InsightCache::new(&db, &db);
//! let insights = cache.get_insights("home", "alice", Utc::now())?;
//! ```

pub mod activity;
pub mod cache;
pub mod engine;
pub mod habits;
pub mod types;

pub use activity::MemberActivityAnalyzer;
pub use cache::{InsightCache, InsightStore, TaskSource};
pub use engine::{AnalysisContext, Analyzer, InsightEngine};
pub use habits::{
    category_frequencies, user_habits, CategoryFrequency, CategoryFrequencyAnalyzer, TimeOfDay,
    UserHabit,
};
pub use types::{Insight, InsightKind, InsightStatus, StoredInsight, SuggestedAction};
