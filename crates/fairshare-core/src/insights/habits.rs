//! Habit mining over completion history
//!
//! Estimates how often each category gets done and predicts the ones that are
//! overdue relative to their own rhythm. Also derives per-member habits
//! (favourite categories, cadence, time of day, consistency).
//!
//! Categories with fewer than two completions have no interval and never
//! produce a prediction.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::InsightConfig;
use crate::models::{Task, TaskCategory};

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Insight, InsightKind, SuggestedAction};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Observed rhythm of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFrequency {
    pub category: TaskCategory,
    pub completions: usize,
    /// Mean gap between consecutive completions, in days
    pub avg_interval_days: f64,
    pub last_completed: DateTime<Utc>,
    /// Most recently completed task in the category
    pub last_task_id: String,
}

impl CategoryFrequency {
    pub fn days_since_last(&self, now: DateTime<Utc>) -> f64 {
        days_between(self.last_completed, now)
    }
}

/// Rhythm of every category with at least two completions, in category order
pub fn category_frequencies(tasks: &[Task]) -> Vec<CategoryFrequency> {
    let mut by_category: BTreeMap<TaskCategory, Vec<(DateTime<Utc>, &str)>> = BTreeMap::new();
    for task in tasks {
        if let Some(at) = task.completion_time() {
            by_category
                .entry(task.category)
                .or_default()
                .push((at, task.id.as_str()));
        }
    }

    by_category
        .into_iter()
        .filter_map(|(category, mut completions)| {
            if completions.len() < 2 {
                return None;
            }
            completions.sort_by(|a, b| b.0.cmp(&a.0));

            let times: Vec<DateTime<Utc>> = completions.iter().map(|(at, _)| *at).collect();
            let gaps = gaps_in_days(&times);
            let avg_interval_days = mean(&gaps);

            let (last_completed, last_task_id) = completions[0];
            Some(CategoryFrequency {
                category,
                completions: completions.len(),
                avg_interval_days,
                last_completed,
                last_task_id: last_task_id.to_string(),
            })
        })
        .collect()
}

/// Predicts categories that are overdue relative to their usual interval
pub struct CategoryFrequencyAnalyzer {
    overdue_factor: f64,
    confidence: f64,
}

impl CategoryFrequencyAnalyzer {
    pub fn new(config: &InsightConfig) -> Self {
        Self {
            overdue_factor: config.overdue_factor,
            confidence: config.prediction_confidence,
        }
    }
}

impl Default for CategoryFrequencyAnalyzer {
    fn default() -> Self {
        Self::new(&InsightConfig::default())
    }
}

impl Analyzer for CategoryFrequencyAnalyzer {
    fn name(&self) -> &'static str {
        "Category Frequency"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        category_frequencies(ctx.tasks)
            .into_iter()
            .filter_map(|freq| {
                let elapsed = freq.days_since_last(ctx.now);
                if elapsed <= self.overdue_factor * freq.avg_interval_days {
                    return None;
                }

                Some(
                    Insight::new(
                        InsightKind::Prediction,
                        format!("{} might be needed", display_name(freq.category)),
                        format!(
                            "{} tasks usually happen every {:.1} days; the last one was {:.0} days ago.",
                            display_name(freq.category),
                            freq.avg_interval_days,
                            elapsed
                        ),
                        self.confidence,
                        SuggestedAction::CreateTask,
                    )
                    .for_category(freq.category)
                    .for_task(freq.last_task_id),
                )
            })
            .collect()
    }
}

/// Coarse time-of-day bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 05:00-11:59
    Morning,
    /// 12:00-16:59
    Afternoon,
    /// 17:00-21:59
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn of(at: DateTime<Utc>) -> Self {
        match at.hour() {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

/// Inferred working pattern of one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHabit {
    pub user_id: String,
    /// Most completed categories, up to three
    pub preferred_categories: Vec<TaskCategory>,
    /// None with fewer than two completions
    pub avg_days_between_tasks: Option<f64>,
    pub typical_time: TimeOfDay,
    /// 0.0-1.0, 1.0 = perfectly regular gaps
    pub consistency_score: f64,
}

/// Derive a member's habits; None when they have completed nothing
pub fn user_habits(tasks: &[Task], user_id: &str) -> Option<UserHabit> {
    let mut completions: Vec<(DateTime<Utc>, TaskCategory)> = tasks
        .iter()
        .filter(|t| t.assigned_to.as_deref() == Some(user_id))
        .filter_map(|t| t.completion_time().map(|at| (at, t.category)))
        .collect();
    if completions.is_empty() {
        return None;
    }
    completions.sort_by(|a, b| b.0.cmp(&a.0));

    let mut category_counts: BTreeMap<TaskCategory, usize> = BTreeMap::new();
    let mut time_counts: BTreeMap<TimeOfDay, usize> = BTreeMap::new();
    for (at, category) in &completions {
        *category_counts.entry(*category).or_default() += 1;
        *time_counts.entry(TimeOfDay::of(*at)).or_default() += 1;
    }

    let mut ranked: Vec<(TaskCategory, usize)> = category_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let preferred_categories = ranked.into_iter().take(3).map(|(c, _)| c).collect();

    // Earliest bucket wins ties
    let typical_time = time_counts
        .into_iter()
        .fold(None::<(TimeOfDay, usize)>, |best, (bucket, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((bucket, count)),
        })
        .map(|(bucket, _)| bucket)
        .unwrap_or(TimeOfDay::Morning);

    let times: Vec<DateTime<Utc>> = completions.iter().map(|(at, _)| *at).collect();
    let gaps = gaps_in_days(&times);
    let (avg_days_between_tasks, consistency_score) = if gaps.is_empty() {
        (None, 0.0)
    } else {
        let avg = mean(&gaps);
        let cv = if avg > 0.0 { std_dev(&gaps, avg) / avg } else { 0.0 };
        (Some(avg), 1.0 / (1.0 + cv))
    };

    Some(UserHabit {
        user_id: user_id.to_string(),
        preferred_categories,
        avg_days_between_tasks,
        typical_time,
        consistency_score,
    })
}

fn display_name(category: TaskCategory) -> String {
    let name = category.as_str().replace('_', " ");
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Gaps between consecutive timestamps sorted newest first
fn gaps_in_days(times: &[DateTime<Utc>]) -> Vec<f64> {
    times
        .windows(2)
        .map(|w| days_between(w[1], w[0]))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
