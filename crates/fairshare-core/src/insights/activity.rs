//! Member activity anomalies
//!
//! Flags members whose points fall well under the group average, and members
//! who haven't completed anything for a while. The two checks are independent
//! and can both fire for the same member. Members with no completions at all
//! carry no signal and are skipped.

use chrono::Duration;

use crate::config::InsightConfig;
use crate::stats::{compute_stats, group_averages};

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Insight, InsightKind, SuggestedAction};

pub struct MemberActivityAnalyzer {
    falling_behind_ratio: f64,
    falling_behind_confidence: f64,
    inactive_after: Duration,
    inactive_confidence: f64,
}

impl MemberActivityAnalyzer {
    pub fn new(config: &InsightConfig) -> Self {
        Self {
            falling_behind_ratio: config.falling_behind_ratio,
            falling_behind_confidence: config.falling_behind_confidence,
            inactive_after: config.inactive_after(),
            inactive_confidence: config.inactive_confidence,
        }
    }
}

impl Default for MemberActivityAnalyzer {
    fn default() -> Self {
        Self::new(&InsightConfig::default())
    }
}

impl Analyzer for MemberActivityAnalyzer {
    fn name(&self) -> &'static str {
        "Member Activity"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let stats = compute_stats(ctx.tasks, ctx.members);
        let avg_points = group_averages(&stats).avg_points;
        let mut insights = vec![];

        for (member, s) in ctx.members.iter().zip(&stats) {
            let Some(last_task_date) = s.last_task_date else {
                continue;
            };

            if f64::from(s.total_points) < self.falling_behind_ratio * avg_points {
                insights.push(
                    Insight::new(
                        InsightKind::Anomaly,
                        format!("{} is falling behind", member.name),
                        format!(
                            "{} has {} points against a household average of {:.0}.",
                            member.name, s.total_points, avg_points
                        ),
                        self.falling_behind_confidence,
                        SuggestedAction::RemindUser,
                    )
                    .for_user(&member.id),
                );
            }

            let idle = ctx.now - last_task_date;
            if idle > self.inactive_after {
                insights.push(
                    Insight::new(
                        InsightKind::Suggestion,
                        format!("Remind {} to help out", member.name),
                        format!(
                            "{} hasn't completed a task in {} days.",
                            member.name,
                            idle.num_days()
                        ),
                        self.inactive_confidence,
                        SuggestedAction::RemindUser,
                    )
                    .for_user(&member.id),
                );
            }
        }

        insights
    }
}
