//! Fairness scoring
//!
//! A member's score says how close their workload sits to the group mean, not
//! how fair the household is overall. Two members far apart both score low.

use crate::config::FairnessConfig;
use crate::stats::{group_averages, FairnessStats};

/// Fairness index (0-100) with default weights
pub fn fairness_score(member: &FairnessStats, all: &[FairnessStats]) -> u8 {
    fairness_score_with(&FairnessConfig::default(), member, all)
}

/// Fairness index (0-100) with explicit weights
///
/// Returns 100 for groups of fewer than two members.
pub fn fairness_score_with(
    config: &FairnessConfig,
    member: &FairnessStats,
    all: &[FairnessStats],
) -> u8 {
    if all.len() < 2 {
        return 100;
    }

    let averages = group_averages(all);

    let points_score = component_score(
        config,
        f64::from(member.total_points),
        averages.avg_points,
    );
    let difficulty_score =
        component_score(config, member.avg_difficulty, averages.avg_difficulty);

    let score = config.points_weight * points_score + config.difficulty_weight * difficulty_score;
    score.round().clamp(0.0, 100.0) as u8
}

/// `max(0, 100 - penalty * |value - mean| / max(mean, 1))`
fn component_score(config: &FairnessConfig, value: f64, mean: f64) -> f64 {
    let deviation = (value - mean).abs() / mean.max(1.0);
    (100.0 - config.deviation_penalty * deviation).max(0.0)
}
