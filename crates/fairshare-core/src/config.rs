//! Engine policy configuration
//!
//! Every threshold the scorers and analyzers use lives here so it can be tuned
//! without code changes.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/fairshare/config/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default value.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Upper bound for every configurable time window (ten years)
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// `Duration::try_hours`, saturating instead of panicking on overflow
fn saturating_hours(hours: i64) -> Duration {
    Duration::try_hours(hours).unwrap_or(if hours < 0 { Duration::MIN } else { Duration::MAX })
}

/// Fairness scorer weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessConfig {
    /// Weight of the points component (default 0.6)
    pub points_weight: f64,
    /// Weight of the average-difficulty component (default 0.4)
    pub difficulty_weight: f64,
    /// Score lost per 100% relative deviation from the group mean
    pub deviation_penalty: f64,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            points_weight: 0.6,
            difficulty_weight: 0.4,
            deviation_penalty: 50.0,
        }
    }
}

/// Recommendation scorer adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub base_score: f64,
    /// Cap on the below-average workload bonus
    pub max_deficit_bonus: f64,
    /// Points ahead of the mean before the "others may need this" penalty
    pub ahead_threshold: f64,
    pub ahead_penalty: f64,
    /// How many recent completions count for category repetition
    pub history_window: usize,
    pub fresh_category_bonus: f64,
    pub repeat_category_penalty: f64,
    /// Occurrences in the history window that count as "often"
    pub repeat_category_threshold: usize,
    pub hard_ratio_threshold: f64,
    pub hard_balance_bonus: f64,
    pub easy_streak_penalty: f64,
    pub preferred_bonus: f64,
    pub avoided_penalty: f64,
    pub due_soon_hours: i64,
    pub due_soon_bonus: f64,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            max_deficit_bonus: 20.0,
            ahead_threshold: 10.0,
            ahead_penalty: 10.0,
            history_window: 5,
            fresh_category_bonus: 15.0,
            repeat_category_penalty: 10.0,
            repeat_category_threshold: 2,
            hard_ratio_threshold: 0.3,
            hard_balance_bonus: 15.0,
            easy_streak_penalty: 15.0,
            preferred_bonus: 10.0,
            avoided_penalty: 20.0,
            due_soon_hours: 24,
            due_soon_bonus: 10.0,
        }
    }
}

impl RecommendConfig {
    /// How close a due date must be for the urgency bonus
    pub fn due_soon_window(&self) -> Duration {
        saturating_hours(self.due_soon_hours)
    }
}

/// Habit/insight analyzer thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Elapsed time over the average interval that marks a category overdue
    pub overdue_factor: f64,
    pub prediction_confidence: f64,
    /// Share of the group average below which a member is falling behind
    pub falling_behind_ratio: f64,
    pub falling_behind_confidence: f64,
    /// Days without a completion before suggesting a reminder
    pub inactive_days: i64,
    pub inactive_confidence: f64,
    /// Window in which pending insights are reused instead of regenerated
    pub dedup_window_hours: i64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            overdue_factor: 1.2,
            prediction_confidence: 0.8,
            falling_behind_ratio: 0.7,
            falling_behind_confidence: 0.9,
            inactive_days: 7,
            inactive_confidence: 0.7,
            dedup_window_hours: 24,
        }
    }
}

impl InsightConfig {
    pub fn dedup_window(&self) -> Duration {
        saturating_hours(self.dedup_window_hours)
    }

    pub fn inactive_after(&self) -> Duration {
        Duration::try_days(self.inactive_days).unwrap_or(if self.inactive_days < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        })
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub fairness: FairnessConfig,
    pub recommend: RecommendConfig,
    pub insights: InsightConfig,
}

impl EngineConfig {
    /// Load from an explicit path, the data-dir override, or embedded defaults
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) if path.exists() => read_config(path)?,
            Some(path) => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )))
            }
            None => match default_config_path() {
                Some(path) if path.exists() => read_config(&path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    fn validate(&self) -> Result<()> {
        let f = &self.fairness;
        if f.points_weight < 0.0 || f.difficulty_weight < 0.0 || f.deviation_penalty < 0.0 {
            return Err(Error::Config(
                "fairness weights and penalty must be non-negative".to_string(),
            ));
        }
        if self.recommend.history_window == 0 {
            return Err(Error::Config(
                "recommend.history_window must be at least 1".to_string(),
            ));
        }
        let i = &self.insights;
        if i.overdue_factor <= 0.0 {
            return Err(Error::Config(
                "insights.overdue_factor must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("prediction_confidence", i.prediction_confidence),
            ("falling_behind_confidence", i.falling_behind_confidence),
            ("inactive_confidence", i.inactive_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "insights.{} must be within 0..=1 (got {})",
                    name, value
                )));
            }
        }
        for (name, hours) in [
            ("recommend.due_soon_hours", self.recommend.due_soon_hours),
            ("insights.dedup_window_hours", i.dedup_window_hours),
        ] {
            if !(0..=MAX_WINDOW_DAYS * 24).contains(&hours) {
                return Err(Error::Config(format!(
                    "{} must be within 0..={} (got {})",
                    name,
                    MAX_WINDOW_DAYS * 24,
                    hours
                )));
            }
        }
        if !(0..=MAX_WINDOW_DAYS).contains(&i.inactive_days) {
            return Err(Error::Config(format!(
                "insights.inactive_days must be within 0..={} (got {})",
                MAX_WINDOW_DAYS, i.inactive_days
            )));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fairshare").join("config").join("engine.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    fairness: Option<FairnessConfig>,
    recommend: Option<RecommendConfig>,
    insights: Option<InsightConfig>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let config = EngineConfig {
        fairness: raw.fairness.unwrap_or_default(),
        recommend: raw.recommend.unwrap_or_default(),
        insights: raw.insights.unwrap_or_default(),
    };
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_matches_defaults() {
        let config = EngineConfig::embedded().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [insights]
            overdue_factor = 1.5
            dedup_window_hours = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.insights.overdue_factor, 1.5);
        assert_eq!(config.insights.dedup_window(), Duration::hours(12));
        assert_eq!(config.insights.inactive_days, 7);
        assert_eq!(config.fairness, FairnessConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_config("[insights]\nprediction_confidence = 1.5\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = parse_config("[recommend]\nhistory_window = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        // Windows beyond the representable range are config errors, not panics later
        for toml in [
            "[insights]\ndedup_window_hours = 9223372036854775807\n",
            "[insights]\ndedup_window_hours = -1\n",
            "[insights]\ninactive_days = 9223372036854775807\n",
            "[recommend]\ndue_soon_hours = 9223372036854775807\n",
            "[recommend]\ndue_soon_hours = -5\n",
        ] {
            let err = parse_config(toml).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{}", toml);
        }
        assert!(parse_config("[insights]\ninactive_days = 3650\n").is_ok());

        assert!(parse_config("not = [valid").is_err());
    }

    #[test]
    fn test_unvalidated_windows_saturate() {
        let insights = InsightConfig {
            dedup_window_hours: i64::MAX,
            inactive_days: i64::MAX,
            ..InsightConfig::default()
        };
        assert_eq!(insights.dedup_window(), Duration::MAX);
        assert_eq!(insights.inactive_after(), Duration::MAX);

        let recommend = RecommendConfig {
            due_soon_hours: i64::MIN,
            ..RecommendConfig::default()
        };
        assert_eq!(recommend.due_soon_window(), Duration::MIN);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fairness]\npoints_weight = 0.8\ndifficulty_weight = 0.2").unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.fairness.points_weight, 0.8);
        assert_eq!(config.fairness.difficulty_weight, 0.2);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = EngineConfig::load(Some(Path::new("/nonexistent/fairshare.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
