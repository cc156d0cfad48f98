//! Core types for the insight engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::TaskCategory;

/// Kinds of insight the analyzers produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Something will probably be needed soon
    Prediction,
    /// A member's numbers deviate from the group
    Anomaly,
    /// A gentle nudge
    Suggestion,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Prediction => "prediction",
            InsightKind::Anomaly => "anomaly",
            InsightKind::Suggestion => "suggestion",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prediction" => Ok(InsightKind::Prediction),
            "anomaly" => Ok(InsightKind::Anomaly),
            "suggestion" => Ok(InsightKind::Suggestion),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// What the caller is invited to do about an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    CreateTask,
    RemindUser,
    AssignTask,
}

impl SuggestedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestedAction::CreateTask => "create_task",
            SuggestedAction::RemindUser => "remind_user",
            SuggestedAction::AssignTask => "assign_task",
        }
    }
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SuggestedAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_task" => Ok(SuggestedAction::CreateTask),
            "remind_user" => Ok(SuggestedAction::RemindUser),
            "assign_task" => Ok(SuggestedAction::AssignTask),
            _ => Err(format!("Unknown suggested action: {}", s)),
        }
    }
}

/// Lifecycle of a persisted insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    /// Waiting for the member to act
    Pending,
    Accepted,
    Rejected,
    /// Hidden until `snoozed_until`
    Snoozed,
}

impl InsightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightStatus::Pending => "pending",
            InsightStatus::Accepted => "accepted",
            InsightStatus::Rejected => "rejected",
            InsightStatus::Snoozed => "snoozed",
        }
    }
}

impl fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InsightStatus::Pending),
            "accepted" => Ok(InsightStatus::Accepted),
            "rejected" => Ok(InsightStatus::Rejected),
            "snoozed" => Ok(InsightStatus::Snoozed),
            _ => Err(format!("Unknown insight status: {}", s)),
        }
    }
}

/// An insight produced by an analyzer (before persistence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    /// 0.0-1.0
    pub confidence: f64,
    /// Member the insight is about
    pub related_user_id: Option<String>,
    pub related_task_id: Option<String>,
    /// Category a prediction refers to
    pub related_category: Option<TaskCategory>,
    pub suggested_action: SuggestedAction,
}

impl Insight {
    /// Create a new insight; confidence is clamped into 0..=1
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        description: impl Into<String>,
        confidence: f64,
        suggested_action: SuggestedAction,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            confidence: confidence.clamp(0.0, 1.0),
            related_user_id: None,
            related_task_id: None,
            related_category: None,
            suggested_action,
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.related_user_id = Some(user_id.into());
        self
    }

    pub fn for_task(mut self, task_id: impl Into<String>) -> Self {
        self.related_task_id = Some(task_id.into());
        self
    }

    pub fn for_category(mut self, category: TaskCategory) -> Self {
        self.related_category = Some(category);
        self
    }
}

/// An insight as recorded by an insight store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredInsight {
    pub id: i64,
    pub space_id: String,
    /// Member the insight was generated for
    pub for_user_id: String,
    #[serde(flatten)]
    pub insight: Insight,
    pub status: InsightStatus,
    pub created_at: DateTime<Utc>,
    pub snoozed_until: Option<DateTime<Utc>>,
}

impl StoredInsight {
    /// Pending, or snoozed with the snooze already over
    pub fn is_actionable(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            InsightStatus::Pending => true,
            InsightStatus::Snoozed => self.snoozed_until.is_some_and(|until| until <= now),
            InsightStatus::Accepted | InsightStatus::Rejected => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(InsightKind::Prediction.as_str(), "prediction");
        assert_eq!(
            InsightKind::from_str("anomaly").unwrap(),
            InsightKind::Anomaly
        );
        assert!(InsightKind::from_str("prophecy").is_err());
    }

    #[test]
    fn test_status_parse() {
        for status in [
            InsightStatus::Pending,
            InsightStatus::Accepted,
            InsightStatus::Rejected,
            InsightStatus::Snoozed,
        ] {
            assert_eq!(InsightStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_insight_builder() {
        let insight = Insight::new(
            InsightKind::Prediction,
            "Kitchen might be needed",
            "Usually every 3 days",
            1.7,
            SuggestedAction::CreateTask,
        )
        .for_category(TaskCategory::Kitchen)
        .for_task("t1");

        assert_eq!(insight.confidence, 1.0);
        assert_eq!(insight.related_category, Some(TaskCategory::Kitchen));
        assert_eq!(insight.related_task_id.as_deref(), Some("t1"));
        assert!(insight.related_user_id.is_none());
    }

    #[test]
    fn test_actionable() {
        let now = Utc::now();
        let mut stored = StoredInsight {
            id: 1,
            space_id: "home".to_string(),
            for_user_id: "alice".to_string(),
            insight: Insight::new(
                InsightKind::Suggestion,
                "t",
                "d",
                0.5,
                SuggestedAction::RemindUser,
            ),
            status: InsightStatus::Pending,
            created_at: now,
            snoozed_until: None,
        };
        assert!(stored.is_actionable(now));

        stored.status = InsightStatus::Snoozed;
        stored.snoozed_until = Some(now + Duration::days(1));
        assert!(!stored.is_actionable(now));
        assert!(stored.is_actionable(now + Duration::days(2)));

        stored.status = InsightStatus::Rejected;
        assert!(!stored.is_actionable(now + Duration::days(2)));
    }
}
