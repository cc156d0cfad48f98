//! Domain models for Fairshare

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest difficulty a task can carry
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest difficulty a task can carry
pub const MAX_DIFFICULTY: u8 = 10;

/// Fixed household chore categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Kitchen,
    Bathroom,
    LivingRoom,
    Bedroom,
    Laundry,
    Trash,
    Groceries,
    Outdoor,
    Pets,
    Maintenance,
    /// Fallback for anything that doesn't fit the fixed list
    Other,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
            Self::LivingRoom => "living_room",
            Self::Bedroom => "bedroom",
            Self::Laundry => "laundry",
            Self::Trash => "trash",
            Self::Groceries => "groceries",
            Self::Outdoor => "outdoor",
            Self::Pets => "pets",
            Self::Maintenance => "maintenance",
            Self::Other => "other",
        }
    }

    /// Get all categories in declaration order
    pub fn all() -> &'static [TaskCategory] {
        &[
            Self::Kitchen,
            Self::Bathroom,
            Self::LivingRoom,
            Self::Bedroom,
            Self::Laundry,
            Self::Trash,
            Self::Groceries,
            Self::Outdoor,
            Self::Pets,
            Self::Maintenance,
            Self::Other,
        ]
    }

    /// Lenient parse used by imports: unknown text lands in `Other`
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or(Self::Other)
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "kitchen" => Ok(Self::Kitchen),
            "bathroom" => Ok(Self::Bathroom),
            "living_room" | "livingroom" => Ok(Self::LivingRoom),
            "bedroom" => Ok(Self::Bedroom),
            "laundry" => Ok(Self::Laundry),
            "trash" | "garbage" => Ok(Self::Trash),
            "groceries" | "shopping" => Ok(Self::Groceries),
            "outdoor" | "garden" => Ok(Self::Outdoor),
            "pets" => Ok(Self::Pets),
            "maintenance" => Ok(Self::Maintenance),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown task category: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    PendingVerification,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::PendingVerification => "pending_verification",
            Self::Done => "done",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "pending_verification" => Ok(Self::PendingVerification),
            "done" => Ok(Self::Done),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Difficulty band used for the easy/medium/hard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    /// 1-3
    Easy,
    /// 4-6
    Medium,
    /// 7-10
    Hard,
}

impl DifficultyBand {
    pub fn of(difficulty: u8) -> Self {
        match difficulty {
            0..=3 => Self::Easy,
            4..=6 => Self::Medium,
            _ => Self::Hard,
        }
    }
}

/// Role of a member within a space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl std::str::FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(format!("Unknown member role: {}", s)),
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A household chore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub space_id: String,
    pub title: String,
    pub category: TaskCategory,
    /// 1-10, doubles as the point value on completion
    pub difficulty: u8,
    pub status: TaskStatus,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    /// When the task moved to `done`
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create an unassigned `todo` task; difficulty is clamped into 1-10
    pub fn new(
        id: impl Into<String>,
        space_id: impl Into<String>,
        title: impl Into<String>,
        category: TaskCategory,
        difficulty: u8,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            space_id: space_id.into(),
            title: title.into(),
            category,
            difficulty: clamp_difficulty(difficulty),
            status: TaskStatus::Todo,
            assigned_to: None,
            created_at,
            due_date: None,
            completed_at: None,
        }
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn assigned(mut self, member_id: impl Into<String>) -> Self {
        self.assigned_to = Some(member_id.into());
        self
    }

    /// Mark the task done at the given time
    pub fn completed(mut self, at: DateTime<Utc>) -> Self {
        self.status = TaskStatus::Done;
        self.completed_at = Some(at);
        self
    }

    pub fn points(&self) -> u32 {
        u32::from(self.difficulty)
    }

    pub fn band(&self) -> DifficultyBand {
        DifficultyBand::of(self.difficulty)
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Unassigned and still `todo`
    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Todo && self.assigned_to.is_none()
    }

    /// Completion time, falling back to creation time for rows without one
    pub fn completion_time(&self) -> Option<DateTime<Utc>> {
        if self.is_done() {
            Some(self.completed_at.unwrap_or(self.created_at))
        } else {
            None
        }
    }
}

/// A member of a space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub space_id: String,
    pub name: String,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        space_id: impl Into<String>,
        name: impl Into<String>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            space_id: space_id.into(),
            name: name.into(),
            role: MemberRole::Member,
            joined_at,
        }
    }

    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = role;
        self
    }
}

pub fn clamp_difficulty(difficulty: u8) -> u8 {
    difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Select open tasks (unassigned `todo`) preserving input order
pub fn open_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|t| t.is_open()).cloned().collect()
}
