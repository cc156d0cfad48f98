//! Insight cache and de-duplication
//!
//! Wraps the [`InsightEngine`] for one (space, member) pair. Pending insights
//! already recorded for that member inside the window are returned as-is;
//! otherwise the engine runs and every new insight is stored as pending.
//!
//! The read-then-write sequence is not atomic. Two concurrent calls for the
//! same member can both miss and both write; the duplicates are harmless and
//! a uniqueness constraint in the store is the place to stop them.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::config::InsightConfig;
use crate::error::{Error, Result};
use crate::models::{Member, Task};

use super::engine::{AnalysisContext, InsightEngine};
use super::types::{Insight, InsightStatus, StoredInsight};

/// Read access to a space's tasks and members
pub trait TaskSource {
    fn space_tasks(&self, space_id: &str) -> Result<Vec<Task>>;

    fn space_members(&self, space_id: &str) -> Result<Vec<Member>>;
}

/// Persistence for generated insights
pub trait InsightStore {
    /// Actionable insights for a member created at or after `since`
    fn pending_insights(
        &self,
        space_id: &str,
        for_user_id: &str,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredInsight>>;

    /// Record a new insight with status `pending`
    fn save_insight(
        &self,
        space_id: &str,
        for_user_id: &str,
        insight: &Insight,
        now: DateTime<Utc>,
    ) -> Result<StoredInsight>;

    /// Move an insight to a new status; `snoozed_until` only applies to snoozes
    fn set_insight_status(
        &self,
        id: i64,
        status: InsightStatus,
        snoozed_until: Option<DateTime<Utc>>,
    ) -> Result<()>;
}

/// De-duplicating front door to the insight engine
pub struct InsightCache<'a> {
    engine: InsightEngine,
    source: &'a dyn TaskSource,
    store: &'a dyn InsightStore,
    window: Duration,
}

impl<'a> InsightCache<'a> {
    pub fn new(source: &'a dyn TaskSource, store: &'a dyn InsightStore) -> Self {
        Self::with_config(source, store, &InsightConfig::default())
    }

    pub fn with_config(
        source: &'a dyn TaskSource,
        store: &'a dyn InsightStore,
        config: &InsightConfig,
    ) -> Self {
        Self {
            engine: InsightEngine::new(config),
            source,
            store,
            window: config.dedup_window(),
        }
    }

    /// Replace the engine (custom analyzers)
    pub fn with_engine(mut self, engine: InsightEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Insights for a member, reusing pending ones from inside the window
    pub fn get_insights(
        &self,
        space_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredInsight>> {
        let since = now
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let existing = self
            .store
            .pending_insights(space_id, user_id, since, now)?;
        if !existing.is_empty() {
            debug!(
                space = space_id,
                user = user_id,
                count = existing.len(),
                "Reusing pending insights"
            );
            return Ok(existing);
        }

        let tasks = self.source.space_tasks(space_id)?;
        let members = self.source.space_members(space_id)?;
        let ctx = AnalysisContext::new(space_id, &tasks, &members, now);

        let stored = self
            .engine
            .analyze(&ctx)
            .iter()
            .map(|insight| self.store.save_insight(space_id, user_id, insight, now))
            .collect::<Result<Vec<_>>>()?;

        info!(
            space = space_id,
            user = user_id,
            generated = stored.len(),
            "Generated insights"
        );
        Ok(stored)
    }

    pub fn accept(&self, id: i64) -> Result<()> {
        self.store
            .set_insight_status(id, InsightStatus::Accepted, None)
    }

    pub fn reject(&self, id: i64) -> Result<()> {
        self.store
            .set_insight_status(id, InsightStatus::Rejected, None)
    }

    /// Hide an insight until `now + days`
    pub fn snooze(&self, id: i64, days: u32, now: DateTime<Utc>) -> Result<()> {
        let until = Duration::try_days(i64::from(days))
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| {
                Error::InvalidData(format!("cannot snooze insight {} for {} days", id, days))
            })?;
        self.store
            .set_insight_status(id, InsightStatus::Snoozed, Some(until))
    }
}
