//! Insight database operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_column, parse_datetime, parse_optional_datetime, Database};
use crate::error::{Error, Result};
use crate::insights::{Insight, InsightStatus, InsightStore, StoredInsight};

const INSIGHT_COLUMNS: &str = "id, space_id, for_user_id, kind, title, description, confidence, \
                               related_user_id, related_task_id, related_category, \
                               suggested_action, status, created_at, snoozed_until";

impl Database {
    /// Insights recorded for a member, newest first, optionally by status
    pub fn list_insights(
        &self,
        space_id: &str,
        for_user_id: &str,
        status: Option<InsightStatus>,
    ) -> Result<Vec<StoredInsight>> {
        let conn = self.conn()?;

        let insights = if let Some(s) = status {
            let mut stmt = conn.prepare(&format!(
                r#"
                SELECT {} FROM insights
                WHERE space_id = ? AND for_user_id = ? AND status = ?
                ORDER BY created_at DESC, id DESC
                "#,
                INSIGHT_COLUMNS
            ))?;
            let rows = stmt.query_map(params![space_id, for_user_id, s.as_str()], row_to_insight)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            let mut stmt = conn.prepare(&format!(
                r#"
                SELECT {} FROM insights
                WHERE space_id = ? AND for_user_id = ?
                ORDER BY created_at DESC, id DESC
                "#,
                INSIGHT_COLUMNS
            ))?;
            let rows = stmt.query_map(params![space_id, for_user_id], row_to_insight)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        Ok(insights)
    }

    /// Get a single insight by ID
    pub fn get_insight(&self, id: i64) -> Result<Option<StoredInsight>> {
        let conn = self.conn()?;
        let insight = conn
            .query_row(
                &format!("SELECT {} FROM insights WHERE id = ?", INSIGHT_COLUMNS),
                params![id],
                row_to_insight,
            )
            .optional()?;
        Ok(insight)
    }

    /// Delete all insights of a space (for resets)
    pub fn delete_insights(&self, space_id: &str) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM insights WHERE space_id = ?", params![space_id])?;
        Ok(deleted)
    }
}

impl InsightStore for Database {
    fn pending_insights(
        &self,
        space_id: &str,
        for_user_id: &str,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredInsight>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM insights
            WHERE space_id = ?1
              AND for_user_id = ?2
              AND created_at >= ?3
              AND (status = 'pending' OR (status = 'snoozed' AND snoozed_until <= ?4))
            ORDER BY id
            "#,
            INSIGHT_COLUMNS
        ))?;

        let rows = stmt.query_map(
            params![
                space_id,
                for_user_id,
                format_datetime(&since),
                format_datetime(&now)
            ],
            row_to_insight,
        )?;
        let insights: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(insights?)
    }

    fn save_insight(
        &self,
        space_id: &str,
        for_user_id: &str,
        insight: &Insight,
        now: DateTime<Utc>,
    ) -> Result<StoredInsight> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO insights (
                space_id, for_user_id, kind, title, description, confidence,
                related_user_id, related_task_id, related_category, suggested_action,
                status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?)
            "#,
            params![
                space_id,
                for_user_id,
                insight.kind.as_str(),
                insight.title,
                insight.description,
                insight.confidence,
                insight.related_user_id,
                insight.related_task_id,
                insight.related_category.map(|c| c.as_str()),
                insight.suggested_action.as_str(),
                format_datetime(&now)
            ],
        )?;
        let id = conn.last_insert_rowid();

        conn.query_row(
            &format!("SELECT {} FROM insights WHERE id = ?", INSIGHT_COLUMNS),
            params![id],
            row_to_insight,
        )
        .map_err(Error::from)
    }

    fn set_insight_status(
        &self,
        id: i64,
        status: InsightStatus,
        snoozed_until: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let snoozed_until = match status {
            InsightStatus::Snoozed => snoozed_until.as_ref().map(format_datetime),
            _ => None,
        };

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE insights SET status = ?, snoozed_until = ? WHERE id = ?",
            params![status.as_str(), snoozed_until, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("insight {}", id)));
        }
        Ok(())
    }
}

/// Helper to convert a row to StoredInsight
fn row_to_insight(row: &rusqlite::Row) -> rusqlite::Result<StoredInsight> {
    let kind: String = row.get(3)?;
    let related_category: Option<String> = row.get(9)?;
    let action: String = row.get(10)?;
    let status: String = row.get(11)?;
    let created_at: String = row.get(12)?;

    Ok(StoredInsight {
        id: row.get(0)?,
        space_id: row.get(1)?,
        for_user_id: row.get(2)?,
        insight: Insight {
            kind: parse_column(3, &kind)?,
            title: row.get(4)?,
            description: row.get(5)?,
            confidence: row.get(6)?,
            related_user_id: row.get(7)?,
            related_task_id: row.get(8)?,
            related_category: related_category
                .as_deref()
                .map(|c| parse_column(9, c))
                .transpose()?,
            suggested_action: parse_column(10, &action)?,
        },
        status: parse_column(11, &status)?,
        created_at: parse_datetime(&created_at)?,
        snoozed_until: parse_optional_datetime(row.get(13)?)?,
    })
}
