use crate::repositories::columns::{millis, optional_timestamp, parsed, timestamp, uuid};
use crate::Result as DbErrorResult;

use bc_core::{Campaign, CampaignStatus, RecipientFilter};

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const CAMPAIGN_COLUMNS: &str = r#"
    id, owner_id, name, message, filter_json, status,
    total_recipients, sent_count, failed_count, last_error,
    created_at, updated_at, started_at, completed_at
"#;

/// Campaign rows and their conditional status transitions.
///
/// Every status change is a compare-and-set on the current status, so a
/// concurrent control call and the worker can never both win.
#[derive(Clone)]
pub struct CampaignRepository {
    pool: SqlitePool,
}

impl CampaignRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, campaign: &Campaign) -> DbErrorResult<()> {
        let filter_json = serde_json::to_string(&campaign.filter)?;

        sqlx::query(
            r#"
                INSERT INTO bc_campaigns (
                    id, owner_id, name, message, filter_json, status,
                    total_recipients, sent_count, failed_count, last_error,
                    created_at, updated_at, started_at, completed_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(campaign.id.to_string())
        .bind(campaign.owner_id.to_string())
        .bind(&campaign.name)
        .bind(&campaign.message)
        .bind(filter_json)
        .bind(campaign.status.as_str())
        .bind(campaign.total_recipients)
        .bind(campaign.sent_count)
        .bind(campaign.failed_count)
        .bind(&campaign.last_error)
        .bind(millis(campaign.created_at))
        .bind(millis(campaign.updated_at))
        .bind(campaign.started_at.map(millis))
        .bind(campaign.completed_at.map(millis))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<Campaign>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM bc_campaigns WHERE id = ?",
            CAMPAIGN_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(campaign_from_row).transpose()
    }

    /// Newest first
    pub async fn find_by_owner(&self, owner_id: Uuid) -> DbErrorResult<Vec<Campaign>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM bc_campaigns WHERE owner_id = ? ORDER BY created_at DESC, id",
            CAMPAIGN_COLUMNS
        ))
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(campaign_from_row).collect()
    }

    pub async fn status(&self, id: Uuid) -> DbErrorResult<Option<CampaignStatus>> {
        let row = sqlx::query("SELECT status FROM bc_campaigns WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(|r| parsed::<CampaignStatus>(r, "status"))
            .transpose()
    }

    /// Move to `to` if the current status is one of `from`.
    ///
    /// `reason`, when given, replaces `last_error`. Terminal targets stamp
    /// `completed_at`. Returns whether the row changed.
    pub async fn transition(
        &self,
        id: Uuid,
        from: &[CampaignStatus],
        to: CampaignStatus,
        reason: Option<&str>,
    ) -> DbErrorResult<bool> {
        if from.is_empty() {
            return Ok(false);
        }

        let now = millis(Utc::now());
        let completed_at = to.is_terminal().then_some(now);
        let placeholders = vec!["?"; from.len()].join(", ");
        let sql = format!(
            r#"
                UPDATE bc_campaigns
                SET status = ?,
                    last_error = COALESCE(?, last_error),
                    completed_at = COALESCE(?, completed_at),
                    updated_at = ?
                WHERE id = ? AND status IN ({})
            "#,
            placeholders
        );

        let mut query = sqlx::query(&sql)
            .bind(to.as_str())
            .bind(reason)
            .bind(completed_at)
            .bind(now)
            .bind(id.to_string());
        for status in from {
            query = query.bind(status.as_str());
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected() == 1)
    }

    /// queued -> running when a worker takes the campaign; clears `last_error`
    pub async fn mark_running(&self, id: Uuid) -> DbErrorResult<bool> {
        let now = millis(Utc::now());

        let result = sqlx::query(
            r#"
                UPDATE bc_campaigns
                SET status = 'running',
                    started_at = COALESCE(started_at, ?),
                    last_error = NULL,
                    updated_at = ?
                WHERE id = ? AND status = 'queued'
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// running -> completed / completed_with_errors, decided by the stored
    /// failure counter. `None` when the campaign was no longer running.
    pub async fn finalize(&self, id: Uuid) -> DbErrorResult<Option<CampaignStatus>> {
        let now = millis(Utc::now());

        let row = sqlx::query(
            r#"
                UPDATE bc_campaigns
                SET status = CASE WHEN failed_count > 0
                                  THEN 'completed_with_errors'
                                  ELSE 'completed' END,
                    completed_at = ?,
                    updated_at = ?
                WHERE id = ? AND status = 'running'
                RETURNING status
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(|r| parsed::<CampaignStatus>(r, "status"))
            .transpose()
    }

    /// Any non-terminal status -> failed
    pub async fn mark_failed(&self, id: Uuid, reason: &str) -> DbErrorResult<bool> {
        self.transition(
            id,
            &[
                CampaignStatus::Draft,
                CampaignStatus::Queued,
                CampaignStatus::Running,
                CampaignStatus::Paused,
            ],
            CampaignStatus::Failed,
            Some(reason),
        )
        .await
    }

    /// Startup recovery: campaigns left running by a crashed worker go back
    /// to queued so the re-queued job can claim them again
    pub async fn requeue_running(&self) -> DbErrorResult<u64> {
        let result = sqlx::query(
            "UPDATE bc_campaigns SET status = 'queued', updated_at = ? WHERE status = 'running'",
        )
        .bind(millis(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn campaign_from_row(row: &SqliteRow) -> DbErrorResult<Campaign> {
    let filter_json: String = row.try_get("filter_json")?;
    let filter: RecipientFilter = serde_json::from_str(&filter_json)?;

    Ok(Campaign {
        id: uuid(row, "id")?,
        owner_id: uuid(row, "owner_id")?,
        name: row.try_get("name")?,
        message: row.try_get("message")?,
        filter,
        status: parsed(row, "status")?,
        total_recipients: row.try_get("total_recipients")?,
        sent_count: row.try_get("sent_count")?,
        failed_count: row.try_get("failed_count")?,
        last_error: row.try_get("last_error")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
        started_at: optional_timestamp(row, "started_at")?,
        completed_at: optional_timestamp(row, "completed_at")?,
    })
}
