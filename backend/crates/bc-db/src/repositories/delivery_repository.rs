use crate::Result as DbErrorResult;
use crate::repositories::columns::{millis, optional_timestamp, parsed, timestamp, uuid};
use crate::repositories::job_repository::insert_job;

use bc_core::{DeliveryAttempt, DeliveryCounts, DeliveryRecord, DeliveryStatus, Job, Recipient};

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const DELIVERY_COLUMNS: &str = r#"
    campaign_id, recipient_id, position, name, destination, status,
    attempt_count, sender_id, provider_message_id, error_message, sent_at, failed_at
"#;

/// Per-recipient delivery state of every campaign.
///
/// Records are created pending by [`DeliveryRepository::materialize`] and
/// move to a terminal status at most once.
#[derive(Clone)]
pub struct DeliveryRepository {
    pool: SqlitePool,
}

impl DeliveryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Freeze the recipient snapshot of a draft campaign.
    ///
    /// In one transaction: draft -> queued, one pending record per recipient
    /// (existing keys are left untouched), `total_recipients` fixed to the
    /// stored record count, and `start_job` enqueued. Returns the snapshot
    /// size, or `None` when the campaign was not in draft.
    pub async fn materialize(
        &self,
        campaign_id: Uuid,
        recipients: &[Recipient],
        start_job: &Job,
    ) -> DbErrorResult<Option<i64>> {
        let campaign = campaign_id.to_string();
        let now = millis(Utc::now());
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            r#"
                UPDATE bc_campaigns
                SET status = 'queued', last_error = NULL, updated_at = ?
                WHERE id = ? AND status = 'draft'
            "#,
        )
        .bind(now)
        .bind(&campaign)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(None);
        }

        for (position, recipient) in recipients.iter().enumerate() {
            sqlx::query(
                r#"
                    INSERT INTO bc_deliveries (
                        campaign_id, recipient_id, position, name, destination,
                        status, attempt_count
                    ) VALUES (?, ?, ?, ?, ?, 'pending', 0)
                    ON CONFLICT(campaign_id, recipient_id) DO NOTHING
                "#,
            )
            .bind(&campaign)
            .bind(recipient.id.to_string())
            .bind(position as i64)
            .bind(&recipient.name)
            .bind(&recipient.destination)
            .execute(&mut *tx)
            .await?;
        }

        let total: i64 = sqlx::query(
            r#"
                UPDATE bc_campaigns
                SET total_recipients = (
                    SELECT COUNT(*) FROM bc_deliveries WHERE campaign_id = ?
                )
                WHERE id = ?
                RETURNING total_recipients
            "#,
        )
        .bind(&campaign)
        .bind(&campaign)
        .fetch_one(&mut *tx)
        .await?
        .try_get("total_recipients")?;

        insert_job(&mut *tx, start_job).await?;

        tx.commit().await?;

        Ok(Some(total))
    }

    /// Up to `batch_size` pending records in snapshot order
    pub async fn next_pending(
        &self,
        campaign_id: Uuid,
        batch_size: usize,
    ) -> DbErrorResult<Vec<DeliveryRecord>> {
        let rows = sqlx::query(&format!(
            r#"
                SELECT {}
                FROM bc_deliveries
                WHERE campaign_id = ? AND status = 'pending'
                ORDER BY position
                LIMIT ?
            "#,
            DELIVERY_COLUMNS
        ))
        .bind(campaign_id.to_string())
        .bind(batch_size as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(delivery_from_row).collect()
    }

    /// pending -> sent; bumps the campaign's sent counter in the same
    /// transaction. `false` when the record was already terminal.
    pub async fn mark_sent(
        &self,
        campaign_id: Uuid,
        recipient_id: Uuid,
        sender_id: &str,
        provider_message_id: Option<&str>,
        attempts: i64,
    ) -> DbErrorResult<bool> {
        let now = millis(Utc::now());
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
                UPDATE bc_deliveries
                SET status = 'sent', sender_id = ?, provider_message_id = ?,
                    attempt_count = ?, sent_at = ?
                WHERE campaign_id = ? AND recipient_id = ? AND status = 'pending'
            "#,
        )
        .bind(sender_id)
        .bind(provider_message_id)
        .bind(attempts)
        .bind(now)
        .bind(campaign_id.to_string())
        .bind(recipient_id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE bc_campaigns SET sent_count = sent_count + 1, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(campaign_id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// pending -> failed; bumps the campaign's failed counter in the same
    /// transaction. `false` when the record was already terminal.
    pub async fn mark_failed(
        &self,
        campaign_id: Uuid,
        recipient_id: Uuid,
        sender_id: Option<&str>,
        error: &str,
        attempts: i64,
    ) -> DbErrorResult<bool> {
        let now = millis(Utc::now());
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
                UPDATE bc_deliveries
                SET status = 'failed', sender_id = ?, error_message = ?,
                    attempt_count = ?, failed_at = ?
                WHERE campaign_id = ? AND recipient_id = ? AND status = 'pending'
            "#,
        )
        .bind(sender_id)
        .bind(error)
        .bind(attempts)
        .bind(now)
        .bind(campaign_id.to_string())
        .bind(recipient_id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE bc_campaigns SET failed_count = failed_count + 1, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(campaign_id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn counts(&self, campaign_id: Uuid) -> DbErrorResult<DeliveryCounts> {
        let row = sqlx::query(
            r#"
                SELECT
                    COALESCE(SUM(CASE WHEN status = 'sent' THEN 1 ELSE 0 END), 0) AS sent,
                    COALESCE(SUM(CASE WHEN status = 'failed' THEN 1 ELSE 0 END), 0) AS failed,
                    COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0) AS pending
                FROM bc_deliveries
                WHERE campaign_id = ?
            "#,
        )
        .bind(campaign_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(DeliveryCounts {
            sent: row.try_get("sent")?,
            failed: row.try_get("failed")?,
            pending: row.try_get("pending")?,
        })
    }

    pub async fn find(
        &self,
        campaign_id: Uuid,
        recipient_id: Uuid,
    ) -> DbErrorResult<Option<DeliveryRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM bc_deliveries WHERE campaign_id = ? AND recipient_id = ?",
            DELIVERY_COLUMNS
        ))
        .bind(campaign_id.to_string())
        .bind(recipient_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(delivery_from_row).transpose()
    }

    /// Records in snapshot order, optionally narrowed to one status
    pub async fn list(
        &self,
        campaign_id: Uuid,
        status: Option<DeliveryStatus>,
        limit: i64,
        offset: i64,
    ) -> DbErrorResult<Vec<DeliveryRecord>> {
        let status = status.map(|s| s.as_str());

        let rows = sqlx::query(&format!(
            r#"
                SELECT {}
                FROM bc_deliveries
                WHERE campaign_id = ? AND (? IS NULL OR status = ?)
                ORDER BY position
                LIMIT ? OFFSET ?
            "#,
            DELIVERY_COLUMNS
        ))
        .bind(campaign_id.to_string())
        .bind(status)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(delivery_from_row).collect()
    }

    pub async fn record_attempt(&self, attempt: &DeliveryAttempt) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO bc_delivery_attempts (
                    campaign_id, recipient_id, attempt_number, sender_id,
                    outcome, error, attempted_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(attempt.campaign_id.to_string())
        .bind(attempt.recipient_id.to_string())
        .bind(attempt.attempt_number)
        .bind(&attempt.sender_id)
        .bind(attempt.outcome.as_str())
        .bind(&attempt.error)
        .bind(millis(attempt.attempted_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn attempts(
        &self,
        campaign_id: Uuid,
        recipient_id: Uuid,
    ) -> DbErrorResult<Vec<DeliveryAttempt>> {
        let rows = sqlx::query(
            r#"
                SELECT campaign_id, recipient_id, attempt_number, sender_id,
                       outcome, error, attempted_at
                FROM bc_delivery_attempts
                WHERE campaign_id = ? AND recipient_id = ?
                ORDER BY attempt_number, id
            "#,
        )
        .bind(campaign_id.to_string())
        .bind(recipient_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> DbErrorResult<DeliveryAttempt> {
                Ok(DeliveryAttempt {
                    campaign_id: uuid(row, "campaign_id")?,
                    recipient_id: uuid(row, "recipient_id")?,
                    attempt_number: row.try_get("attempt_number")?,
                    sender_id: row.try_get("sender_id")?,
                    outcome: parsed(row, "outcome")?,
                    error: row.try_get("error")?,
                    attempted_at: timestamp(row, "attempted_at")?,
                })
            })
            .collect()
    }
}

fn delivery_from_row(row: &SqliteRow) -> DbErrorResult<DeliveryRecord> {
    Ok(DeliveryRecord {
        campaign_id: uuid(row, "campaign_id")?,
        recipient_id: uuid(row, "recipient_id")?,
        position: row.try_get("position")?,
        name: row.try_get("name")?,
        destination: row.try_get("destination")?,
        status: parsed(row, "status")?,
        attempt_count: row.try_get("attempt_count")?,
        sender_id: row.try_get("sender_id")?,
        provider_message_id: row.try_get("provider_message_id")?,
        error_message: row.try_get("error_message")?,
        sent_at: optional_timestamp(row, "sent_at")?,
        failed_at: optional_timestamp(row, "failed_at")?,
    })
}
