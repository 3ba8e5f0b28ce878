use crate::Result as DbErrorResult;
use crate::repositories::columns::{millis, optional_timestamp, parsed, timestamp, uuid};

use bc_core::Job;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

const JOB_COLUMNS: &str =
    "id, campaign_id, action, state, enqueued_at, claimed_at, finished_at, error";

/// Durable queue of campaign control actions.
///
/// The claim query hands out the oldest pending job whose campaign has no
/// active job; a partial unique index backs the one-active-per-campaign rule.
#[derive(Clone)]
pub struct JobRepository {
    pool: SqlitePool,
}

pub(crate) async fn insert_job(conn: &mut SqliteConnection, job: &Job) -> DbErrorResult<()> {
    sqlx::query(
        r#"
            INSERT INTO bc_jobs (
                id, campaign_id, action, state, enqueued_at, claimed_at, finished_at, error
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(job.id.to_string())
    .bind(job.campaign_id.to_string())
    .bind(job.action.as_str())
    .bind(job.state.as_str())
    .bind(millis(job.enqueued_at))
    .bind(job.claimed_at.map(millis))
    .bind(job.finished_at.map(millis))
    .bind(&job.error)
    .execute(conn)
    .await?;

    Ok(())
}

impl JobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a job as-is (used for pause/stop, recorded already done)
    pub async fn record(&self, job: &Job) -> DbErrorResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_job(&mut *conn, job).await
    }

    /// Enqueue a worker job unless the campaign already has one pending.
    ///
    /// Returns `false` for the duplicate case.
    pub async fn enqueue(&self, job: &Job) -> DbErrorResult<bool> {
        let result = sqlx::query(
            r#"
                INSERT INTO bc_jobs (id, campaign_id, action, state, enqueued_at)
                SELECT ?, ?, ?, 'pending', ?
                WHERE NOT EXISTS (
                    SELECT 1 FROM bc_jobs
                    WHERE campaign_id = ? AND state = 'pending'
                      AND action IN ('start', 'resume')
                )
            "#,
        )
        .bind(job.id.to_string())
        .bind(job.campaign_id.to_string())
        .bind(job.action.as_str())
        .bind(millis(job.enqueued_at))
        .bind(job.campaign_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// paused -> queued plus a pending resume job, in one transaction.
    ///
    /// Returns `false` when the campaign was no longer paused.
    pub async fn enqueue_resume(&self, job: &Job) -> DbErrorResult<bool> {
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            r#"
                UPDATE bc_campaigns
                SET status = 'queued', updated_at = ?
                WHERE id = ? AND status = 'paused'
            "#,
        )
        .bind(millis(Utc::now()))
        .bind(job.campaign_id.to_string())
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        insert_job(&mut *tx, job).await?;
        tx.commit().await?;

        Ok(true)
    }

    /// Atomically take the next runnable job and mark it active
    pub async fn claim_next(&self) -> DbErrorResult<Option<Job>> {
        let row = sqlx::query(&format!(
            r#"
                UPDATE bc_jobs
                SET state = 'active', claimed_at = ?
                WHERE id = (
                    SELECT j.id FROM bc_jobs j
                    WHERE j.state = 'pending'
                      AND NOT EXISTS (
                          SELECT 1 FROM bc_jobs a
                          WHERE a.campaign_id = j.campaign_id AND a.state = 'active'
                      )
                    ORDER BY j.enqueued_at, j.rowid
                    LIMIT 1
                )
                RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(millis(Utc::now()))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(job_from_row).transpose()
    }

    pub async fn complete(&self, job_id: Uuid) -> DbErrorResult<()> {
        sqlx::query(
            "UPDATE bc_jobs SET state = 'done', finished_at = ? WHERE id = ? AND state = 'active'",
        )
        .bind(millis(Utc::now()))
        .bind(job_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fail(&self, job_id: Uuid, error: &str) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE bc_jobs
                SET state = 'failed', finished_at = ?, error = ?
                WHERE id = ? AND state = 'active'
            "#,
        )
        .bind(millis(Utc::now()))
        .bind(error)
        .bind(job_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// active -> pending for jobs orphaned by a crash or shutdown
    pub async fn requeue_active(&self) -> DbErrorResult<u64> {
        let result = sqlx::query(
            "UPDATE bc_jobs SET state = 'pending', claimed_at = NULL WHERE state = 'active'",
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Queued campaigns with no pending or active job to drive them
    pub async fn orphaned_queued_campaigns(&self) -> DbErrorResult<Vec<Uuid>> {
        let rows = sqlx::query(
            r#"
                SELECT c.id FROM bc_campaigns c
                WHERE c.status = 'queued'
                  AND NOT EXISTS (
                      SELECT 1 FROM bc_jobs j
                      WHERE j.campaign_id = c.id AND j.state IN ('pending', 'active')
                  )
                ORDER BY c.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| uuid(row, "id")).collect()
    }

    pub async fn find_by_campaign(&self, campaign_id: Uuid) -> DbErrorResult<Vec<Job>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM bc_jobs WHERE campaign_id = ? ORDER BY enqueued_at, rowid",
            JOB_COLUMNS
        ))
        .bind(campaign_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(job_from_row).collect()
    }

    pub async fn pending_count(&self) -> DbErrorResult<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM bc_jobs WHERE state = 'pending'")
            .fetch_one(&self.pool)
            .await?
            .try_get("n")?;

        Ok(count)
    }
}

fn job_from_row(row: &SqliteRow) -> DbErrorResult<Job> {
    Ok(Job {
        id: uuid(row, "id")?,
        campaign_id: uuid(row, "campaign_id")?,
        action: parsed(row, "action")?,
        state: parsed(row, "state")?,
        enqueued_at: timestamp(row, "enqueued_at")?,
        claimed_at: optional_timestamp(row, "claimed_at")?,
        finished_at: optional_timestamp(row, "finished_at")?,
        error: row.try_get("error")?,
    })
}
