mod common;

use common::{FakeSenderSource, ScriptedTransport, TestEngine, slow_settings};

use bc_core::{CampaignStatus, Job, JobAction, JobState};
use bc_dispatch::Recovery;

use std::time::Duration;

use googletest::prelude::*;
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn given_started_campaigns_when_runner_is_live_then_both_complete() {
    // Given
    let mut h = TestEngine::new(ScriptedTransport::new(), FakeSenderSource::new(&["s1"])).await;
    h.add_contacts(3).await;
    let first = h.started_campaign("One").await;
    let second = h.started_campaign("Two").await;
    let runner = tokio::spawn(h.engine.runner().run());

    // When
    let finished = timeout(WAIT, async {
        loop {
            let a = h.campaign(first.id).await.status;
            let b = h.campaign(second.id).await.status;
            if a.is_terminal() && b.is_terminal() {
                return (a, b);
            }
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();
    h.shutdown.shutdown();
    timeout(WAIT, runner).await.unwrap().unwrap();

    // Then
    assert_that!(
        finished,
        eq((CampaignStatus::Completed, CampaignStatus::Completed))
    );
    assert_that!(h.transport.calls(), len(eq(6)));
    let jobs = h.jobs().find_by_campaign(first.id).await.unwrap();
    assert_that!(jobs[0].state, eq(JobState::Done));
}

#[tokio::test]
async fn given_crashed_worker_state_when_recovering_then_work_is_requeued() {
    // Given: an active job on a running campaign, plus a queued campaign with no job
    let mut h = TestEngine::new(ScriptedTransport::new(), FakeSenderSource::new(&["s1"])).await;
    h.add_contacts(2).await;
    let crashed = h.started_campaign("Crashed").await;
    h.claim().await;
    h.campaigns().mark_running(crashed.id).await.unwrap();

    let orphan = h.started_campaign("Orphan").await;
    let orphan_job = h
        .jobs()
        .find_by_campaign(orphan.id)
        .await
        .unwrap()
        .remove(0);
    let claimed = h.claim().await;
    assert_that!(claimed.id, eq(orphan_job.id));
    h.jobs().complete(claimed.id).await.unwrap();

    // When
    let recovery = h.engine.queue().recover().await.unwrap();

    // Then
    assert_that!(
        recovery,
        eq(Recovery {
            jobs_requeued: 1,
            campaigns_requeued: 1,
            orphans_enqueued: 1,
        })
    );
    assert_that!(
        h.campaign(crashed.id).await.status,
        eq(CampaignStatus::Queued)
    );
    let orphan_jobs: Vec<Job> = h.jobs().find_by_campaign(orphan.id).await.unwrap();
    assert_that!(orphan_jobs, len(eq(2)));
    assert_that!(orphan_jobs[1].action, eq(JobAction::Resume));
    assert_that!(orphan_jobs[1].state, eq(JobState::Pending));
}

#[tokio::test]
async fn given_shutdown_mid_run_when_worker_exits_then_job_stays_active() {
    // Given
    let (transport, mut sends) = ScriptedTransport::with_notifier();
    let mut h = TestEngine::with_settings(
        transport,
        FakeSenderSource::new(&["s1"]),
        slow_settings(),
    )
    .await;
    h.add_contacts(3).await;
    let campaign = h.started_campaign("Hello").await;
    let runner = tokio::spawn(h.engine.runner().run());
    timeout(WAIT, sends.recv()).await.unwrap();

    // When
    h.shutdown.shutdown();
    timeout(WAIT, runner).await.unwrap().unwrap();

    // Then
    let jobs = h.jobs().find_by_campaign(campaign.id).await.unwrap();
    assert_that!(jobs[0].state, eq(JobState::Active));
    assert_that!(
        h.campaign(campaign.id).await.status,
        eq(CampaignStatus::Running)
    );
    let counts = h.deliveries().counts(campaign.id).await.unwrap();
    assert_that!(counts.sent, eq(1));
    assert_that!(counts.pending, eq(2));
}

#[tokio::test]
async fn given_storage_failure_mid_run_when_processing_then_campaign_and_job_fail() {
    // Given
    let mut h = TestEngine::new(ScriptedTransport::new(), FakeSenderSource::new(&["s1"])).await;
    h.add_contacts(3).await;
    let campaign = h.started_campaign("Hello").await;
    sqlx::query(
        r#"
            CREATE TRIGGER fail_second_delivery
            BEFORE UPDATE OF status ON bc_deliveries
            WHEN NEW.position = 1
            BEGIN
                SELECT RAISE(ABORT, 'simulated write failure');
            END
        "#,
    )
    .execute(&h.pool)
    .await
    .unwrap();

    // When
    let outcome = h.claim_and_process().await;

    // Then
    assert_that!(outcome, none());
    let stored = h.campaign(campaign.id).await;
    assert_that!(stored.status, eq(CampaignStatus::Failed));
    assert_that!(
        stored.last_error.as_deref(),
        some(contains_substring("simulated write failure"))
    );
    let jobs = h.jobs().find_by_campaign(campaign.id).await.unwrap();
    assert_that!(jobs, len(eq(1)));
    assert_that!(jobs[0].state, eq(JobState::Failed));
    assert_that!(jobs[0].error, some(anything()));

    let counts = h.deliveries().counts(campaign.id).await.unwrap();
    assert_that!(counts.sent, eq(1));
    assert_that!(counts.pending, eq(2));
    assert_that!(
        h.publisher
            .events_for(campaign.id)
            .last()
            .map(|e| e.snapshot.status),
        some(eq(CampaignStatus::Failed))
    );
}
