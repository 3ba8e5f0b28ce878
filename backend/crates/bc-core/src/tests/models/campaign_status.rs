use crate::{ActionOutcome, CampaignStatus, CoreError, JobAction};

use std::str::FromStr;

#[test]
fn test_campaign_status_round_trips_through_str() {
    for status in [
        CampaignStatus::Draft,
        CampaignStatus::Queued,
        CampaignStatus::Running,
        CampaignStatus::Paused,
        CampaignStatus::Stopped,
        CampaignStatus::Completed,
        CampaignStatus::CompletedWithErrors,
        CampaignStatus::Failed,
    ] {
        assert_eq!(CampaignStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert!(CampaignStatus::from_str("sending").is_err());
}

#[test]
fn test_campaign_status_default_is_draft() {
    assert_eq!(CampaignStatus::default(), CampaignStatus::Draft);
}

#[test]
fn test_terminal_statuses() {
    assert!(!CampaignStatus::Draft.is_terminal());
    assert!(!CampaignStatus::Paused.is_terminal());
    assert!(CampaignStatus::Stopped.is_terminal());
    assert!(CampaignStatus::Completed.is_terminal());
    assert!(CampaignStatus::CompletedWithErrors.is_terminal());
    assert!(CampaignStatus::Failed.is_terminal());

    assert!(CampaignStatus::Paused.halts_dispatch());
    assert!(!CampaignStatus::Running.halts_dispatch());
}

#[test]
fn test_finished_depends_on_failures() {
    assert_eq!(CampaignStatus::finished(0), CampaignStatus::Completed);
    assert_eq!(
        CampaignStatus::finished(3),
        CampaignStatus::CompletedWithErrors
    );
}

#[test]
fn test_start_from_draft_queues() {
    assert_eq!(
        CampaignStatus::Draft.check_action(JobAction::Start).unwrap(),
        ActionOutcome::Apply(CampaignStatus::Queued)
    );
}

#[test]
fn test_duplicate_start_is_noop() {
    assert_eq!(
        CampaignStatus::Running.check_action(JobAction::Start).unwrap(),
        ActionOutcome::NoOp
    );
    assert_eq!(
        CampaignStatus::Queued.check_action(JobAction::Start).unwrap(),
        ActionOutcome::NoOp
    );
}

#[test]
fn test_start_on_finished_campaign_is_rejected() {
    let err = CampaignStatus::Completed
        .check_action(JobAction::Start)
        .unwrap_err();

    match err {
        CoreError::InvalidTransition { action, status, .. } => {
            assert_eq!(action, "start");
            assert_eq!(status, "completed");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_pause_and_resume() {
    assert_eq!(
        CampaignStatus::Running.check_action(JobAction::Pause).unwrap(),
        ActionOutcome::Apply(CampaignStatus::Paused)
    );
    assert_eq!(
        CampaignStatus::Paused.check_action(JobAction::Pause).unwrap(),
        ActionOutcome::NoOp
    );
    assert_eq!(
        CampaignStatus::Paused.check_action(JobAction::Resume).unwrap(),
        ActionOutcome::Apply(CampaignStatus::Queued)
    );
    assert!(CampaignStatus::Draft.check_action(JobAction::Pause).is_err());
    assert!(CampaignStatus::Draft.check_action(JobAction::Resume).is_err());
    assert!(
        CampaignStatus::Stopped
            .check_action(JobAction::Resume)
            .is_err()
    );
}

#[test]
fn test_stop_is_allowed_from_every_live_status() {
    for status in [
        CampaignStatus::Queued,
        CampaignStatus::Running,
        CampaignStatus::Paused,
    ] {
        assert_eq!(
            status.check_action(JobAction::Stop).unwrap(),
            ActionOutcome::Apply(CampaignStatus::Stopped)
        );
    }
    assert_eq!(
        CampaignStatus::Stopped.check_action(JobAction::Stop).unwrap(),
        ActionOutcome::NoOp
    );
    assert!(CampaignStatus::Draft.check_action(JobAction::Stop).is_err());
    assert!(CampaignStatus::Failed.check_action(JobAction::Stop).is_err());
}
