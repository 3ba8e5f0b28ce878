use crate::{CampaignStatus, DeliveryCounts, ProgressEvent, ProgressSnapshot};

use googletest::prelude::*;
use proptest::prelude::*;
use uuid::Uuid;

fn counts(sent: i64, failed: i64, pending: i64) -> DeliveryCounts {
    DeliveryCounts {
        sent,
        failed,
        pending,
    }
}

#[test]
fn given_empty_campaign_when_computing_then_percentage_is_complete() {
    let snapshot = ProgressSnapshot::compute(
        Uuid::new_v4(),
        CampaignStatus::Completed,
        0,
        counts(0, 0, 0),
        1.0,
    );

    assert_that!(snapshot.percentage, eq(100.0));
    assert_that!(snapshot.eta_seconds, eq(0));
}

#[test]
fn given_running_campaign_when_computing_then_eta_uses_pace() {
    let snapshot = ProgressSnapshot::compute(
        Uuid::new_v4(),
        CampaignStatus::Running,
        10,
        counts(3, 1, 6),
        2.5,
    );

    assert_that!(snapshot.percentage, eq(40.0));
    assert_that!(snapshot.eta_seconds, eq(15));
    assert_that!(snapshot.pending, eq(6));
}

#[test]
fn given_paused_campaign_when_computing_then_eta_is_zero() {
    let snapshot = ProgressSnapshot::compute(
        Uuid::new_v4(),
        CampaignStatus::Paused,
        10,
        counts(2, 0, 8),
        5.0,
    );

    assert_that!(snapshot.eta_seconds, eq(0));
}

#[test]
fn given_nan_pace_when_computing_then_eta_is_zero() {
    let snapshot = ProgressSnapshot::compute(
        Uuid::new_v4(),
        CampaignStatus::Running,
        4,
        counts(0, 0, 4),
        f64::NAN,
    );

    assert_that!(snapshot.eta_seconds, eq(0));
}

#[test]
fn given_status_event_when_serialized_then_recipient_is_omitted() {
    let snapshot = ProgressSnapshot::compute(
        Uuid::new_v4(),
        CampaignStatus::Paused,
        1,
        counts(0, 0, 1),
        0.0,
    );
    let event = ProgressEvent::status(snapshot, Some("no sender available".into()));

    let json = serde_json::to_value(&event).unwrap();

    assert_that!(json["kind"].as_str(), some(eq("status")));
    assert_that!(json.get("recipient"), none());
    assert_that!(json["reason"].as_str(), some(eq("no sender available")));
    assert_that!(event.event_type(), eq("status"));
}

proptest! {
    #[test]
    fn percentage_stays_within_bounds(
        sent in 0i64..500,
        failed in 0i64..500,
        pending in 0i64..500,
        pace in 0.0f64..30.0,
    ) {
        let total = sent + failed + pending;
        let snapshot = ProgressSnapshot::compute(
            Uuid::new_v4(),
            CampaignStatus::Running,
            total,
            counts(sent, failed, pending),
            pace,
        );

        prop_assert!(snapshot.percentage >= 0.0 && snapshot.percentage <= 100.0);
        prop_assert_eq!(snapshot.sent + snapshot.failed + snapshot.pending, total);
        if pending == 0 {
            prop_assert_eq!(snapshot.eta_seconds, 0);
        }
    }
}
