//! Manual meeting scheduling and status transition tests.

mod support;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use openhouse_domain::{MeetingStatus, MeetingUpdate, NewMeeting, OpenHouseError};
use openhouse_core::{MeetingService, ScheduleOutcome};

use support::repositories::InMemoryStore;
use support::{agent, seed_agent, tomorrow_at};

fn service() -> (Arc<InMemoryStore>, MeetingService) {
    let store = Arc::new(InMemoryStore::default());
    let service = MeetingService::new(store.clone(), store.clone());
    (store, service)
}

fn viewing(assigned_to: &str, at: DateTime<Utc>) -> NewMeeting {
    NewMeeting {
        lead_name: "Alice".into(),
        property_address: "12 Harbor Lane".into(),
        date_time: at,
        duration_min: None,
        assigned_to: assigned_to.into(),
        notes: None,
    }
}

fn unwrap_scheduled(outcome: ScheduleOutcome) -> openhouse_domain::Meeting {
    match outcome {
        ScheduleOutcome::Scheduled(meeting) => meeting,
        ScheduleOutcome::Conflicts(conflicts) => {
            panic!("expected a booking, got conflicts: {conflicts:?}")
        }
    }
}

#[tokio::test]
async fn overlapping_meeting_reports_conflicts() {
    let (_store, service) = service();

    let first = unwrap_scheduled(service.schedule(viewing("Jane", tomorrow_at(10))).await.unwrap());

    let outcome = service
        .schedule(viewing("Jane", tomorrow_at(10) + chrono::Duration::minutes(30)))
        .await
        .unwrap();
    match outcome {
        ScheduleOutcome::Conflicts(conflicts) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].id, first.id);
        }
        ScheduleOutcome::Scheduled(meeting) => panic!("double-booked: {meeting:?}"),
    }
}

#[tokio::test]
async fn back_to_back_meetings_are_allowed() {
    let (_store, service) = service();

    unwrap_scheduled(service.schedule(viewing("Jane", tomorrow_at(10))).await.unwrap());
    unwrap_scheduled(service.schedule(viewing("Jane", tomorrow_at(11))).await.unwrap());
}

#[tokio::test]
async fn different_assignees_do_not_conflict() {
    let (_store, service) = service();

    unwrap_scheduled(service.schedule(viewing("Jane", tomorrow_at(10))).await.unwrap());
    unwrap_scheduled(service.schedule(viewing("Bob", tomorrow_at(10))).await.unwrap());
}

#[tokio::test]
async fn completed_or_missed_meetings_do_not_block_the_slot() {
    let (_store, service) = service();

    let first = unwrap_scheduled(service.schedule(viewing("Jane", tomorrow_at(10))).await.unwrap());
    service
        .update(&first.id, MeetingUpdate { status: Some(MeetingStatus::Missed), ..Default::default() })
        .await
        .unwrap();

    unwrap_scheduled(service.schedule(viewing("Jane", tomorrow_at(10))).await.unwrap());
}

#[tokio::test]
async fn past_meeting_time_is_rejected() {
    let (_store, service) = service();

    let err = service
        .schedule(viewing("Jane", Utc::now() - chrono::Duration::hours(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, OpenHouseError::InvalidInput(_)), "got {err:?}");
}

#[tokio::test]
async fn completion_increments_the_agent_counter() {
    let (store, service) = service();
    seed_agent(&store, agent("Jane", "jane@agency.com"));

    let meeting = unwrap_scheduled(service.schedule(viewing("Jane", tomorrow_at(10))).await.unwrap());
    service
        .update(
            &meeting.id,
            MeetingUpdate { status: Some(MeetingStatus::Completed), ..Default::default() },
        )
        .await
        .unwrap();

    assert_eq!(store.agents.lock().unwrap()[0].completed_meetings, 1);

    // Re-completing the same meeting does not double count.
    service
        .update(
            &meeting.id,
            MeetingUpdate { status: Some(MeetingStatus::Completed), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(store.agents.lock().unwrap()[0].completed_meetings, 1);
}

#[tokio::test]
async fn completing_for_an_unknown_assignee_is_tolerated() {
    let (_store, service) = service();

    let meeting =
        unwrap_scheduled(service.schedule(viewing("Visitor", tomorrow_at(10))).await.unwrap());
    let updated = service
        .update(
            &meeting.id,
            MeetingUpdate { status: Some(MeetingStatus::Completed), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, MeetingStatus::Completed);
}
