//! Lead CRUD and webhook ingestion tests.

mod support;

use std::sync::Arc;

use openhouse_domain::{LeadStatus, LeadUpdate, NewLead, OpenHouseError};
use openhouse_core::{LeadService, NotificationFanout};

use support::notify::RecordingChannels;
use support::repositories::InMemoryStore;

fn service() -> (Arc<InMemoryStore>, LeadService) {
    let store = Arc::new(InMemoryStore::default());
    let channels = RecordingChannels::default();
    let fanout = Arc::new(NotificationFanout::new(
        channels.email.clone(),
        channels.sms.clone(),
        channels.realtime.clone(),
    ));
    let service = LeadService::new(store.clone(), fanout);
    (store, service)
}

fn fields(name: &str, email: &str) -> NewLead {
    NewLead {
        name: name.into(),
        email: email.into(),
        phone: None,
        source: Some("webhook".into()),
        budget: None,
        property_type_preference: None,
        timeline: None,
        notes: None,
    }
}

#[tokio::test]
async fn create_rejects_duplicates_case_insensitively() {
    let (_store, service) = service();

    service.create(fields("Bob", "bob@x.com")).await.unwrap();
    let err = service.create(fields("Bobby", "BOB@X.com")).await.unwrap_err();
    assert!(matches!(err, OpenHouseError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn webhook_ingestion_merges_instead_of_duplicating() {
    let (store, service) = service();

    let (first, created) = service.ingest(fields("Carol", "carol@x.com")).await.unwrap();
    assert!(created);

    let mut resubmission = fields("Carol Smith", "Carol@X.com");
    resubmission.phone = Some("+15550123".into());
    resubmission.budget = Some(650_000.0);

    let (merged, created) = service.ingest(resubmission).await.unwrap();
    assert!(!created);
    assert_eq!(merged.id, first.id);
    assert_eq!(merged.name, "Carol Smith");
    assert_eq!(merged.phone.as_deref(), Some("+15550123"));
    assert_eq!(merged.budget, Some(650_000.0));

    // Still exactly one record.
    assert_eq!(store.leads.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn merge_keeps_pipeline_state() {
    let (_store, service) = service();

    let (lead, _) = service.ingest(fields("Carol", "carol@x.com")).await.unwrap();
    service
        .update(&lead.id, LeadUpdate { status: Some(LeadStatus::Nurturing), ..Default::default() })
        .await
        .unwrap();

    let (merged, _) = service.ingest(fields("Carol", "carol@x.com")).await.unwrap();
    assert_eq!(merged.status, LeadStatus::Nurturing);
}

#[tokio::test]
async fn status_change_refreshes_last_contacted() {
    let (_store, service) = service();

    let lead = service.create(fields("Dan", "dan@x.com")).await.unwrap();
    let initial = lead.last_contacted_at;

    let updated = service
        .update(&lead.id, LeadUpdate { status: Some(LeadStatus::Contacted), ..Default::default() })
        .await
        .unwrap();
    assert!(updated.last_contacted_at >= initial);
    assert_eq!(updated.status, LeadStatus::Contacted);

    // A non-status update leaves the contact timestamp alone.
    let touched = service
        .update(&lead.id, LeadUpdate { notes: Some("called twice".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(touched.last_contacted_at, updated.last_contacted_at);
}

#[tokio::test]
async fn empty_update_is_invalid() {
    let (_store, service) = service();
    let lead = service.create(fields("Dan", "dan@x.com")).await.unwrap();

    let err = service.update(&lead.id, LeadUpdate::default()).await.unwrap_err();
    assert!(matches!(err, OpenHouseError::InvalidInput(_)), "got {err:?}");
}

#[tokio::test]
async fn stats_count_by_status() {
    let (_store, service) = service();

    service.create(fields("A", "a@x.com")).await.unwrap();
    let b = service.create(fields("B", "b@x.com")).await.unwrap();
    service
        .update(&b.id, LeadUpdate { status: Some(LeadStatus::Closed), ..Default::default() })
        .await
        .unwrap();

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.new, 1);
    assert_eq!(stats.closed, 1);
}

#[tokio::test]
async fn delete_unknown_lead_is_not_found() {
    let (_store, service) = service();
    let err = service.delete("missing").await.unwrap_err();
    assert!(matches!(err, OpenHouseError::NotFound(_)), "got {err:?}");
}
