// Clinic behaviour when the hosted backend misbehaves

mod fixtures;

use anyhow::{anyhow, Result};
use mockall::mock;
use serde_json::{json, Value};

use fixtures::monday;
use vet_calendar::scheduler::{DragKind, DragPayload, DropTarget, PointerPos};
use vet_calendar::services::backend::{Backend, ChangeCallback, Collection, Subscription};
use vet_calendar::state::{Clinic, ClinicOptions, CommitOutcome, DropOutcome};

mock! {
    pub Hosted {}

    impl Backend for Hosted {
        fn fetch_all(&self, collection: Collection, order_by: Option<&'static str>) -> Result<Vec<Value>>;
        fn insert(&self, collection: Collection, rows: Vec<Value>) -> Result<Vec<Value>>;
        fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Vec<Value>>;
        fn delete(&self, collection: Collection, id: &str) -> Result<()>;
        fn upsert_singleton(&self, collection: Collection, row: Value) -> Result<()>;
        fn subscribe(&self, collection: Collection, callback: ChangeCallback) -> Subscription;
        fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<()>;
        fn public_url(&self, bucket: &str, path: &str) -> String;
    }
}

fn hosted() -> MockHosted {
    let mut backend = MockHosted::new();
    backend.expect_fetch_all().returning(|collection, _| match collection {
        Collection::Veterinarians => Ok(vec![
            json!({"id": "V1", "name": "Dr. Han"}),
            json!({"id": "V2", "name": "Dr. Park"}),
        ]),
        Collection::Appointments => Ok(vec![json!({
            "id": "a1", "vet_id": "V1", "date": "2025-06-02",
            "start_time": "09:00", "end_time": "09:30"
        })]),
        Collection::Waitlist => Ok(vec![json!({
            "id": "w1", "patient_id": "p1", "patient_name": "Coco", "vet_id": "V1"
        })]),
        _ => Ok(Vec::new()),
    });
    backend
}

fn loaded(backend: MockHosted) -> Clinic {
    let mut clinic = Clinic::new(Box::new(backend), ClinicOptions::default(), monday());
    assert!(clinic.refresh());
    clinic
}

#[test]
fn test_rejected_move_draws_original_placement() {
    let mut backend = hosted();
    backend
        .expect_update()
        .times(1)
        .returning(|_, _, _| Err(anyhow!("HTTP 503")));
    let mut clinic = loaded(backend);

    let appointment = clinic.appointment("a1").cloned().unwrap();
    clinic
        .scheduler_mut()
        .begin_drag(&appointment, DragKind::Move, PointerPos::new(0.0, 0.0));
    clinic.drag_to(PointerPos::new(250.0, 0.0));
    assert_eq!(clinic.day_layout().block_for("a1").unwrap().vet_id, "V2");

    let outcome = clinic.release_drag().unwrap();
    assert!(matches!(outcome, CommitOutcome::Reverted { .. }));
    assert_eq!(outcome.placement().vet_id, "V1");

    let block = clinic.day_layout().block_for("a1").cloned().unwrap();
    assert_eq!(block.vet_id, "V1");
    assert!(!block.is_dragging);
}

#[test]
fn test_click_without_movement_never_writes() {
    let mut backend = hosted();
    backend.expect_update().never();
    let mut clinic = loaded(backend);

    let appointment = clinic.appointment("a1").cloned().unwrap();
    clinic
        .scheduler_mut()
        .begin_drag(&appointment, DragKind::Resize, PointerPos::new(5.0, 5.0));
    assert_eq!(clinic.release_drag(), None);
}

#[test]
fn test_waitlist_reassign_failure_is_reported() {
    let mut backend = hosted();
    backend
        .expect_update()
        .withf(|collection, _, patch| *collection == Collection::Waitlist && patch["vet_id"].is_null())
        .times(1)
        .returning(|_, _, _| Err(anyhow!("permission denied")));
    let mut clinic = loaded(backend);

    clinic.begin_item_drag(DragPayload::WaitlistEntry("w1".to_string()));
    let outcome = clinic.drop_on(&DropTarget::Practitioner(None), |_: &str| None);
    match outcome {
        DropOutcome::Failed(reason) => assert!(reason.contains("permission denied")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(clinic.waitlist_entry("w1").unwrap().vet_id.as_deref(), Some("V1"));
}

#[test]
fn test_failed_refresh_keeps_loaded_data() {
    let mut backend = MockHosted::new();
    let mut calls = 0;
    backend.expect_fetch_all().returning(move |collection, _| {
        if collection == Collection::Veterinarians {
            calls += 1;
            if calls > 1 {
                return Err(anyhow!("timeout"));
            }
        }
        match collection {
            Collection::Veterinarians => Ok(vec![json!({"id": "V1", "name": "Dr. Han"})]),
            _ => Ok(Vec::new()),
        }
    });

    let mut clinic = loaded(backend);
    assert!(!clinic.refresh());
    assert_eq!(clinic.vets().len(), 1);
}

#[test]
fn test_upload_failure_yields_no_url() {
    let mut backend = hosted();
    backend
        .expect_upload()
        .withf(|bucket, _, _| bucket.to_string() == "order_images")
        .returning(|_, _, _| Err(anyhow!("bucket missing")));
    backend.expect_public_url().never();
    let clinic = loaded(backend);

    assert_eq!(clinic.upload_image("xray.png", b"png"), None);
}
