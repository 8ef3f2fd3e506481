// Test fixtures - reusable clinic data
// Seeds a backend with the same practitioners, patients and bookings in every test file

#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::json;
use vet_calendar::services::backend::{Backend, Collection};

/// Monday June 2, 2025
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

pub fn next_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
}

pub fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()
}

/// Two practitioners, two patients, one waiting entry and two bookings
pub fn seed(backend: &dyn Backend) {
    backend
        .insert(
            Collection::Veterinarians,
            vec![
                json!({"id": "V1", "name": "Dr. Han", "specialty": "Surgery"}),
                json!({"id": "V2", "name": "Dr. Park", "specialty": "Internal medicine"}),
                json!({"id": "ALL_VETS", "name": "All practitioners"}),
            ],
        )
        .expect("seed vets");
    backend
        .insert(
            Collection::Patients,
            vec![
                json!({"id": "p1", "name": "Coco", "owner": "Kim", "species": "Dog", "breed": "Maltese"}),
                json!({"id": "p2", "name": "Nabi", "owner": "Choi", "species": "Cat", "breed": "Korean shorthair"}),
            ],
        )
        .expect("seed patients");
    backend
        .insert(
            Collection::Waitlist,
            vec![json!({
                "id": "w1", "patient_id": "p2", "patient_name": "Nabi",
                "owner_name": "Choi", "vet_id": null, "entry_type": "Consultation"
            })],
        )
        .expect("seed waitlist");
    backend
        .insert(
            Collection::Appointments,
            vec![
                json!({
                    "id": "a1", "vet_id": "V1", "patient_id": "p1", "date": "2025-06-02",
                    "start_time": "09:00", "end_time": "09:30", "reason": "Checkup"
                }),
                json!({
                    "id": "a2", "vet_id": "V2", "patient_id": "p2", "date": "2025-05-26",
                    "start_time": "19:45", "end_time": "20:00", "reason": "Insulin",
                    "is_recurring": true
                }),
            ],
        )
        .expect("seed appointments");
}
