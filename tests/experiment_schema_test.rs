//! Experiment Schema Tests
//!
//! Records, their JSON shape, and the relational behaviour of the store.

use chrono::{Duration, NaiveDate, Utc};
use triangler::experiment::{
    expiry_from, ExperienceLevel, ExperimentRecord, ExperimentStore, ExperimentUpdate,
    NewExperiment, ResponseRecord, SampleFlightRecord, SampleFlightToken,
};
use triangler::significance::Choice;
use triangler::table::Table;
use triangler::Error;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
}

// =============================================================================
// ExperimentRecord Tests
// =============================================================================

#[test]
fn test_experiment_record_builder() {
    let record = ExperimentRecord::builder("Cold brew")
        .description("Steep time 12h vs 18h")
        .schedule(day(1), day(14))
        .build()
        .unwrap();

    assert_eq!(record.name(), "Cold brew");
    assert_eq!(record.description(), "Steep time 12h vs 18h");
    assert!(record.is_active_on(day(7)));
    assert!(!record.is_active_on(day(15)));
}

#[test]
fn test_experiment_record_rejects_reversed_schedule() {
    let err = ExperimentRecord::builder("Backwards")
        .schedule(day(10), day(9))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDateRange { .. }));
}

#[test]
fn test_single_day_experiment_is_valid() {
    assert!(ExperimentRecord::new("One day", "", day(3), day(3)).is_ok());
}

#[test]
fn test_new_experiment_deserializes_and_converts() {
    let payload: NewExperiment = serde_json::from_value(serde_json::json!({
        "name": "Pils",
        "description": "Yeast strain",
        "start_on": "2024-04-01",
        "end_on": "2024-04-30"
    }))
    .unwrap();

    payload.validate().unwrap();
    let record = ExperimentRecord::try_from(payload).unwrap();
    assert_eq!(record.end_on(), day(30));
}

#[test]
fn test_update_applies_present_fields_only() {
    let record = ExperimentRecord::new("Pils", "Yeast strain", day(1), day(30)).unwrap();
    let update: ExperimentUpdate =
        serde_json::from_value(serde_json::json!({ "end_on": "2024-04-20" })).unwrap();

    let updated = record.apply(update).unwrap();

    assert_eq!(updated.name(), "Pils");
    assert_eq!(updated.description(), "Yeast strain");
    assert_eq!(updated.end_on(), day(20));
}

#[test]
fn test_update_revalidates_merged_range() {
    let record = ExperimentRecord::new("Pils", "", day(5), day(10)).unwrap();
    let update = ExperimentUpdate {
        end_on: Some(day(4)),
        ..ExperimentUpdate::default()
    };
    assert!(matches!(
        record.apply(update),
        Err(Error::InvalidDateRange { .. })
    ));
}

// =============================================================================
// Store Tests
// =============================================================================

fn seeded_store() -> (ExperimentStore, u64) {
    let store = ExperimentStore::new();
    let experiment = store
        .experiments()
        .insert(ExperimentRecord::new("Store", "", day(1), day(2)).unwrap())
        .unwrap();
    (store, experiment.id())
}

#[test]
fn test_entity_json_is_flat() {
    let (store, id) = seeded_store();
    let experiment = store.get_experiment(id).unwrap().unwrap();

    let json = serde_json::to_value(&experiment).unwrap();

    assert_eq!(json["id"], id);
    assert_eq!(json["name"], "Store");
    assert!(json.get("record").is_none());
    experiment.validate().unwrap();
}

#[test]
fn test_update_bumps_updated_at() {
    let (store, id) = seeded_store();
    let before = store.get_experiment(id).unwrap().unwrap();

    let renamed = before.apply(ExperimentUpdate::rename("Renamed")).unwrap();
    let after = store.experiments().update(id, renamed).unwrap().unwrap();

    assert_eq!(after.created_at(), before.created_at());
    assert!(after.updated_at() >= before.updated_at());
    assert_eq!(after.name(), "Renamed");
}

#[test]
fn test_flights_scoped_to_experiment() {
    let (store, id) = seeded_store();
    let other = store
        .experiments()
        .insert(ExperimentRecord::new("Other", "", day(1), day(2)).unwrap())
        .unwrap();

    for choice in Choice::ALL {
        store
            .sample_flights()
            .insert(SampleFlightRecord::new(id, choice))
            .unwrap();
    }
    store
        .sample_flights()
        .insert(SampleFlightRecord::new(other.id(), Choice::A))
        .unwrap();

    assert_eq!(store.sample_flights_for_experiment(id).unwrap().len(), 3);
    assert_eq!(store.sample_flights_for_experiment(other.id()).unwrap().len(), 1);
}

#[test]
fn test_delete_flight_cascades_to_token_and_response() {
    let (store, id) = seeded_store();
    let flight = store
        .sample_flights()
        .insert(SampleFlightRecord::new(id, Choice::C))
        .unwrap();
    store
        .insert_token(SampleFlightToken::new(
            "CASC01",
            expiry_from(Utc::now(), 1),
            flight.id(),
        ))
        .unwrap()
        .unwrap();
    store
        .insert_response(ResponseRecord::new(
            id,
            flight.id(),
            Choice::C,
            ExperienceLevel::Expert,
        ))
        .unwrap()
        .unwrap();

    assert!(store.delete_sample_flight(flight.id()).unwrap());

    assert!(store.find_token("CASC01").unwrap().is_none());
    assert!(store.response_for_sample_flight(flight.id()).unwrap().is_none());
    assert!(store.responses().is_empty().unwrap());
    assert!(store.get_experiment(id).unwrap().is_some());
    assert!(!store.delete_sample_flight(flight.id()).unwrap());
}

#[test]
fn test_deleted_token_code_can_be_reissued() {
    let (store, id) = seeded_store();
    let flight = store
        .sample_flights()
        .insert(SampleFlightRecord::new(id, Choice::A))
        .unwrap();
    let expiry = Utc::now() + Duration::days(1);
    store
        .insert_token(SampleFlightToken::new("REUSE1", expiry, flight.id()))
        .unwrap()
        .unwrap();
    store.delete_sample_flight(flight.id()).unwrap();

    let again = store
        .sample_flights()
        .insert(SampleFlightRecord::new(id, Choice::B))
        .unwrap();
    let token = store
        .insert_token(SampleFlightToken::new("REUSE1", expiry, again.id()))
        .unwrap();
    assert!(token.is_some());
}

#[test]
fn test_observation_reports_correctness() {
    let (store, id) = seeded_store();
    let flight = store
        .sample_flights()
        .insert(SampleFlightRecord::new(id, Choice::B))
        .unwrap();
    store
        .insert_response(ResponseRecord::new(
            id,
            flight.id(),
            Choice::A,
            ExperienceLevel::Novice,
        ))
        .unwrap();

    let observation = store.observation(flight).unwrap();

    assert!(!observation.is_awaiting_response());
    assert!(!observation.is_correct());
    assert!(observation.token().is_none());

    let json = serde_json::to_value(&observation).unwrap();
    assert_eq!(json["is_correct"], false);
    assert_eq!(json["response"]["chosen"], "A");
    assert_eq!(json["sample_flight"]["correct_sample"], "B");
}
