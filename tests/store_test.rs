//! Tests for [`SimulationStore`] — sqlite persistence of results.

#![cfg(feature = "storage")]

use verdandi::store::SimulationStore;
use verdandi::types::{LifeBranch, Mode, SimulationResult, TimelineEvent};

fn sample(id: &str) -> SimulationResult {
    SimulationResult {
        simulation_id: id.to_string(),
        decision: "move to the coast".to_string(),
        mode: Mode::Realistic,
        branches: vec![LifeBranch {
            branch_id: 0,
            title: "The Coastal Path".to_string(),
            story: "A quieter life by the sea.".to_string(),
            timeline: vec![TimelineEvent::new("Year 1", "Settled in")],
            key_events: vec!["Found a new rhythm".to_string()],
            probability_score: 0.6,
            fate_score: 55,
        }],
        created_at: 1_700_000_000,
        share_url: None,
    }
}

#[test]
fn save_then_load_round_trips() {
    let store = SimulationStore::open_in_memory().unwrap();
    let result = sample("abc123");

    store.save(&result).unwrap();
    let loaded = store.load("abc123").unwrap().expect("record should exist");

    assert_eq!(loaded.simulation_id, "abc123");
    assert_eq!(loaded.decision, result.decision);
    assert_eq!(loaded.mode, Mode::Realistic);
    assert_eq!(loaded.branches, result.branches);
    assert_eq!(loaded.created_at, 1_700_000_000);
}

#[test]
fn loading_a_missing_id_returns_none() {
    let store = SimulationStore::open_in_memory().unwrap();
    assert!(store.load("nope").unwrap().is_none());
}

#[test]
fn saving_twice_replaces_the_record() {
    let store = SimulationStore::open_in_memory().unwrap();
    let mut result = sample("dup");
    store.save(&result).unwrap();

    result.decision = "changed my mind".to_string();
    store.save(&result).unwrap();

    let loaded = store.load("dup").unwrap().unwrap();
    assert_eq!(loaded.decision, "changed my mind");
}

#[test]
fn share_counter_increments_for_known_ids() {
    let store = SimulationStore::open_in_memory().unwrap();
    store.save(&sample("shareme")).unwrap();

    assert_eq!(store.share_count("shareme").unwrap(), Some(0));
    assert!(store.record_share("shareme").unwrap());
    assert!(store.record_share("shareme").unwrap());
    assert_eq!(store.share_count("shareme").unwrap(), Some(2));

    assert!(!store.record_share("unknown").unwrap());
    assert_eq!(store.share_count("unknown").unwrap(), None);
}

#[test]
fn records_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simulations.db");

    {
        let store = SimulationStore::open(&path).unwrap();
        store.save(&sample("persisted")).unwrap();
    }

    let store = SimulationStore::open(&path).unwrap();
    let loaded = store.load("persisted").unwrap();
    assert!(loaded.is_some());
}
