//! Integration tests for persistence.
//!
//! Round-trips timelines through the JSON document format via the
//! gateway contract, including legacy documents written before the
//! version wrapper and the older timestamp shapes.

use std::time::{Duration, Instant};

use concepto_timeline::{DebouncedSaver, PersistenceGateway, Timeline};

use crate::support::JsonStore;

fn build_timeline() -> Timeline {
    let mut tl = Timeline::new("ep-7");
    tl.add_slide("https://cdn.test/a.png");
    tl.add_slide("https://cdn.test/b.png");
    tl.add_audio_track("music", "https://cdn.test/m.mp3", 0.0, 45.0);
    tl
}

#[tokio::test]
async fn store_roundtrip_preserves_the_model() {
    let store = JsonStore::default();
    let tl = build_timeline();

    (&store).save(&tl).await.unwrap();
    let loaded = (&store).load("ep-7").await.unwrap().unwrap();

    assert_eq!(loaded.id, tl.id);
    assert_eq!(loaded.slides.len(), 2);
    assert_eq!(loaded.slides[0].id, tl.slides[0].id);
    assert_eq!(loaded.audio_tracks[0].volume, 100);
    assert_eq!(loaded.total_duration, 45.0);
    assert_eq!(loaded.created_at, tl.created_at);
}

#[tokio::test]
async fn missing_episode_loads_as_none() {
    let store = JsonStore::default();
    assert!((&store).load("ep-unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn legacy_unversioned_document_with_iso_timestamps_loads() {
    let store = JsonStore::default();

    // a first-generation document: bare timeline, ISO timestamps
    let mut raw = serde_json::to_value(&build_timeline()).unwrap();
    raw["created_at"] = serde_json::json!("2024-03-01T10:00:00Z");
    raw["updated_at"] = serde_json::json!({ "seconds": 1709287200 });
    raw["slides"][0]["created_at"] = serde_json::json!(1709287200.25);
    store.put_raw("ep-7", serde_json::to_vec(&raw).unwrap());

    let loaded = (&store).load("ep-7").await.unwrap().unwrap();
    assert_eq!(loaded.created_at.timestamp(), 1709287200);
    assert_eq!(loaded.updated_at.timestamp(), 1709287200);
    assert_eq!(loaded.slides[0].created_at.timestamp(), 1709287200);

    // saving rewrites it in the current format with native timestamps
    (&store).save(&loaded).await.unwrap();
    let rewritten: serde_json::Value =
        serde_json::from_slice(&store.raw("ep-7").unwrap()).unwrap();
    assert_eq!(rewritten["version"], 1);
    assert!(rewritten["timeline"]["created_at"]["seconds"].is_i64());
}

#[tokio::test]
async fn unreadable_timestamp_is_replaced_not_fatal() {
    let store = JsonStore::default();

    let mut raw = serde_json::to_value(&build_timeline()).unwrap();
    raw["updated_at"] = serde_json::json!("yesterday-ish");
    store.put_raw("ep-7", serde_json::to_vec(&raw).unwrap());

    let loaded = (&store).load("ep-7").await.unwrap().unwrap();
    // repaired to a real time instead of failing the whole load
    assert!(loaded.updated_at.timestamp() > 0);
}

#[tokio::test]
async fn debounced_saver_writes_through_the_gateway() {
    let store = JsonStore::default();
    let tl = build_timeline();
    let mut saver = DebouncedSaver::new();

    let t0 = Instant::now();
    saver.mark_dirty(t0);
    assert!(store.raw("ep-7").is_none());

    assert!(!saver.flush_due(t0 + Duration::from_secs(1), &&store, &tl).await);
    assert!(saver.flush_due(t0 + Duration::from_secs(2), &&store, &tl).await);
    assert!(store.raw("ep-7").is_some());
}
