// tests/store_test.rs — On-disk store behavior

use std::time::Duration;

use chrono::Utc;
use pretty_assertions::assert_eq;

use ralph::core::types::{EngineSettings, Iteration, Run, RunStatus};
use ralph::provider::{Critique, GeneratedPost};
use ralph::sources::SourceItem;
use ralph::store::Store;

fn settings() -> EngineSettings {
    EngineSettings {
        publish_threshold: 0.85,
        quality_floor: 0.70,
        time_budget: Duration::from_secs(900),
        cost_budget_usd: 2.0,
        max_iterations: 5,
        request_timeout: Duration::from_secs(120),
    }
}

fn iteration(seq: u32, score: f32) -> Iteration {
    Iteration {
        seq,
        post: GeneratedPost {
            title: format!("Post {seq}"),
            excerpt: "excerpt".into(),
            body_markdown: "body".into(),
            tags: vec![],
        },
        score,
        critique: Critique {
            score,
            ai_slop_detected: false,
            main_issues: vec![],
            improvements: vec![],
            strengths: vec![],
        },
        cost: Default::default(),
        created_at: Utc::now(),
    }
}

fn item(id: &str) -> SourceItem {
    SourceItem {
        id: id.into(),
        title: format!("Item {id}"),
        url: format!("https://example.com/{id}"),
        summary: "summary".into(),
    }
}

#[test]
fn test_open_creates_database_and_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("ralph.db");

    let store = Store::open(&path).unwrap();
    assert!(path.exists());

    // Reopening runs migrations idempotently.
    drop(store);
    let store = Store::open(&path).unwrap();
    assert!(store.recent_runs(10).unwrap().is_empty());
}

#[test]
fn test_run_round_trip_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ralph.db");

    let run = Run::new("2026-08-30", &settings());
    {
        let store = Store::open(&path).unwrap();
        store.insert_run(&run).unwrap();
        store.insert_iteration(&run.id, &iteration(1, 0.66)).unwrap();
        store.insert_iteration(&run.id, &iteration(2, 0.91)).unwrap();
        store
            .complete_run(&run.id, RunStatus::Published, Some(2), "quality_met", Some(0.91), 0.03)
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    let runs = store.recent_runs(10).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].slot, "2026-08-30");
    assert_eq!(runs[0].status, "published");

    let scores = store.iteration_scores(&run.id).unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[1].0, 2);
}

#[test]
fn test_source_items_consumed_once() {
    let store = Store::open_in_memory().unwrap();
    for id in ["a", "b", "c"] {
        store.insert_source_item(&item(id)).unwrap();
    }

    let run = Run::new("2026-08-30", &settings());
    store.insert_run(&run).unwrap();

    let unused = store.unused_source_items(10).unwrap();
    assert_eq!(unused.len(), 3);

    store.mark_source_items_used(&["a", "b"], &run.id).unwrap();
    let unused = store.unused_source_items(10).unwrap();
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].id, "c");
}
