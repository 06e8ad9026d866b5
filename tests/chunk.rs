#![cfg(feature = "memory")]

use std::ops::ControlFlow;

use common::*;
use serde_json::json;
use strata::error::StrataError;
use strata::memory::Op;
use strata::prelude::*;

mod common;

#[test]
fn test_chunks_cover_every_record_once() {
    let store = setup_store();
    insert_posts(&store, 25);
    store.clear_journal();

    let mut sizes = Vec::new();
    let mut seen = Vec::new();
    let completed = store
        .query::<Post>()
        .chunk(10, |batch| {
            sizes.push(batch.len());
            seen.extend(titles(&batch));
        })
        .unwrap();

    assert!(completed);
    assert_eq!(sizes, [10, 10, 5]);
    assert_eq!(seen.len(), 25);
    assert_eq!(seen.first().map(String::as_str), Some("post-1"));
    assert_eq!(seen.last().map(String::as_str), Some("post-25"));
    assert_eq!(store.calls(Op::Find), 3);
}

#[test]
fn test_exact_multiple_needs_one_empty_fetch() {
    let store = setup_store();
    insert_posts(&store, 20);
    store.clear_journal();

    let mut calls = 0;
    let completed = store
        .query::<Post>()
        .chunk(10, |_| calls += 1)
        .unwrap();

    assert!(completed);
    assert_eq!(calls, 2);
    assert_eq!(store.calls(Op::Find), 3);
}

#[test]
fn test_callback_can_stop_iteration() {
    let store = setup_store();
    insert_posts(&store, 25);
    store.clear_journal();

    let mut calls = 0;
    let completed = store
        .query::<Post>()
        .chunk(10, |_| {
            calls += 1;
            if calls == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        })
        .unwrap();

    assert!(!completed);
    assert_eq!(calls, 2);
    assert_eq!(store.calls(Op::Find), 2);
}

#[test]
fn test_returning_false_stops_iteration() {
    let store = setup_store();
    insert_posts(&store, 25);
    store.clear_journal();

    let mut calls = 0;
    let completed = store
        .query::<Post>()
        .chunk(10, |_| {
            calls += 1;
            calls < 2
        })
        .unwrap();

    assert!(!completed);
    assert_eq!(calls, 2);
    assert_eq!(store.calls(Op::Find), 2);
}

#[test]
fn test_empty_collection_completes_without_callback() {
    let store = setup_store();

    let mut called = false;
    let completed = store.query::<Post>().chunk(5, |_| called = true).unwrap();

    assert!(completed);
    assert!(!called);
}

#[test]
fn test_constraints_apply_to_every_batch() {
    let store = setup_store();
    insert_posts(&store, 12);

    let mut seen = Vec::new();
    store
        .query::<Post>()
        .where_op("views", Operator::Gt, 4)
        .chunk(3, |batch| seen.extend(titles(&batch)))
        .unwrap();

    assert_eq!(seen.len(), 8);
    assert!(!seen.contains(&"post-4".to_owned()));
}

#[test]
fn test_chunk_by_non_id_column() {
    let store = setup_store();
    for (title, rank) in [("c", 30), ("a", 10), ("d", 40), ("b", 20), ("e", 50)] {
        store.insert("Post", json!({"title": title, "rank": rank})).unwrap();
    }

    let mut seen = Vec::new();
    let completed = store
        .query::<Post>()
        .chunk_by_id(2, |batch| seen.extend(titles(&batch)), "rank", None)
        .unwrap();

    assert!(completed);
    assert_eq!(seen, ["a", "b", "c", "d", "e"]);
}

#[test]
fn test_alias_reads_cursor_from_projected_key() {
    let store = setup_store();
    insert_posts(&store, 5);
    store.clear_journal();

    let mut seen = Vec::new();
    let completed = store
        .query::<Post>()
        .chunk_by_id(2, |batch| seen.extend(titles(&batch)), "views", Some("views"))
        .unwrap();

    assert!(completed);
    assert_eq!(seen, ["post-1", "post-2", "post-3", "post-4", "post-5"]);
    assert_eq!(store.calls(Op::Select), 0);
}

#[test]
fn test_rejected_alias_projection_is_ignored() {
    let store = setup_store();
    insert_posts(&store, 5);

    let query = store.query::<Post>().select(["title"]).unwrap();
    store.fail_next(Op::Select);

    let mut seen = Vec::new();
    let completed = query
        .chunk_by_id(2, |batch| seen.extend(titles(&batch)), "objectId", Some("postId"))
        .unwrap();

    assert!(completed);
    assert_eq!(seen, ["post-1", "post-2", "post-3", "post-4", "post-5"]);
}

#[test]
fn test_alias_leaves_unprojected_records_whole() {
    let store = setup_store();
    insert_posts(&store, 3);
    store.clear_journal();

    let mut seen = Vec::new();
    let completed = store
        .query::<Post>()
        .chunk_by_id(2, |batch| seen.extend(titles(&batch)), "objectId", Some("postId"))
        .unwrap();

    assert!(completed);
    assert_eq!(seen, ["post-1", "post-2", "post-3"]);
    assert_eq!(store.calls(Op::Select), 0);
}

#[test]
fn test_alias_joins_an_existing_projection() {
    let store = setup_store();
    insert_posts(&store, 3);

    let mut ranks = Vec::new();
    store
        .query::<Post>()
        .select(["title"])
        .unwrap()
        .chunk_by_id(
            2,
            |batch| ranks.extend(batch.iter().filter_map(|p| p.get("views"))),
            "views",
            Some("rank"),
        )
        .unwrap();

    assert_eq!(ranks, [Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_missing_cursor_stops_iteration() {
    let store = setup_store();
    store.insert("Post", json!({"title": "a", "rank": 1})).unwrap();
    store.insert("Post", json!({"title": "b"})).unwrap();
    store.insert("Post", json!({"title": "c", "rank": 3})).unwrap();

    let mut seen = Vec::new();
    let completed = store
        .query::<Post>()
        .chunk_by_id(1, |batch| seen.extend(titles(&batch)), "title", Some("missing"))
        .unwrap();

    assert!(completed);
    assert_eq!(seen, ["a", "b", "c"]);

    let mut seen = Vec::new();
    let completed = store
        .query::<Post>()
        .chunk_by_id(1, |batch| seen.extend(titles(&batch)), "rank", None)
        .unwrap();

    assert!(!completed);
    assert_eq!(seen, ["b"]);
}

#[test]
fn test_callback_error_aborts() {
    let store = setup_store();
    insert_posts(&store, 4);

    let result = store.query::<Post>().chunk(2, |_| -> strata::Result<bool> {
        Err(StrataError::ModelNotFound("Post"))
    });

    assert!(matches!(result, Err(StrataError::ModelNotFound("Post"))));
}

#[test]
fn test_remote_failure_mid_walk() {
    let store = setup_store();
    insert_posts(&store, 6);

    let mut batches = 0;
    let result = store.query::<Post>().chunk(2, |_| {
        batches += 1;
        store.fail_next(Op::Find);
    });

    assert!(matches!(result, Err(StrataError::Remote(_))));
    assert_eq!(batches, 1);
}
