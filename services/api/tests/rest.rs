//! End-to-end tests for the REST router, backed by the in-memory store.

use api_lib::adapters::{corpus::parse_corpus, InMemoryPositionStore};
use api_lib::web::{router, AppState};
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tilawah_core::domain::Corpus;
use tilawah_core::reference::ReferenceIndex;
use tower::ServiceExt;
use uuid::Uuid;

fn app_with(corpus: impl FnOnce(&ReferenceIndex) -> Corpus) -> Arc<AppState> {
    let index = Arc::new(ReferenceIndex::standard().unwrap());
    let corpus = Arc::new(corpus(&index));
    Arc::new(AppState::new(
        Arc::new(InMemoryPositionStore::new()),
        index,
        corpus,
    ))
}

fn app() -> Arc<AppState> {
    app_with(|index| index.placeholder_corpus())
}

async fn send(
    state: &Arc<AppState>,
    method: Method,
    uri: &str,
    user: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header("x-user-id", user.to_string());
    }
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn requests_without_a_valid_user_are_rejected() {
    let state = app();
    let (status, _) = send(&state, Method::GET, "/reading", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .uri("/reading")
        .header("x-user-id", "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn new_reader_starts_at_the_opening_verse() {
    let state = app();
    let (status, body) = send(&state, Method::GET, "/reading", Some(Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verse"]["id"], "1:1");
    assert_eq!(body["verse"]["part"], 1);
    assert_eq!(body["verse"]["text"], Value::Null);
    assert_eq!(body["is_first"], true);
    assert_eq!(body["can_go_previous"], false);
    assert_eq!(body["loaded_verses"], 6236);
    assert_eq!(body["progress"]["overall"], 0.0);
}

#[tokio::test]
async fn next_and_previous_walk_the_sequence() {
    let state = app();
    let user = Some(Uuid::new_v4());

    let (status, body) = send(&state, Method::POST, "/reading/previous", user, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "at_boundary");

    let (_, body) = send(&state, Method::POST, "/reading/next", user, None).await;
    assert_eq!(body["outcome"], "moved");
    assert_eq!(body["reading"]["verse"]["id"], "1:2");
    state.settle_all().await;

    let (_, body) = send(&state, Method::POST, "/reading/previous", user, None).await;
    assert_eq!(body["outcome"], "moved");
    assert_eq!(body["reading"]["verse"]["id"], "1:1");
}

#[tokio::test]
async fn jump_accepts_a_verse_or_an_index() {
    let state = app();
    let user = Some(Uuid::new_v4());

    let (status, body) = send(
        &state,
        Method::POST,
        "/reading/jump",
        user,
        Some(json!({ "chapter": 2, "verse": 142 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reading"]["verse"]["global_index"], 148);
    assert_eq!(body["reading"]["verse"]["part"], 2);
    state.settle_all().await;

    let (_, body) = send(
        &state,
        Method::POST,
        "/reading/jump",
        user,
        Some(json!({ "index": 6235 })),
    )
    .await;
    assert_eq!(body["reading"]["verse"]["id"], "114:6");
    assert_eq!(body["reading"]["is_last"], true);
    assert_eq!(body["reading"]["progress"]["overall"], 99.98);
    state.settle_all().await;

    let (_, body) = send(&state, Method::POST, "/reading/next", user, None).await;
    assert_eq!(body["outcome"], "at_boundary");
}

#[tokio::test]
async fn invalid_jump_targets_are_bad_requests() {
    let state = app();
    let user = Some(Uuid::new_v4());

    let (status, _) = send(
        &state,
        Method::POST,
        "/reading/jump",
        user,
        Some(json!({ "index": 6236 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &state,
        Method::POST,
        "/reading/jump",
        user,
        Some(json!({ "chapter": 1, "verse": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&state, Method::GET, "/reading", user, None).await;
    assert_eq!(body["verse"]["id"], "1:1");
}

#[tokio::test]
async fn position_survives_a_new_session() {
    let state = app();
    let user = Uuid::new_v4();
    send(
        &state,
        Method::POST,
        "/reading/jump",
        Some(user),
        Some(json!({ "index": 500 })),
    )
    .await;
    state.settle_all().await;

    // A second process sharing the same store resumes where the first stopped.
    let resumed = Arc::new(AppState::new(
        state.store.clone(),
        state.index.clone(),
        state.corpus.clone(),
    ));
    let (_, body) = send(&resumed, Method::GET, "/reading", Some(user), None).await;
    assert_eq!(body["verse"]["id"], "4:8");
}

#[tokio::test]
async fn marking_read_and_resetting() {
    let state = app();
    let user = Some(Uuid::new_v4());

    let (_, body) = send(&state, Method::POST, "/reading/read", user, None).await;
    assert_eq!(body["newly_read"], true);
    assert_eq!(body["reading"]["read_count"], 1);
    assert_eq!(body["reading"]["is_read"], true);

    let (_, body) = send(&state, Method::POST, "/reading/read", user, None).await;
    assert_eq!(body["newly_read"], false);
    assert_eq!(body["reading"]["read_count"], 1);

    send(&state, Method::POST, "/reading/next", user, None).await;
    state.settle_all().await;

    let (status, body) = send(&state, Method::POST, "/reading/reset", user, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reading"]["verse"]["id"], "1:1");
    assert_eq!(body["reading"]["read_count"], 0);
}

#[tokio::test]
async fn daily_verse_advances_once_per_day() {
    let state = app();
    let user = Some(Uuid::new_v4());

    let (status, body) = send(&state, Method::GET, "/daily?date=2024-05-01", user, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verse"]["id"], "1:1");
    assert_eq!(body["read_today"], false);

    let (_, body) = send(&state, Method::POST, "/daily/read?date=2024-05-01", user, None).await;
    assert_eq!(body["verse"]["id"], "1:1");
    assert_eq!(body["read_today"], true);

    let (_, body) = send(&state, Method::POST, "/daily/read?date=2024-05-01", user, None).await;
    assert_eq!(body["verse"]["id"], "1:1");

    let (_, body) = send(&state, Method::GET, "/daily?date=2024-05-01", user, None).await;
    assert_eq!(body["verse"]["id"], "1:1");
    assert_eq!(body["read_today"], true);

    let (_, body) = send(&state, Method::GET, "/daily?date=2024-05-02", user, None).await;
    assert_eq!(body["verse"]["id"], "1:2");
    assert_eq!(body["read_today"], false);
}

#[tokio::test]
async fn daily_cursor_is_independent_of_navigation() {
    let state = app();
    let user = Some(Uuid::new_v4());
    send(
        &state,
        Method::POST,
        "/reading/jump",
        user,
        Some(json!({ "index": 1000 })),
    )
    .await;
    state.settle_all().await;

    let (_, body) = send(&state, Method::GET, "/daily?date=2024-05-01", user, None).await;
    assert_eq!(body["verse"]["id"], "1:1");
}

#[tokio::test]
async fn reference_tables_are_listed() {
    let state = app();
    let (status, chapters) = send(&state, Method::GET, "/reference/chapters", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let chapters = chapters.as_array().unwrap();
    assert_eq!(chapters.len(), 114);
    assert_eq!(chapters[1]["number"], 2);
    assert_eq!(chapters[1]["verse_count"], 286);
    assert_eq!(chapters[1]["parts"], json!([1, 2, 3]));

    let (_, parts) = send(&state, Method::GET, "/reference/parts", None, None).await;
    let parts = parts.as_array().unwrap();
    assert_eq!(parts.len(), 30);
    assert_eq!(parts[29]["start"], "78:1");
    assert_eq!(parts[29]["end"], "114:6");
    assert_eq!(parts[29]["verse_count"], 564);
}

#[tokio::test]
async fn partial_corpus_limits_navigation_and_carries_text() {
    let state = app_with(|index| {
        parse_corpus(
            r#"[
                {"chapter": 1, "verse": 1, "text": "first"},
                {"chapter": 1, "verse": 2, "text": "second"}
            ]"#,
            index,
        )
        .unwrap()
    });
    let user = Some(Uuid::new_v4());

    let (_, body) = send(&state, Method::GET, "/reading", user, None).await;
    assert_eq!(body["verse"]["text"], "first");
    assert_eq!(body["loaded_verses"], 2);

    let (_, body) = send(&state, Method::POST, "/reading/next", user, None).await;
    assert_eq!(body["reading"]["verse"]["text"], "second");
    assert_eq!(body["reading"]["is_last"], true);
    state.settle_all().await;

    let (status, _) = send(
        &state,
        Method::POST,
        "/reading/jump",
        user,
        Some(json!({ "index": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
