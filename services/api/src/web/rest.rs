//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI document.

use crate::web::protocol::{
    ChapterView, DailyQuery, DailyVerseView, JumpRequest, MarkReadResponse, PartView,
    ProgressView, ReadingView, StepOutcome, StepResponse, VerseView,
};
use crate::web::state::{AppState, SharedReader};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;
use tilawah_core::domain::VerseId;
use tilawah_core::navigation::{NavigationController, Step};
use tracing::error;
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_reading_handler,
        next_handler,
        previous_handler,
        jump_handler,
        reset_handler,
        mark_read_handler,
        daily_verse_handler,
        daily_read_handler,
        list_chapters_handler,
        list_parts_handler,
    ),
    components(
        schemas(
            ReadingView, VerseView, ProgressView, StepOutcome, StepResponse, MarkReadResponse,
            JumpRequest, DailyVerseView, ChapterView, PartView
        )
    ),
    tags(
        (name = "Tilawah API", description = "Sequential verse navigation, progress and daily verse.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Helpers
//=========================================================================================

type HandlerError = (StatusCode, String);

fn user_id_from(headers: &HeaderMap) -> Result<Uuid, HandlerError> {
    let user_id_str = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "x-user-id header is required".to_string(),
            )
        })?;

    Uuid::parse_str(user_id_str).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid x-user-id format".to_string(),
        )
    })
}

async fn reader_for(state: &AppState, headers: &HeaderMap) -> Result<SharedReader, HandlerError> {
    let user_id = user_id_from(headers)?;
    state.reader(user_id).await.map_err(|e| {
        error!("Failed to load reading state for {}: {:?}", user_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load reading state".to_string(),
        )
    })
}

fn step_response(step: Step, nav: &NavigationController) -> Result<Json<StepResponse>, HandlerError> {
    let outcome = match step {
        Step::Moved(_) => StepOutcome::Moved,
        Step::AtBoundary => StepOutcome::AtBoundary,
        Step::Busy => {
            return Err((
                StatusCode::CONFLICT,
                "A previous navigation is still being saved".to_string(),
            ))
        }
    };
    Ok(Json(StepResponse {
        outcome,
        reading: ReadingView::from_controller(nav),
    }))
}

//=========================================================================================
// Reading Handlers
//=========================================================================================

/// Current verse, progress and navigation flags. Loads saved state on first call.
#[utoipa::path(
    get,
    path = "/reading",
    responses(
        (status = 200, description = "Current reading state", body = ReadingView),
        (status = 400, description = "Missing or invalid x-user-id header"),
        (status = 500, description = "Reading state could not be loaded")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the user."))
)]
pub async fn get_reading_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ReadingView>, HandlerError> {
    let reader = reader_for(&state, &headers).await?;
    let nav = reader.lock().await;
    Ok(Json(ReadingView::from_controller(&nav)))
}

/// Advance one verse.
#[utoipa::path(
    post,
    path = "/reading/next",
    responses(
        (status = 200, description = "Moved, or already at the last verse", body = StepResponse),
        (status = 409, description = "A previous move is still being saved")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the user."))
)]
pub async fn next_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StepResponse>, HandlerError> {
    let reader = reader_for(&state, &headers).await?;
    let mut nav = reader.lock().await;
    let step = nav.next();
    step_response(step, &nav)
}

/// Go back one verse.
#[utoipa::path(
    post,
    path = "/reading/previous",
    responses(
        (status = 200, description = "Moved, or already at the first verse", body = StepResponse),
        (status = 409, description = "A previous move is still being saved")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the user."))
)]
pub async fn previous_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StepResponse>, HandlerError> {
    let reader = reader_for(&state, &headers).await?;
    let mut nav = reader.lock().await;
    let step = nav.previous();
    step_response(step, &nav)
}

/// Jump to a global index or to a chapter/verse pair.
#[utoipa::path(
    post,
    path = "/reading/jump",
    request_body = JumpRequest,
    responses(
        (status = 200, description = "Moved", body = StepResponse),
        (status = 400, description = "Target is outside the loaded verses"),
        (status = 409, description = "A previous move is still being saved")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the user."))
)]
pub async fn jump_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<JumpRequest>,
) -> Result<Json<StepResponse>, HandlerError> {
    let reader = reader_for(&state, &headers).await?;
    let mut nav = reader.lock().await;
    let result = match request {
        JumpRequest::Index { index } => nav.jump_to(index),
        JumpRequest::Verse { chapter, verse } => {
            nav.jump_to_verse(VerseId::new(chapter, verse))
        }
    };
    // Both error variants describe a target the caller got wrong.
    match result {
        Ok(step) => step_response(step, &nav),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

/// Return to the first verse and clear the read set.
#[utoipa::path(
    post,
    path = "/reading/reset",
    responses(
        (status = 200, description = "Reading state reset", body = StepResponse),
        (status = 409, description = "A previous move is still being saved")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the user."))
)]
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StepResponse>, HandlerError> {
    let reader = reader_for(&state, &headers).await?;
    let mut nav = reader.lock().await;
    let step = nav.reset();
    step_response(step, &nav)
}

/// Mark the current verse as read.
#[utoipa::path(
    post,
    path = "/reading/read",
    responses(
        (status = 200, description = "Verse is in the read set", body = MarkReadResponse)
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the user."))
)]
pub async fn mark_read_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MarkReadResponse>, HandlerError> {
    let reader = reader_for(&state, &headers).await?;
    let mut nav = reader.lock().await;
    let newly_read = nav.mark_current_as_read();
    Ok(Json(MarkReadResponse {
        newly_read,
        reading: ReadingView::from_controller(&nav),
    }))
}

//=========================================================================================
// Daily Verse Handlers
//=========================================================================================

/// The verse of the day. Fetching never advances it.
#[utoipa::path(
    get,
    path = "/daily",
    responses(
        (status = 200, description = "The daily verse", body = DailyVerseView),
        (status = 500, description = "Daily cursor could not be loaded")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user."),
        DailyQuery
    )
)]
pub async fn daily_verse_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyVerseView>, HandlerError> {
    let user_id = user_id_from(&headers)?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let daily = state.daily.todays_verse(user_id, date).await.map_err(|e| {
        error!("Failed to load daily verse for {}: {:?}", user_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load daily verse".to_string(),
        )
    })?;
    let text = state.corpus.get(daily.position.global_index);
    Ok(Json(DailyVerseView::new(&daily, text)))
}

/// Mark the verse of the day as read, advancing the cursor for the next day.
#[utoipa::path(
    post,
    path = "/daily/read",
    responses(
        (status = 200, description = "The verse that was read", body = DailyVerseView),
        (status = 500, description = "Daily cursor could not be saved")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user."),
        DailyQuery
    )
)]
pub async fn daily_read_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyVerseView>, HandlerError> {
    let user_id = user_id_from(&headers)?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let daily = state.daily.mark_daily_read(user_id, date).await.map_err(|e| {
        error!("Failed to mark daily verse for {}: {:?}", user_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to mark daily verse as read".to_string(),
        )
    })?;
    let text = state.corpus.get(daily.position.global_index);
    Ok(Json(DailyVerseView::new(&daily, text)))
}

//=========================================================================================
// Reference Handlers
//=========================================================================================

/// All chapters with verse counts and the parts they span.
#[utoipa::path(
    get,
    path = "/reference/chapters",
    responses((status = 200, description = "Chapter table", body = [ChapterView]))
)]
pub async fn list_chapters_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ChapterView>> {
    Json(state.index.chapters().iter().map(ChapterView::from).collect())
}

/// All structural parts with their boundaries.
#[utoipa::path(
    get,
    path = "/reference/parts",
    responses((status = 200, description = "Part table", body = [PartView]))
)]
pub async fn list_parts_handler(State(state): State<Arc<AppState>>) -> Json<Vec<PartView>> {
    Json(state.index.parts().iter().map(PartView::from).collect())
}
