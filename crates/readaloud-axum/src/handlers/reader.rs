//! Axum handlers for the reading-session endpoints.
//!
//! Handlers are thin wrappers - each calls exactly one `SessionController`
//! method and returns the result as JSON. Request and response shapes are
//! co-located here to keep the handler surface self-contained.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use readaloud_core::{BookSelection, PagePlayback, ReadOutcome, SessionStatus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::HttpError;
use crate::state::AppState;

// ── Request body shapes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectBookRequest {
    pub path: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadPageRequest {
    pub page: Option<usize>,
}

// ── Response body shapes ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SelectBookResponse {
    pub success: bool,
    #[serde(flatten)]
    pub selection: BookSelection,
}

/// Page read result: the playback fields on success, a message otherwise.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub success: bool,
    #[serde(flatten)]
    pub playback: Option<PagePlayback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<ReadOutcome> for PageResponse {
    fn from(outcome: ReadOutcome) -> Self {
        let message = outcome.message();
        match outcome {
            ReadOutcome::Started(playback) => Self {
                success: true,
                playback: Some(playback),
                message: None,
            },
            ReadOutcome::EndOfBook | ReadOutcome::NoText | ReadOutcome::AtFirstPage => Self {
                success: false,
                playback: None,
                message,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct AutoContinueResponse {
    pub auto_continue: bool,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /api/select-book`
pub async fn select_book(
    State(state): State<AppState>,
    payload: Result<Json<SelectBookRequest>, JsonRejection>,
) -> Result<Json<SelectBookResponse>, HttpError> {
    let Json(request) = payload?;
    let Some(path) = request.path.filter(|p| !p.is_empty()) else {
        return Err(HttpError::NotFound("Book not found".to_owned()));
    };

    let selection = state.controller.select(path, request.name).await?;
    Ok(Json(SelectBookResponse {
        success: true,
        selection,
    }))
}

/// `POST /api/read-page`
///
/// The body is optional; without one the current page is read.
pub async fn read_page(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PageResponse>, HttpError> {
    let request: ReadPageRequest = parse_optional_body(&body)?;
    let outcome = state.controller.read_page(request.page).await?;
    Ok(Json(outcome.into()))
}

/// `POST /api/next-page`
pub async fn next_page(State(state): State<AppState>) -> Result<Json<PageResponse>, HttpError> {
    Ok(Json(state.controller.next().await?.into()))
}

/// `POST /api/previous-page`
pub async fn previous_page(
    State(state): State<AppState>,
) -> Result<Json<PageResponse>, HttpError> {
    Ok(Json(state.controller.previous().await?.into()))
}

/// `POST /api/stop`
pub async fn stop(State(state): State<AppState>) -> Json<StopResponse> {
    state.controller.stop();
    Json(StopResponse { success: true })
}

/// `GET /api/status`
pub async fn status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.controller.status())
}

/// `POST /api/toggle-auto-continue`
pub async fn toggle_auto_continue(State(state): State<AppState>) -> Json<AutoContinueResponse> {
    Json(AutoContinueResponse {
        auto_continue: state.controller.toggle_auto_continue(),
    })
}

/// Deserialize a JSON body, treating an empty body as the default value.
fn parse_optional_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| HttpError::BadRequest(format!("Invalid request body: {e}")))
}
