//! Axum handler for `/api/books`.

use axum::Json;
use axum::extract::State;
use readaloud_core::BookCatalog;

use crate::error::HttpError;
use crate::state::AppState;

/// `GET /api/books`
///
/// Walks the library on a blocking thread; large trees take a while.
pub async fn list(State(state): State<AppState>) -> Result<Json<BookCatalog>, HttpError> {
    let library = state.library.clone();
    let catalog = tokio::task::spawn_blocking(move || library.scan())
        .await
        .map_err(|e| HttpError::Internal(format!("Library scan task failed: {e}")))??;
    Ok(Json(catalog))
}
