//! Integration tests for the `/api/*` reading-session endpoints.
//!
//! These tests verify:
//!  - Every route is wired with the right method (no 404/405).
//!  - JSON shapes for success, soft outcomes and errors.
//!  - Error status mapping: 404 unknown book, 400 no book selected or bad
//!    body, 500 speech engine unavailable.
//!
//! The router is built around a fake page source and a speech engine that
//! speaks until interrupted, so no PDF parser or audio device is needed.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, library, select_body, send};

// ── Health / library ──────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let lib = library();
    let app = app(&lib, true);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn books_groups_by_folder() {
    let lib = library();
    let app = app(&lib, true);

    let (status, body) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);

    let heresy = body["heresy"].as_array().expect("heresy folder listed");
    assert_eq!(heresy.len(), 1);
    assert_eq!(heresy[0]["name"], "Horus Rising");
    assert_eq!(heresy[0]["size"], 8);
    assert!(heresy[0]["relative_path"].as_str().unwrap().ends_with("Horus Rising.pdf"));
    assert_eq!(heresy[0]["path"], &*lib.book.to_string_lossy());
}

#[tokio::test]
async fn unknown_api_route_is_404() {
    let lib = library();
    let app = app(&lib, true);

    let (status, _) = send(&app, "GET", "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── select-book ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn select_book_returns_selection() {
    let lib = library();
    let app = app(&lib, true);

    let (status, body) = send(&app, "POST", "/api/select-book", Some(&select_body(&lib.book))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "book_name": "Horus Rising",
            "total_pages": 3,
            "current_page": 0,
        })
    );
}

#[tokio::test]
async fn select_missing_book_is_404() {
    let lib = library();
    let app = app(&lib, true);
    let missing = lib.dir.path().join("heresy/Missing.pdf");

    let (status, body) = send(&app, "POST", "/api/select-book", Some(&select_body(&missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Book not found", "status": 404 }));

    let (status, _) = send(&app, "POST", "/api/select-book", Some("{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn select_with_malformed_body_is_400() {
    let lib = library();
    let app = app(&lib, true);

    let (status, body) = send(&app, "POST", "/api/select-book", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

// ── read-page and navigation ──────────────────────────────────────────────────

#[tokio::test]
async fn read_page_without_book_is_400() {
    let lib = library();
    let app = app(&lib, true);

    let (status, body) = send(&app, "POST", "/api/read-page", Some(r#"{"page": 0}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No book selected", "status": 400 }));
}

#[tokio::test]
async fn read_page_without_engine_is_500() {
    let lib = library();
    let app = app(&lib, false);
    send(&app, "POST", "/api/select-book", Some(&select_body(&lib.book))).await;

    let (status, body) = send(&app, "POST", "/api/read-page", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "TTS engine not initialized");
}

#[tokio::test]
async fn read_page_starts_playback() {
    let lib = library();
    let app = app(&lib, true);
    send(&app, "POST", "/api/select-book", Some(&select_body(&lib.book))).await;

    let (status, body) = send(&app, "POST", "/api/read-page", Some(r#"{"page": 1}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "page": 1,
            "text_preview": "Second page.",
            "is_playing": true,
        })
    );

    let (_, status_body) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(status_body["current_page"], 1);
    assert_eq!(status_body["is_playing"], true);
    assert_eq!(status_body["book_name"], "Horus Rising");
    assert_eq!(status_body["auto_continue"], true);
}

#[tokio::test]
async fn read_page_without_body_reads_current_page() {
    let lib = library();
    let app = app(&lib, true);
    send(&app, "POST", "/api/select-book", Some(&select_body(&lib.book))).await;

    let (status, body) = send(&app, "POST", "/api/read-page", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 0);
    assert_eq!(body["text_preview"], "First page.");
}

#[tokio::test]
async fn soft_outcomes_are_200_with_message() {
    let lib = library();
    let app = app(&lib, true);
    send(&app, "POST", "/api/select-book", Some(&select_body(&lib.book))).await;

    let (status, body) = send(&app, "POST", "/api/previous-page", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "message": "Already at first page" }));

    // Page 2 is whitespace only.
    let (status, body) = send(&app, "POST", "/api/read-page", Some(r#"{"page": 2}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "message": "No text found on this page" }));

    let (status, body) = send(&app, "POST", "/api/read-page", Some(r#"{"page": 3}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "message": "End of book reached" }));

    let (_, status_body) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(status_body["current_page"], 0);
}

#[tokio::test]
async fn next_and_previous_pages() {
    let lib = library();
    let app = app(&lib, true);
    send(&app, "POST", "/api/select-book", Some(&select_body(&lib.book))).await;

    let (status, body) = send(&app, "POST", "/api/next-page", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);

    let (_, body) = send(&app, "POST", "/api/previous-page", None).await;
    assert_eq!(body["page"], 0);
}

// ── stop / toggle ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn stop_always_succeeds() {
    let lib = library();
    let app = app(&lib, true);

    let (status, body) = send(&app, "POST", "/api/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    send(&app, "POST", "/api/select-book", Some(&select_body(&lib.book))).await;
    send(&app, "POST", "/api/read-page", None).await;
    let (_, body) = send(&app, "POST", "/api/stop", None).await;
    assert_eq!(body, json!({ "success": true }));

    let (_, status_body) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(status_body["is_playing"], false);
}

#[tokio::test]
async fn toggle_auto_continue_flips() {
    let lib = library();
    let app = app(&lib, true);

    let (status, body) = send(&app, "POST", "/api/toggle-auto-continue", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "auto_continue": false }));

    let (_, body) = send(&app, "POST", "/api/toggle-auto-continue", None).await;
    assert_eq!(body, json!({ "auto_continue": true }));
}

#[tokio::test]
async fn status_before_selection() {
    let lib = library();
    let app = app(&lib, true);

    let (status, body) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book_path"], serde_json::Value::Null);
    assert_eq!(body["current_page"], 0);
    assert_eq!(body["total_pages"], 0);
    assert_eq!(body["is_playing"], false);
    assert_eq!(body["auto_continue"], true);
}

#[tokio::test]
async fn wrong_method_is_405() {
    let lib = library();
    let app = app(&lib, true);

    let (status, _) = send(&app, "GET", "/api/read-page", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// ── Static front-end ──────────────────────────────────────────────────────────

#[tokio::test]
async fn spa_router_serves_index_fallback_and_api() {
    use readaloud_axum::bootstrap::CorsConfig;
    use readaloud_axum::routes::create_spa_router;

    let lib = library();
    let ui = tempfile::tempdir().unwrap();
    std::fs::write(ui.path().join("index.html"), "<h1>readaloud</h1>").unwrap();
    std::fs::write(ui.path().join("app.js"), "console.log(1)").unwrap();

    let app = create_spa_router(common::context(&lib, true), ui.path(), &CorsConfig::AllowAll);

    let (status, body) = send(&app, "GET", "/app.js", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("console.log(1)"));

    let (status, body) = send(&app, "GET", "/library/heresy", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("<h1>readaloud</h1>"));

    let (status, body) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["auto_continue"], true);
}
