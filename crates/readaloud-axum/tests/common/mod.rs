//! Shared fixtures for readaloud-axum integration tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use readaloud_core::{
    ExtractionError, LibraryScanner, PageTextSource, SessionController, SpeechError, SpeechPort,
};
use readaloud_axum::bootstrap::{AxumContext, CorsConfig};
use readaloud_axum::routes::create_router;
use tempfile::TempDir;
use tokio::sync::Notify;
use tower::ServiceExt;

/// Page source backed by in-memory strings.
pub struct FakePages {
    pub books: HashMap<PathBuf, Vec<&'static str>>,
}

impl PageTextSource for FakePages {
    fn page_count(&self, document: &Path) -> usize {
        self.books.get(document).map_or(0, Vec::len)
    }

    fn extract_text(&self, document: &Path, page: usize) -> Result<String, ExtractionError> {
        Ok(self
            .books
            .get(document)
            .and_then(|pages| pages.get(page))
            .map(|text| readaloud_core::normalize_page_text(text))
            .unwrap_or_default())
    }
}

/// Speech engine that speaks until interrupted.
#[derive(Default)]
pub struct HeldSpeech {
    cancel: Notify,
}

#[async_trait]
impl SpeechPort for HeldSpeech {
    async fn speak(&self, _text: &str) -> Result<(), SpeechError> {
        self.cancel.notified().await;
        Err(SpeechError::Interrupted)
    }

    fn interrupt(&self) -> Result<(), SpeechError> {
        self.cancel.notify_waiters();
        Ok(())
    }

    fn engine_name(&self) -> &str {
        "held"
    }
}

/// A library root with one three-page book.
pub struct Library {
    pub dir: TempDir,
    pub book: PathBuf,
}

pub const PAGES: [&str; 3] = ["First page.", "Second\npage.", "   "];

pub fn library() -> Library {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("heresy").join("Horus Rising.pdf");
    std::fs::create_dir_all(book.parent().unwrap()).unwrap();
    std::fs::write(&book, b"%PDF-1.5").unwrap();
    Library { dir, book }
}

pub fn context(library: &Library, with_speech: bool) -> AxumContext {
    let mut books = HashMap::new();
    books.insert(library.book.clone(), PAGES.to_vec());
    let speech: Option<Arc<dyn SpeechPort>> = if with_speech {
        Some(Arc::new(HeldSpeech::default()))
    } else {
        None
    };

    let controller = Arc::new(SessionController::new(Arc::new(FakePages { books }), speech));
    let scanner = LibraryScanner::new(library.dir.path(), Vec::new());
    AxumContext::new(controller, scanner)
}

pub fn app(library: &Library, with_speech: bool) -> Router {
    create_router(context(library, with_speech), &CorsConfig::AllowAll)
}

/// Send a request and return the status with the JSON body (`Null` if empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub fn select_body(path: &Path) -> String {
    serde_json::json!({ "path": path, "name": "Horus Rising" }).to_string()
}
