use axum::{extract::State, http::Uri, response::Html};
use tracing::debug;

use crate::{error::AppError, state::AppState, view::FileListView};

/// Render the uploaded files page.
///
/// Mounts a fresh view, waits for its file list request to finish and
/// returns the final render. If the client goes away first, the handler
/// future is dropped, which unmounts the view and abandons the request.
pub async fn files_page(State(state): State<AppState>) -> Html<String> {
    let mut view = FileListView::new(state.source.clone(), state.links.clone()).mount();

    let body = view.settle().await;

    let view_state = view.state();
    debug!(
        files = view_state.files.len(),
        error = ?view_state.error.map(|e| e.kind),
        "Rendered files page"
    );
    view.unmount();

    Html(page(&body))
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Uploaded Files</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        body
    )
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app,
        error::FetchError,
        models::FileRecord,
        source::FileSource,
        utils::DownloadLinks,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use reqwest::Url;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedSource(Vec<FileRecord>);

    #[async_trait]
    impl FileSource for FixedSource {
        async fn list_files(&self) -> Result<Vec<FileRecord>, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl FileSource for FailingSource {
        async fn list_files(&self) -> Result<Vec<FileRecord>, FetchError> {
            Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    fn state(source: Arc<dyn FileSource>) -> AppState {
        AppState {
            source,
            links: DownloadLinks::new(Url::parse("http://files.example.com").unwrap()).unwrap(),
        }
    }

    async fn get(state: AppState, path: &str) -> (StatusCode, String) {
        let response = app(state)
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn page_lists_files() {
        let source = FixedSource(vec![FileRecord {
            file_id: Some("65e6f1a2".into()),
            filename: Some("report.pdf".into()),
            upload_date: Some("2024-03-05T10:15:00.512000".into()),
        }]);

        let (status, body) = get(state(Arc::new(source)), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains("<title>Uploaded Files</title>"));
        assert!(body.contains("<td>report.pdf</td><td>2024-03-05</td>"));
        assert!(body.contains("href=\"http://files.example.com/download/report.pdf\""));
    }

    #[tokio::test]
    async fn page_shows_error_without_failing_request() {
        let (status, body) = get(state(Arc::new(FailingSource)), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Error fetching files"));
        assert!(!body.contains("<table>"));
    }

    #[tokio::test]
    async fn page_is_html() {
        let response = app(state(Arc::new(FixedSource(Vec::new()))))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }

    #[tokio::test]
    async fn health_and_unknown_routes() {
        let (status, body) = get(state(Arc::new(FixedSource(Vec::new()))), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");

        let (status, body) = get(state(Arc::new(FixedSource(Vec::new()))), "/upload").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("No route for /upload"));
    }
}
