use std::sync::Arc;

use crate::source::FileSource;
use crate::utils::DownloadLinks;

/// Central application state shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where mounted views fetch the file list from.
    pub source: Arc<dyn FileSource>,

    /// Download link builder for the configured file backend.
    pub links: DownloadLinks,
}
