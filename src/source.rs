use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::{error::FetchError, models::FileRecord, utils::endpoint_url};

// Where the file list comes from
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Fetch the full list of uploaded files, in backend order.
    async fn list_files(&self) -> Result<Vec<FileRecord>, FetchError>;
}

/// File list served over HTTP at `<base>/files`.
#[derive(Clone)]
pub struct HttpFileSource {
    client: Client,
    files_url: Url,
}

impl HttpFileSource {
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            files_url: endpoint_url(base, &["files"]),
        })
    }
}

#[async_trait]
impl FileSource for HttpFileSource {
    async fn list_files(&self) -> Result<Vec<FileRecord>, FetchError> {
        debug!("Requesting file list from {}", self.files_url);

        let response = self.client.get(self.files_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        // Decode separately so a bad payload is reported as such,
        // not as a transport failure
        let body = response.bytes().await?;
        let files: Vec<FileRecord> = serde_json::from_slice(&body)?;

        debug!("Received {} file records", files.len());
        Ok(files)
    }
}
