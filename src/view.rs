use std::{fmt::Write, sync::Arc};

use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{debug, error, info};

use crate::{
    host::{Mounted, StateSetter},
    models::{FileRecord, ViewError, ViewState},
    source::FileSource,
    utils::{DownloadLinks, format_date},
};

/// Lists uploaded files as an HTML table with download links.
///
/// The file list is requested once, when the view is mounted.
pub struct FileListView {
    source: Arc<dyn FileSource>,
    links: DownloadLinks,
}

impl FileListView {
    pub fn new(source: Arc<dyn FileSource>, links: DownloadLinks) -> Self {
        Self { source, links }
    }

    /// Mounts the view and starts the file list request.
    pub fn mount(self) -> MountedView {
        let source = self.source;
        let inner = Mounted::mount(ViewState::default(), move |setter| load_files(source, setter));
        MountedView {
            inner,
            links: self.links,
        }
    }

    /// Renders `state` as an HTML fragment.
    pub fn render(state: &ViewState, links: &DownloadLinks) -> String {
        let mut html = String::from("<div class=\"file-list\">\n<h2>Uploaded Files</h2>\n");

        if let Some(err) = &state.error {
            let _ = writeln!(html, "<p style=\"color: red\">{}</p>", encode_text(&err.to_string()));
        }
        if state.files.is_empty() && state.error.is_none() {
            html.push_str("<p>No files found.</p>\n");
        }
        if !state.files.is_empty() {
            html.push_str(
                "<table>\n<thead>\n<tr><th>Filename</th><th>Upload Date</th><th>File URL</th></tr>\n</thead>\n<tbody>\n",
            );
            for file in &state.files {
                render_row(&mut html, file, links);
            }
            html.push_str("</tbody>\n</table>\n");
        }

        html.push_str("</div>\n");
        html
    }
}

fn render_row(html: &mut String, file: &FileRecord, links: &DownloadLinks) {
    let file_id = file.file_id.as_deref().unwrap_or_default();
    let filename = file.filename.as_deref().unwrap_or_default();
    let upload_date = format_date(file.upload_date.as_deref().unwrap_or_default());

    let _ = write!(
        html,
        "<tr data-file-id=\"{}\"><td>{}</td><td>{}</td><td>",
        encode_double_quoted_attribute(file_id),
        encode_text(filename),
        encode_text(&upload_date),
    );
    if let Some(href) = links.download_url(filename) {
        let _ = write!(
            html,
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Download</a>",
            encode_double_quoted_attribute(&href),
        );
    }
    html.push_str("</td></tr>\n");
}

async fn load_files(source: Arc<dyn FileSource>, setter: StateSetter<ViewState>) {
    let outcome = tokio::select! {
        biased;
        _ = setter.unmounted() => {
            debug!("View unmounted before the file list arrived");
            return;
        }
        outcome = source.list_files() => outcome,
    };

    if !setter.is_active() {
        debug!("Dropping file list result for unmounted view");
        return;
    }

    match outcome {
        Ok(files) => {
            info!("Fetched {} files", files.len());
            setter.update(|state| state.files = files);
        }
        Err(err) => {
            error!(kind = ?err.kind(), "Error fetching files: {}", err);
            setter.update(|state| state.error = Some(ViewError::from(&err)));
        }
    }
}

/// A mounted [`FileListView`]. Dropping it unmounts the view and abandons
/// any request still in flight.
pub struct MountedView {
    inner: Mounted<ViewState>,
    links: DownloadLinks,
}

impl MountedView {
    pub fn state(&self) -> ViewState {
        self.inner.state()
    }

    /// Renders the current state.
    pub fn render(&self) -> String {
        FileListView::render(&self.inner.state(), &self.links)
    }

    /// Waits for the next state change; `false` once no more can come.
    pub async fn changed(&mut self) -> bool {
        self.inner.changed().await
    }

    /// Re-renders on every state change until the request has finished,
    /// returning the last render.
    pub async fn settle(&mut self) -> String {
        let mut html = self.render();
        while self.changed().await {
            html = self.render();
        }
        html
    }

    pub fn unmount(self) {
        self.inner.unmount();
    }
}
