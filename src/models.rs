use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{FetchError, FetchErrorKind};

/// One entry of the file list served by the backend's `GET /files`.
///
/// Every field is optional: the backend is not validated, and a record with
/// missing fields still renders (as blank cells).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub upload_date: Option<String>,
}

#[cfg(test)]
impl FileRecord {
    pub fn new(file_id: &str, filename: &str, upload_date: &str) -> Self {
        Self {
            file_id: Some(file_id.to_string()),
            filename: Some(filename.to_string()),
            upload_date: Some(upload_date.to_string()),
        }
    }
}

// Accepts strings as-is, other scalars as their JSON text, null as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Fetch failure as stored in view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewError {
    pub kind: FetchErrorKind,
}

impl ViewError {
    pub const MESSAGE: &'static str = "Error fetching files";
}

impl From<&FetchError> for ViewError {
    fn from(err: &FetchError) -> Self {
        Self { kind: err.kind() }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::MESSAGE)
    }
}

/// State owned by one mounted file list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub files: Vec<FileRecord>,
    pub error: Option<ViewError>,
}
