use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Url;

use crate::error::ConfigError;

/// Shown in place of a date that could not be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Formats an upload timestamp as a `YYYY-MM-DD` calendar date in UTC.
pub fn format_date(raw: &str) -> String {
    parse_upload_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

fn parse_upload_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.with_timezone(&Utc));
    }
    // Backend timestamps usually come without an offset; they are UTC.
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Appends path segments to `base`, percent-encoding each one.
///
/// A trailing slash on the base is dropped first, so `http://h/api/` and
/// `http://h/api` give the same result.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Builds download links against the file backend.
#[derive(Debug, Clone)]
pub struct DownloadLinks {
    base: Url,
}

impl DownloadLinks {
    pub fn new(base: Url) -> Result<Self, ConfigError> {
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(
                base.to_string(),
                "URL cannot carry a path".to_string(),
            ));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `<base>/download/<filename>`, with the filename as one encoded segment.
    ///
    /// `None` for names no path segment can carry: URL parsers drop an empty
    /// segment and resolve `.` and `..` (percent-encoded or not).
    pub fn download_url(&self, filename: &str) -> Option<String> {
        if matches!(filename, "" | "." | "..") {
            return None;
        }
        Some(endpoint_url(&self.base, &["download", filename]).into())
    }
}
