use listing_core::error::ListingError;
use listing_core::ports::{ReportSource, Result};
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Reads the directory-listing report from a text file
pub struct FileReportSource {
    path: PathBuf,
}

impl FileReportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSource for FileReportSource {
    fn load_report(&self) -> Result<String> {
        if !self.path.is_file() {
            return Err(ListingError::SourceNotFound(self.path.clone()).into());
        }

        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                ListingError::SourceNotFound(self.path.clone())
            }
            _ => ListingError::Io(e),
        })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "loaded report");

        // Listings are plain ASCII; stray bytes never fall inside a record.
        let report = match String::from_utf8_lossy(&bytes) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => {
                warn!(path = %self.path.display(), "report is not valid UTF-8, replaced invalid bytes");
                text
            }
        };
        Ok(report)
    }
}
