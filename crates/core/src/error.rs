//! Error taxonomy of the importer.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    /// The report path does not name a readable file.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A captured field does not follow the listing grammar.
    #[error("Format error in {field} `{value}`: {reason}")]
    Format {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ListingError {
    pub(crate) fn format(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ListingError::Format {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, ListingError::Format { .. })
    }
}
