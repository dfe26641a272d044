//! Core of the directory-listing importer.
//!
//! Splits a native directory-listing report into per-directory chunks,
//! extracts one [`domain::FileRecord`] per file line and hands the records
//! to whatever [`ports::RecordSink`] the caller injects.

pub mod application;
pub mod domain;
pub mod error;
pub mod parser;
pub mod ports;
pub mod utils;

pub use application::{collect_records, FormatErrorPolicy, IngestionServiceImpl, IngestionSummary};
pub use domain::{DirectoryChunk, FileRecord, Protection};
pub use error::ListingError;
pub use parser::{extract_records, split_chunks};
pub use utils::normalize_timestamp;
