use tracing::{debug, info, warn};

use crate::domain::FileRecord;
use crate::error::ListingError;
use crate::parser::{extract_records, split_chunks};
use crate::ports::{RecordSink, ReportSource, Result};

/// What to do with a record whose fields fail normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatErrorPolicy {
    /// Log the record and leave it out of the table.
    #[default]
    Skip,
    /// Stop the run before anything is written.
    Abort,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub chunks: usize,
    pub records: usize,
    pub skipped: usize,
}

/// Application service that turns a directory-listing report into table rows
pub struct IngestionServiceImpl {
    report_source: Box<dyn ReportSource>,
    record_sink: Box<dyn RecordSink>,
    policy: FormatErrorPolicy,
}

impl IngestionServiceImpl {
    /// Creates a new IngestionServiceImpl with the given dependencies
    pub fn new(report_source: Box<dyn ReportSource>, record_sink: Box<dyn RecordSink>) -> Self {
        Self {
            report_source,
            record_sink,
            policy: FormatErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FormatErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Executes the ingestion: loads the report, parses it and stores every
    /// valid record.
    ///
    /// All records are parsed and validated before the first insert, so an
    /// aborted run leaves the sink untouched. Writing goes through
    /// [`RecordSink::write_all`], which transactional sinks make atomic.
    pub fn execute_ingestion(&self) -> Result<IngestionSummary> {
        let report = self.report_source.load_report()?;
        let (records, summary) = collect_records(&report, self.policy)?;

        self.record_sink.write_all(&records)?;

        info!(
            chunks = summary.chunks,
            records = summary.records,
            skipped = summary.skipped,
            "ingestion finished"
        );
        Ok(summary)
    }
}

/// Parses a whole report into validated records, applying `policy` to
/// records that fail normalization.
pub fn collect_records(
    report: &str,
    policy: FormatErrorPolicy,
) -> std::result::Result<(Vec<FileRecord>, IngestionSummary), ListingError> {
    let mut records = Vec::new();
    let mut summary = IngestionSummary::default();

    for chunk in split_chunks(report) {
        summary.chunks += 1;
        let before = records.len();

        for extracted in extract_records(chunk) {
            let checked = extracted.and_then(|record| record.timestamp().map(|_| record));
            match checked {
                Ok(record) => records.push(record),
                Err(e) if policy == FormatErrorPolicy::Skip && e.is_format() => {
                    warn!(directory = chunk.directory_path, error = %e, "skipping record");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            directory = chunk.directory_path,
            records = records.len() - before,
            "parsed directory"
        );
    }

    summary.records = records.len();
    Ok((records, summary))
}
