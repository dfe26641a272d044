use crate::domain::FileRecord;
use std::error::Error;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Supplies the raw directory-listing report.
pub trait ReportSource {
    fn load_report(&self) -> Result<String>;
}

/// Trait for persisting extracted records
/// This is a port (interface) that defines how the core communicates with storage adapters
pub trait RecordSink {
    /// Creates the `FILES` table unless it already exists.
    fn create_schema(&self) -> Result<()>;

    /// Appends one row.
    fn insert(&self, record: &FileRecord) -> Result<()>;

    /// Creates the schema and appends every record as one unit of work.
    /// Sinks that support transactions override this so a failure part way
    /// through leaves nothing behind.
    fn write_all(&self, records: &[FileRecord]) -> Result<()> {
        self.create_schema()?;
        for record in records {
            self.insert(record)?;
        }
        Ok(())
    }
}
