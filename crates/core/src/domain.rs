use crate::error::ListingError;
use crate::utils::normalize_timestamp;

/// One directory section of the report: the directory it lists and the
/// unparsed text between its header and its `Total` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryChunk<'a> {
    pub directory_path: &'a str,
    pub body: &'a str,
}

/// Protection mask of a file, one set of `RWED` letters per access class.
/// Letters are kept exactly as listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Protection {
    pub system: String,
    pub owner: String,
    pub group: String,
    pub world: String,
}

/// A single file line of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub directory_path: String,
    pub name: String,
    pub extension: String,
    pub version: u32,
    /// Allocation size in blocks. Bounded by what an SQLite integer holds.
    pub size: i64,
    pub date_raw: String,
    pub time_raw: String,
    pub group: String,
    pub owner: String,
    pub protection: Protection,
}

impl FileRecord {
    /// Native file specification, e.g. `DISK$USER:[SMITH]LOGIN.COM;3`.
    pub fn full_path(&self) -> String {
        format!(
            "{}{}.{};{}",
            self.directory_path, self.name, self.extension, self.version
        )
    }

    /// Sortable timestamp built from the raw date and time fields.
    pub fn timestamp(&self) -> Result<String, ListingError> {
        normalize_timestamp(&self.date_raw, &self.time_raw)
    }
}
