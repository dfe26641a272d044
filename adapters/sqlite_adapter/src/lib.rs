use listing_core::domain::FileRecord;
use listing_core::ports::{RecordSink, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

const CREATE_FILES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS FILES (
        path text,
        name text,
        extension text,
        version integer,
        size integer,
        dateRaw text,
        timeRaw text,
        groupowner text,
        owner text,
        sysPriv text,
        ownPriv text,
        grpPriv text,
        wrldPriv text,
        fullpath text
    )
"#;

const INSERT_FILE: &str =
    "INSERT INTO FILES VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

/// SQLite implementation of the RecordSink trait
pub struct SqliteRecordSink {
    conn: Connection,
}

impl SqliteRecordSink {
    /// Opens (or creates) the database file at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref())?;
        debug!(path = %db_path.as_ref().display(), "opened sqlite database");
        Ok(Self { conn })
    }

    /// Creates a sink backed by a private in-memory database
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Underlying connection, for querying what was written
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordSink for SqliteRecordSink {
    fn create_schema(&self) -> Result<()> {
        self.conn.execute(CREATE_FILES_TABLE, [])?;
        Ok(())
    }

    fn insert(&self, record: &FileRecord) -> Result<()> {
        self.conn.execute(
            INSERT_FILE,
            params![
                record.directory_path,
                record.name,
                record.extension,
                record.version,
                record.size,
                record.date_raw,
                record.time_raw,
                record.group,
                record.owner,
                record.protection.system,
                record.protection.owner,
                record.protection.group,
                record.protection.world,
                record.full_path(),
            ],
        )?;
        Ok(())
    }

    fn write_all(&self, records: &[FileRecord]) -> Result<()> {
        // Dropping the transaction on an early return rolls it back.
        let tx = self.conn.unchecked_transaction()?;
        self.create_schema()?;
        for record in records {
            self.insert(record)?;
        }
        tx.commit()?;
        debug!(rows = records.len(), "committed rows");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listing_core::domain::Protection;

    fn record(name: &str, version: u32) -> FileRecord {
        FileRecord {
            directory_path: "DISK$USER:[SMITH]".to_string(),
            name: name.to_string(),
            extension: "COM".to_string(),
            version,
            size: 2,
            date_raw: "15-JAN-1999".to_string(),
            time_raw: "08:30:45.67".to_string(),
            group: "STAFF".to_string(),
            owner: String::new(),
            protection: Protection {
                system: "RWED".to_string(),
                owner: "RWED".to_string(),
                group: "RE".to_string(),
                world: String::new(),
            },
        }
    }

    #[test]
    fn test_create_schema_is_idempotent() {
        let sink = SqliteRecordSink::in_memory().unwrap();
        sink.create_schema().unwrap();
        sink.create_schema().unwrap();
    }

    #[test]
    fn test_schema_column_order_and_types() {
        let sink = SqliteRecordSink::in_memory().unwrap();
        sink.create_schema().unwrap();

        let mut stmt = sink.connection().prepare("PRAGMA table_info(FILES)").unwrap();
        let columns: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        let names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "path", "name", "extension", "version", "size", "dateRaw", "timeRaw",
                "groupowner", "owner", "sysPriv", "ownPriv", "grpPriv", "wrldPriv", "fullpath"
            ]
        );
        for (name, ty) in &columns {
            let expected = if name == "version" || name == "size" { "INTEGER" } else { "TEXT" };
            assert_eq!(ty.to_uppercase(), expected, "column {name}");
        }
    }

    #[test]
    fn test_insert_writes_typed_row() {
        let sink = SqliteRecordSink::in_memory().unwrap();
        sink.create_schema().unwrap();
        sink.insert(&record("LOGIN", 3)).unwrap();

        let (version, size, owner, wrld, fullpath): (i64, i64, String, String, String) = sink
            .connection()
            .query_row(
                "SELECT version, size, owner, wrldPriv, fullpath FROM FILES",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .unwrap();

        assert_eq!(version, 3);
        assert_eq!(size, 2);
        assert_eq!(owner, "");
        assert_eq!(wrld, "");
        assert_eq!(fullpath, "DISK$USER:[SMITH]LOGIN.COM;3");
    }

    #[test]
    fn test_insert_keeps_row_order() {
        let sink = SqliteRecordSink::in_memory().unwrap();
        sink.create_schema().unwrap();
        for (i, name) in ["B", "A", "C"].iter().enumerate() {
            sink.insert(&record(name, i as u32 + 1)).unwrap();
        }

        let mut stmt = sink.connection().prepare("SELECT name FROM FILES ORDER BY rowid").unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn test_write_all_commits_every_row() {
        let sink = SqliteRecordSink::in_memory().unwrap();
        sink.write_all(&[record("A", 1), record("B", 2)]).unwrap();

        let count: i64 = sink
            .connection()
            .query_row("SELECT COUNT(*) FROM FILES", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_write_all_rolls_back_on_failed_insert() {
        let sink = SqliteRecordSink::in_memory().unwrap();
        sink.connection()
            .execute_batch(
                "CREATE TABLE FILES (
                    path text, name text CHECK (name <> 'B'), extension text,
                    version integer, size integer, dateRaw text, timeRaw text,
                    groupowner text, owner text, sysPriv text, ownPriv text,
                    grpPriv text, wrldPriv text, fullpath text
                )",
            )
            .unwrap();

        let result = sink.write_all(&[record("A", 1), record("B", 2), record("C", 3)]);
        assert!(result.is_err());

        let count: i64 = sink
            .connection()
            .query_row("SELECT COUNT(*) FROM FILES", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_insert_without_schema_fails() {
        let sink = SqliteRecordSink::in_memory().unwrap();
        assert!(sink.insert(&record("LOGIN", 1)).is_err());
    }

    #[test]
    fn test_open_file_database_persists_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("DIRINFO.db");

        {
            let sink = SqliteRecordSink::open(&db_path).unwrap();
            sink.create_schema().unwrap();
            sink.insert(&record("LOGIN", 1)).unwrap();
        }

        let reopened = SqliteRecordSink::open(&db_path).unwrap();
        reopened.create_schema().unwrap();
        let count: i64 = reopened
            .connection()
            .query_row("SELECT COUNT(*) FROM FILES", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
