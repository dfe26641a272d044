//! Two-stage parser for native directory-listing reports.
//!
//! [`split_chunks`] cuts the report into one [`DirectoryChunk`] per
//! `Directory ...` section, and [`extract_records`] pulls the file lines out
//! of a chunk. Text that matches neither grammar (disk usage summaries,
//! column labels, blank lines) is skipped without error.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::str::FromStr;

use crate::domain::{DirectoryChunk, FileRecord, Protection};
use crate::error::ListingError;

// A section runs from its header to the nearest following `Total` marker.
static CHUNK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Directory (?P<path>\S*)\s+(?P<body>.*?)\s+Total").unwrap());

// Separators are `\s+`, so an entry whose attributes wrapped onto the next
// line still matches.
static RECORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?P<name>[$A-Z0-9_]+) \. (?P<extension>[$A-Z0-9_]+) ; (?P<version>[0-9]+)
        \s+ (?P<size>[0-9]+)
        \s+ (?P<date>[1-3]?[0-9]-[A-Z]{3}-[0-9]{4})
        \s+ (?P<time>[0-2][0-9]:[0-9]{2}:[0-9]{2}\.[0-9]{2})
        \s+ \[ (?P<group>[A-Z0-9]+) (?: , (?P<owner>[A-Z0-9]*) )? \]
        \s+ \( (?P<sys>[RWED]{0,4}) , (?P<own>[RWED]{0,4}) , (?P<grp>[RWED]{0,4}) , (?P<wrld>[RWED]{0,4}) \)
        ",
    )
    .unwrap()
});

/// Splits a full report into its directory sections, in report order.
///
/// A header without whitespace after the path, or a section with no
/// `Total` line after it, yields nothing.
pub fn split_chunks(report: &str) -> impl Iterator<Item = DirectoryChunk<'_>> + '_ {
    CHUNK_REGEX.captures_iter(report).filter_map(|caps| {
        Some(DirectoryChunk {
            directory_path: caps.name("path")?.as_str(),
            body: caps.name("body")?.as_str(),
        })
    })
}

/// Extracts the file records of one chunk, in listing order.
///
/// Yields an error only for a line that matches the grammar but carries a
/// version that does not fit a `u32` or a size that does not fit an `i64`.
pub fn extract_records<'a>(
    chunk: DirectoryChunk<'a>,
) -> impl Iterator<Item = Result<FileRecord, ListingError>> + 'a {
    RECORD_REGEX
        .captures_iter(chunk.body)
        .map(move |caps| record_from_captures(chunk.directory_path, &caps))
}

fn record_from_captures(
    directory_path: &str,
    caps: &Captures<'_>,
) -> Result<FileRecord, ListingError> {
    let field = |name: &str| caps.name(name).map_or("", |m| m.as_str()).to_string();

    Ok(FileRecord {
        directory_path: directory_path.to_string(),
        name: field("name"),
        extension: field("extension"),
        version: parse_number(caps, "version")?,
        size: parse_number(caps, "size")?,
        date_raw: field("date"),
        time_raw: field("time"),
        group: field("group"),
        owner: field("owner"),
        protection: Protection {
            system: field("sys"),
            owner: field("own"),
            group: field("grp"),
            world: field("wrld"),
        },
    })
}

fn parse_number<T: FromStr>(caps: &Captures<'_>, name: &'static str) -> Result<T, ListingError> {
    let raw = caps.name(name).map_or("", |m| m.as_str());
    raw.parse()
        .map_err(|_| ListingError::format(name, raw, "number out of range"))
}
