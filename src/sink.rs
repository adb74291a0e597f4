//! CSV output sink: the durable, append-only store of extracted records.
//!
//! One row per article under the fixed header
//! `title,text,url,date,newspaper,section,authors`. This file is the sole
//! handoff artifact for the downstream grouping and dashboard tools, which
//! read it whole and expect exactly this schema. Appends are serialized
//! under a mutex so concurrent worker completions can never interleave a
//! row; every append is flushed so an abort loses at most the row being
//! written.

use crate::error::CrawlError;
use crate::models::ArticleRecord;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Column header of the output file.
pub const HEADER: [&str; 7] = [
    "title",
    "text",
    "url",
    "date",
    "newspaper",
    "section",
    "authors",
];

/// Separator for the `authors` list within its cell.
pub const AUTHOR_SEPARATOR: &str = "; ";

/// Serialized CSV writer shared between workers.
#[derive(Debug)]
pub struct CsvSink {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// Create (or truncate) the output file and write the header row.
    ///
    /// Failure here is fatal configuration-time behavior: the run must not
    /// start against an unwritable output path.
    pub fn create(path: &Path) -> Result<Self, CrawlError> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;
        info!(path = %path.display(), "Output sink ready");
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Append one record as one row. Safe to call from concurrent workers;
    /// a write failure is fatal to the run.
    pub fn append(&self, record: &ArticleRecord) -> Result<(), CrawlError> {
        let date = record.date.map(|d| d.to_string()).unwrap_or_default();
        let authors = record.authors.join(AUTHOR_SEPARATOR);
        let mut writer = self.writer.lock().unwrap();
        writer.write_record([
            record.title.as_str(),
            record.text.as_str(),
            record.url.as_str(),
            date.as_str(),
            record.newspaper.as_str(),
            record.section.as_str(),
            authors.as_str(),
        ])?;
        writer.flush()?;
        debug!(url = %record.url, "Record written");
        Ok(())
    }
}
