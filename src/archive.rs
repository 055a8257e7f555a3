use std::collections::HashSet;
use std::fs;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::Record;

// Appending a date that is already archived is a driver bug; the
// archive rejects it rather than storing a second row for the key.
#[derive(Debug, thiserror::Error)]
#[error("record for {0} is already archived")]
pub struct DuplicateDate(pub NaiveDate);

// Archive is the on-disk collection of records, one per calendar date.
// On disk it is a single JSON list, ordered as fetched; in memory a
// date index is kept alongside so membership checks don't scan.
// Both are updated together in append, never independently.
#[derive(Debug, Default)]
pub struct Archive {
    records: Vec<Record>,
    dates: HashSet<NaiveDate>,
}

impl Archive {
    // Load an archive from a JSON file.
    // A missing or unreadable file resumes as an empty archive so a
    // first run can bootstrap from nothing; corruption is only a warning.
    pub fn load(path: &Path) -> Archive {
        log::debug!("Loading archive from {path:?}");
        let file = match fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No archive at {path:?}, starting empty");
                return Archive::default();
            }
            Err(e) => {
                log::warn!("Failed to open archive {path:?}, starting empty: {e}");
                return Archive::default();
            }
        };
        let records: Vec<Record> = match serde_json::from_reader(BufReader::new(file)) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Archive {path:?} is empty or corrupt, starting empty: {e}");
                return Archive::default();
            }
        };
        if records.is_empty() {
            log::info!("Archive {path:?} is valid but holds no records");
        }
        let dates = records.iter().map(|r| r.date).collect();
        Archive { records, dates }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    // Add a record, keeping the sequence and the date index in step.
    pub fn append(&mut self, record: Record) -> Result<(), DuplicateDate> {
        if !self.dates.insert(record.date) {
            return Err(DuplicateDate(record.date));
        }
        self.records.push(record);
        Ok(())
    }

    // Rewrite the whole archive file.
    // Writes to a temp file next to the destination and renames it into
    // place, so a reader never sees a half-written list.
    pub fn persist(&self, path: &Path) -> Result<()> {
        log::debug!("Persisting {} records to {path:?}", self.records.len());
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            fs::create_dir_all(dir).with_context(|| format!("Create {dir:?}"))?;
        }
        let tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))
            .with_context(|| format!("Create temp file next to {path:?}"))?;
        let mut writer = BufWriter::new(&tmp);
        serde_json::to_writer_pretty(&mut writer, &self.records)
            .with_context(|| format!("Serialize archive for {path:?}"))?;
        writer.flush()?;
        drop(writer);
        tmp.persist(path)
            .with_context(|| format!("Replace {path:?}"))?;
        Ok(())
    }
}
