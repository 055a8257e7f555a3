use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{dates, Archive};

// One line of the summary CSV. Dates here are display form DD/MM/YYYY,
// and are the dedup key for the file.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct ExportRow {
    pub date: String,
    pub title: String,
    pub media_type: String,
    pub url: String,
}

fn read_existing_dates(path: &Path) -> Result<HashSet<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Read existing summary {path:?}"))?;
    let mut dates = HashSet::new();
    for row in reader.deserialize() {
        let row: ExportRow = row.with_context(|| format!("Parse summary row in {path:?}"))?;
        dates.insert(row.date);
    }
    Ok(dates)
}

// Merge the archive into the summary CSV at path.
// Existing rows are kept as written; only records whose display date is
// not yet present are appended, in archive order. The header is written
// once, when the file is first created. Returns the appended row count.
// Running this twice against an unchanged archive appends nothing the
// second time.
pub fn export_summary(archive: &Archive, path: &Path) -> Result<usize> {
    if archive.is_empty() {
        bail!("Archive holds no records, nothing to export");
    }

    let exists = path.exists();
    let mut existing = if exists {
        let dates = read_existing_dates(path)?;
        log::debug!("Summary {path:?} already holds {} dates", dates.len());
        dates
    } else {
        log::info!("Summary {path:?} not found, creating it");
        HashSet::new()
    };

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Open summary {path:?} for append"))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(!exists)
        .from_writer(file);

    let mut appended = 0;
    for record in archive.records() {
        let date = dates::display_date(&record.date);
        if !existing.insert(date.clone()) {
            log::trace!("Summary already has {date}, skipping");
            continue;
        }
        writer.serialize(ExportRow {
            date,
            title: record.title.clone().unwrap_or_default(),
            media_type: record.media_type.clone().unwrap_or_default(),
            url: record.url.clone().unwrap_or_default(),
        })?;
        appended += 1;
    }
    writer.flush()?;

    log::info!("Appended {appended} rows to {path:?}");
    Ok(appended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(day: u32, title: &str) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2020, 1, day).unwrap(),
            title: Some(title.into()),
            url: Some(format!("https://example.com/{day}.jpg")),
            media_type: Some("image".into()),
            ..Record::default()
        }
    }

    fn archive(records: Vec<Record>) -> Archive {
        let mut archive = Archive::default();
        for r in records {
            archive.append(r).unwrap();
        }
        archive
    }

    #[test]
    fn test_export_empty_archive_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");
        assert!(export_summary(&Archive::default(), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_export_writes_header_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");

        let first = archive(vec![record(1, "One")]);
        assert_eq!(export_summary(&first, &path).unwrap(), 1);

        let second = archive(vec![record(1, "One"), record(2, "Two")]);
        assert_eq!(export_summary(&second, &path).unwrap(), 1);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            [
                "date,title,media_type,url",
                "01/01/2020,One,image,https://example.com/1.jpg",
                "02/01/2020,Two,image,https://example.com/2.jpg",
                "",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_export_twice_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");

        let archive = archive(vec![record(1, "One"), record(2, "Two")]);
        assert_eq!(export_summary(&archive, &path).unwrap(), 2);
        let after_first = fs::read_to_string(&path).unwrap();

        assert_eq!(export_summary(&archive, &path).unwrap(), 0);
        let after_second = fs::read_to_string(&path).unwrap();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_export_escapes_commas_in_titles() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");

        let archive = archive(vec![record(1, "Comet, up close")]);
        export_summary(&archive, &path).unwrap();

        // A quoted title must read back as one field, not split the row.
        let dates = read_existing_dates(&path).unwrap();
        assert!(dates.contains("01/01/2020"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Comet, up close\""));
    }

    #[test]
    fn test_export_missing_fields_become_blank_cells() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");

        let bare = Record {
            date: NaiveDate::from_ymd_opt(2020, 1, 5).unwrap(),
            ..Record::default()
        };
        export_summary(&archive(vec![bare]), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            ["date,title,media_type,url", "05/01/2020,,,", ""].join("\n")
        );
    }
}
