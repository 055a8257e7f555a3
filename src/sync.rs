use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::{fetch_record, Archive, DateRange};

// Minimum spacing between loop iterations, to stay under the API's
// request-rate expectations.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

// What one sync pass did, for reporting and tests.
#[derive(Debug, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct SyncReport {
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

// Fill the archive at store_path with every date in the range that it
// doesn't already hold. The archive is persisted after each successful
// fetch, so an interrupted run loses at most the in-flight request and
// the next run resumes at the first missing date.
//
// One date failing is never fatal to the range; only being unable to
// write the archive aborts. Leave url as None for the real API.
pub fn sync_range(
    api_key: &str,
    range: DateRange,
    store_path: &Path,
    url: Option<&str>,
    pause: Duration,
) -> Result<SyncReport> {
    let mut archive = Archive::load(store_path);
    let mut report = SyncReport::default();

    for date in range {
        if archive.contains(date) {
            log::info!("Record for {date} already archived, skipping");
            report.skipped += 1;
        } else {
            match fetch_record(api_key, date, url) {
                Ok(record) => {
                    if let Err(dup) = archive.append(record) {
                        // contains() said no, so this is unreachable in
                        // practice; drop the record rather than corrupt.
                        log::error!("Dropping fetched record: {dup}");
                    } else {
                        archive
                            .persist(store_path)
                            .with_context(|| format!("Persist archive after {date}"))?;
                        log::info!("Archived record for {date}");
                        report.fetched += 1;
                    }
                }
                Err(failure) => {
                    log::warn!("Fetch failed for {date}: {failure}");
                    report.failed += 1;
                }
            }
        }
        // Rate spacing is per iteration, skips included.
        std::thread::sleep(pause);
    }

    log::info!(
        "Sync done: {} fetched, {} skipped, {} failed",
        report.fetched,
        report.skipped,
        report.failed
    );
    Ok(report)
}
