use chrono::NaiveDate;

use crate::Record;

pub const DEFAULT_API_URL: &str = "https://api.nasa.gov/planetary/apod";

// A single fetch attempt either yields a Record or one of these.
// Failures are classified, not raised: the sync loop decides whether
// a date's failure matters to the rest of the range.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed")]
    Connection,

    #[error("HTTP status {0}")]
    Http(u16),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for FetchFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchFailure::Timeout
        } else if err.is_connect() {
            FetchFailure::Connection
        } else if err.is_decode() {
            FetchFailure::Unexpected(err.to_string())
        } else if let Some(status) = err.status() {
            FetchFailure::Http(status.as_u16())
        } else {
            FetchFailure::Unexpected(err.to_string())
        }
    }
}

// Fetch the record for one date from the picture-of-the-day API.
// https://api.nasa.gov/#apod
// Leave url as None to use the default endpoint.
// Exactly one request per call; a failure never yields a Record.
pub fn fetch_record(
    api_key: &str,
    date: NaiveDate,
    url: Option<&str>,
) -> Result<Record, FetchFailure> {
    let client = reqwest::blocking::Client::new();
    let url = url.unwrap_or(DEFAULT_API_URL);

    let req = client
        .get(url)
        .query(&[
            ("api_key", api_key),
            ("date", &date.format("%Y-%m-%d").to_string()),
        ])
        .build()?;

    log::debug!("Sending request: {req:?}");

    let record: Record = client.execute(req)?.error_for_status()?.json()?;
    Ok(record)
}
