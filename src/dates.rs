use anyhow::{anyhow, bail, Result};
use chrono::{Days, NaiveDate};

// Dates on the command line and in the summary CSV use DD/MM/YYYY.
// The archive key is the ISO YYYY-MM-DD form, which chrono uses natively.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

pub fn parse_display_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DISPLAY_FORMAT)
        .map_err(|e| anyhow!("Invalid date '{s}', expected DD/MM/YYYY: {e}"))
}

pub fn display_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

// DateRange walks every calendar day from start to end, inclusive, ascending.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(test, derive(PartialEq))]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<DateRange> {
        if start > end {
            bail!("Invalid range: start {start} is after end {end}");
        }
        Ok(DateRange {
            next: Some(start),
            end,
        })
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let date = self.next?;
        self.next = if date < self.end {
            date.checked_add_days(Days::new(1))
        } else {
            None
        };
        Some(date)
    }
}
