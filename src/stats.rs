use chrono::NaiveDate;

use crate::{dates, Archive};

fn opt_date(d: &Option<NaiveDate>) -> String {
    d.as_ref().map(dates::display_date).unwrap_or_default()
}

// Media breakdown of an archive: how many images, how many videos, and
// which date carries the longest explanation text.
#[derive(Debug, Default, tabled::Tabled)]
#[cfg_attr(test, derive(PartialEq))]
pub struct MediaStats {
    #[tabled(rename = "images")]
    pub total_images: usize,
    #[tabled(rename = "videos")]
    pub total_videos: usize,
    #[tabled(rename = "longest explanation", display_with = "opt_date")]
    pub longest_explanation_date: Option<NaiveDate>,
}

impl MediaStats {
    pub fn from_archive(archive: &Archive) -> MediaStats {
        let mut stats = MediaStats::default();
        let mut longest = 0;
        for record in archive.records() {
            if record.is_image() {
                stats.total_images += 1;
            } else if record.is_video() {
                stats.total_videos += 1;
            }
            if record.explanation_len() > longest {
                longest = record.explanation_len();
                stats.longest_explanation_date = Some(record.date);
            }
        }
        stats
    }
}
