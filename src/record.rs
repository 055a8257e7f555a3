use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Record is one normalized daily entry from the picture-of-the-day API.
// The date is the unique key within an archive; everything else is
// whatever the service returned, absent fields kept as None.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Record {
    pub date: NaiveDate,
    pub title: Option<String>,
    pub url: Option<String>,
    pub explanation: Option<String>,
    pub media_type: Option<String>,
}

impl Record {
    pub fn is_image(&self) -> bool {
        self.media_type.as_deref() == Some("image")
    }

    pub fn is_video(&self) -> bool {
        self.media_type.as_deref() == Some("video")
    }

    // Length of the explanation text, 0 when absent.
    pub fn explanation_len(&self) -> usize {
        self.explanation.as_deref().map_or(0, str::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_json_field_names() {
        let rec: Record = serde_json::from_str(
            r#"{
                "date": "2020-06-15",
                "title": "A Galaxy",
                "url": "https://example.com/a.jpg",
                "explanation": "Far away.",
                "media_type": "image"
            }"#,
        )
        .unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2020, 6, 15).unwrap());
        assert_eq!(rec.title.as_deref(), Some("A Galaxy"));
        assert!(rec.is_image());
        assert!(!rec.is_video());
        assert_eq!(rec.explanation_len(), 9);
    }

    #[test]
    fn test_record_missing_fields_are_none() {
        let rec: Record = serde_json::from_str(r#"{"date": "2020-06-15"}"#).unwrap();
        assert_eq!(rec.title, None);
        assert_eq!(rec.url, None);
        assert_eq!(rec.explanation, None);
        assert_eq!(rec.media_type, None);
        assert_eq!(rec.explanation_len(), 0);
    }

    #[test]
    fn test_record_date_serializes_iso() {
        let rec = Record {
            date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            ..Record::default()
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["date"], "2020-01-02");
    }
}
