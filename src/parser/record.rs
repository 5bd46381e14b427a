use chrono::{DateTime, Utc};
use serde::Serialize;

use super::fields::Field;

/// Capture time layout: UTC, second precision, no offset suffix.
pub const UPDATE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The three resolved values for one chamber.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChamberFields {
    pub status: String,
    pub recent: String,
    pub prev_or_next: String,
}

impl ChamberFields {
    pub(crate) fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Status => &mut self.status,
            Field::Recent => &mut self.recent,
            Field::PrevOrNext => &mut self.prev_or_next,
        }
    }
}

/// Current legislative activity, one per processed document. Only the record
/// builder constructs it, and only with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    house_status: String,
    house_recent: String,
    house_prev_or_next: String,
    senate_status: String,
    senate_recent: String,
    senate_prev_or_next: String,
    update_date: String,
}

impl Record {
    pub(crate) fn new(house: ChamberFields, senate: ChamberFields, captured_at: DateTime<Utc>) -> Self {
        Record {
            house_status: house.status,
            house_recent: house.recent,
            house_prev_or_next: house.prev_or_next,
            senate_status: senate.status,
            senate_recent: senate.recent,
            senate_prev_or_next: senate.prev_or_next,
            update_date: format_capture_time(captured_at),
        }
    }

    pub fn house_status(&self) -> &str {
        &self.house_status
    }

    pub fn house_recent(&self) -> &str {
        &self.house_recent
    }

    pub fn house_prev_or_next(&self) -> &str {
        &self.house_prev_or_next
    }

    pub fn senate_status(&self) -> &str {
        &self.senate_status
    }

    pub fn senate_recent(&self) -> &str {
        &self.senate_recent
    }

    pub fn senate_prev_or_next(&self) -> &str {
        &self.senate_prev_or_next
    }

    pub fn update_date(&self) -> &str {
        &self.update_date
    }
}

/// Format the caller-supplied capture time, truncating sub-second precision.
pub fn format_capture_time(captured_at: DateTime<Utc>) -> String {
    captured_at.format(UPDATE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn chamber(prefix: &str) -> ChamberFields {
        ChamberFields {
            status: format!("{prefix} status"),
            recent: format!("{prefix} recent"),
            prev_or_next: format!("{prefix} prev"),
        }
    }

    #[test]
    fn capture_time_truncates_to_seconds() {
        let at = Utc.with_ymd_and_hms(2018, 2, 3, 20, 56, 7).unwrap()
            + chrono::Duration::milliseconds(999);
        assert_eq!(format_capture_time(at), "2018-02-03T20:56:07");
    }

    #[test]
    fn serializes_with_output_field_names() {
        let at = Utc.with_ymd_and_hms(2018, 2, 3, 20, 56, 7).unwrap();
        let record = Record::new(chamber("h"), chamber("s"), at);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "house_status": "h status",
                "house_recent": "h recent",
                "house_prev_or_next": "h prev",
                "senate_status": "s status",
                "senate_recent": "s recent",
                "senate_prev_or_next": "s prev",
                "update_date": "2018-02-03T20:56:07",
            })
        );
    }
}
