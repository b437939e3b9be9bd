use chrono::{prelude::*, Duration, LocalResult};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DateParseError {
    #[error("Unable to parse `{0}` as a date-time")]
    Malformed(String),
}

// Tried after RFC 3339, which needs seconds and a full `+HH:MM` offset
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Resolves webinar start dates, as the admins type them into the store, to
/// absolute UTC instants.
///
/// Dates carrying an offset are converted directly. Dates without one are
/// wall-clock times in the organization's local zone.
#[derive(Debug, Clone, Copy)]
pub struct TimeNormalizer {
    local: Tz,
}

impl TimeNormalizer {
    pub fn new(local: Tz) -> Self {
        Self { local }
    }

    pub fn timezone(&self) -> Tz {
        self.local
    }

    pub fn normalize(&self, raw: &str) -> Result<DateTime<Utc>, DateParseError> {
        let value = canonical_form(raw);
        if value.is_empty() {
            return Err(DateParseError::Malformed(raw.to_string()));
        }

        if let Ok(datetime) = DateTime::parse_from_rfc3339(&value) {
            return Ok(datetime.with_timezone(&Utc));
        }
        for format in OFFSET_FORMATS {
            if let Ok(datetime) = DateTime::parse_from_str(&value, format) {
                return Ok(datetime.with_timezone(&Utc));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&value, format) {
                return Ok(self.localize(naive));
            }
        }
        if let Some(naive) = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(self.localize(naive));
        }

        Err(DateParseError::Malformed(raw.to_string()))
    }

    /// Ambiguous wall-clock times resolve to the earlier instant. Times that
    /// fall into a DST gap are read with the offset in force before the gap.
    fn localize(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.local.from_local_datetime(&naive) {
            LocalResult::Single(datetime) => datetime.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let before_gap = self
                    .local
                    .offset_from_utc_datetime(&(naive - Duration::days(1)))
                    .fix();
                let utc = naive - Duration::seconds(i64::from(before_gap.local_minus_utc()));
                Utc.from_utc_datetime(&utc)
            }
        }
    }
}

/// `2025-07-26 10:00:00` and `2025-07-26T10:00:00` are the same date for us
fn canonical_form(raw: &str) -> String {
    let mut value = raw.trim().to_string();
    if value.len() > 10 && value.is_char_boundary(10) && value.as_bytes()[10] == b' ' {
        value.replace_range(10..11, "T");
    }
    value
}

pub fn format_time_of_day(datetime: &DateTime<Utc>, tz: &Tz) -> String {
    datetime.with_timezone(tz).format("%H:%M").to_string()
}
