//! Date helper functions

use chrono::{DateTime, TimeZone, Utc};

/// Format a timestamp the way an en-US `toLocaleString` does
///
/// # Examples
/// ```ignore
/// locale_string(&date, &chrono_tz::UTC) // -> "1/15/2024, 10:30:00 AM"
/// ```
pub fn locale_string<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(tz)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_string() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(locale_string(&date, &chrono_tz::UTC), "1/15/2024, 10:30:00 AM");

        let date = Utc.with_ymd_and_hms(2024, 11, 5, 23, 5, 9).unwrap();
        assert_eq!(locale_string(&date, &chrono_tz::UTC), "11/5/2024, 11:05:09 PM");
    }

    #[test]
    fn test_locale_string_in_timezone() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            locale_string(&date, &chrono_tz::America::New_York),
            "1/15/2024, 5:30:00 AM"
        );
    }

    #[test]
    fn test_date_xml() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(date_xml(&date), "2024-01-15T10:30:00+00:00");
    }
}
