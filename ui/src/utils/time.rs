use jiff::civil::Date;
use jiff::{Timestamp, tz};

/// Short local date and time for tables, e.g. `07/03/2025 14:05`.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp
        .to_zoned(tz::TimeZone::system())
        .strftime("%d/%m/%Y %H:%M")
        .to_string()
}

/// Parse the value of an `<input type="date">`. Blank or malformed input
/// yields `None`.
pub fn parse_date(value: &str) -> Option<Date> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

/// The `<input type="date">` value for a date.
pub fn date_input_value(date: Option<Date>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn date_inputs() {
        assert_eq!(parse_date("2025-03-07"), Some(date(2025, 3, 7)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("07/03/2025"), None);
        assert_eq!(date_input_value(Some(date(2025, 3, 7))), "2025-03-07");
        assert_eq!(date_input_value(None), "");
    }
}
