//! Tabular export for report and list views.
//!
//! Rows are JSON objects keyed by column key, which is what the backend
//! hands back for reports. Every format goes through [`format_cell`] so a
//! value reads the same in a CSV, a spreadsheet and a PDF.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use serde_json::{Map, Value};

mod chart;
mod delimited;
mod pdf;
mod spreadsheet;

pub use chart::bar_percentages;
pub use delimited::{BOM, DELIMITER, to_csv};
pub use pdf::to_pdf;
pub use spreadsheet::to_xlsx;

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    fn value<'a>(&self, row: &'a Row) -> &'a Value {
        row.get(&self.key).unwrap_or(&Value::Null)
    }
}

/// Presentation settings shared by every export format.
#[derive(Debug, Clone)]
pub struct ExportLocale {
    pub yes: String,
    pub no: String,
    /// strftime pattern for plain dates.
    pub date_format: String,
    /// strftime pattern for timestamps.
    pub datetime_format: String,
    pub time_zone: TimeZone,
}

impl Default for ExportLocale {
    fn default() -> Self {
        Self {
            yes: "Yes".into(),
            no: "No".into(),
            date_format: "%d/%m/%Y".into(),
            datetime_format: "%d/%m/%Y %H:%M".into(),
            time_zone: TimeZone::UTC,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("PDF export failed: {0}")]
    Pdf(String),
}

/// Render a single cell as text.
pub fn format_cell(value: &Value, locale: &ExportLocale) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => locale.yes.clone(),
        Value::Bool(false) => locale.no.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => String::new(),
            _ => n.to_string(),
        },
        Value::String(s) => {
            format_date(s, locale).unwrap_or_else(|| s.clone())
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn format_date(s: &str, locale: &ExportLocale) -> Option<String> {
    // Cheap shape check before handing anything to the parser.
    let bytes = s.as_bytes();
    if bytes.len() < 10
        || !bytes[..4].iter().all(u8::is_ascii_digit)
        || bytes[4] != b'-'
    {
        return None;
    }

    if bytes.len() == 10 {
        let date: Date = s.parse().ok()?;
        return Some(date.strftime(&locale.date_format).to_string());
    }
    if let Ok(ts) = s.parse::<Timestamp>() {
        let zoned = ts.to_zoned(locale.time_zone.clone());
        return Some(zoned.strftime(&locale.datetime_format).to_string());
    }
    let dt: DateTime = s.parse().ok()?;
    Some(dt.strftime(&locale.datetime_format).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fmt(value: Value) -> String {
        format_cell(&value, &ExportLocale::default())
    }

    #[test]
    fn scalars() {
        assert_eq!(fmt(Value::Null), "");
        assert_eq!(fmt(json!(true)), "Yes");
        assert_eq!(fmt(json!(false)), "No");
        assert_eq!(fmt(json!(42)), "42");
        assert_eq!(fmt(json!(2.5)), "2.5");
        assert_eq!(fmt(json!("Black tea")), "Black tea");
        // serde_json turns NaN into null on the way in
        assert_eq!(fmt(Value::from(f64::NAN)), "");
    }

    #[test]
    fn dates_are_localized() {
        assert_eq!(fmt(json!("2025-01-07")), "07/01/2025");
        assert_eq!(fmt(json!("2025-01-07T09:05:00Z")), "07/01/2025 09:05");
        assert_eq!(fmt(json!("2025-01-07T09:05:00")), "07/01/2025 09:05");
    }

    #[test]
    fn timestamps_follow_the_locale_time_zone() {
        let locale = ExportLocale {
            time_zone: TimeZone::fixed(jiff::tz::offset(2)),
            ..Default::default()
        };
        assert_eq!(
            format_cell(&json!("2025-01-07T23:30:00Z"), &locale),
            "08/01/2025 01:30"
        );
    }

    #[test]
    fn date_lookalikes_are_left_alone() {
        assert_eq!(fmt(json!("2025-13-45")), "2025-13-45");
        assert_eq!(fmt(json!("2025 sales")), "2025 sales");
        assert_eq!(fmt(json!("+34 600 123 456")), "+34 600 123 456");
    }

    #[test]
    fn nested_values_become_json() {
        assert_eq!(fmt(json!(["a", 1])), r#"["a",1]"#);
        assert_eq!(fmt(json!({"k": null})), r#"{"k":null}"#);
    }

    #[test]
    fn custom_yes_no() {
        let locale = ExportLocale {
            yes: "Sí".into(),
            no: "No".into(),
            ..Default::default()
        };
        assert_eq!(format_cell(&json!(true), &locale), "Sí");
    }
}
