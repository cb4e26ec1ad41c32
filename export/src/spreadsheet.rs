use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value;

use crate::{Column, ExportError, ExportLocale, Row, format_cell};

const SHEET_NAME: &str = "Report";

/// Build a single-sheet workbook with a bold header row.
///
/// Numbers are written as numeric cells so they stay summable; everything
/// else is written as the same text the CSV export produces.
pub fn to_xlsx(
    rows: &[Row],
    columns: &[Column],
    locale: &ExportLocale,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, column) in (0u16..).zip(columns) {
        sheet.write_string_with_format(0, col, &column.label, &bold)?;
    }
    for (row_idx, row) in (1u32..).zip(rows) {
        for (col, column) in (0u16..).zip(columns) {
            match column.value(row) {
                Value::Null => {}
                Value::Number(n) => match n.as_f64() {
                    Some(f) if f.is_finite() => {
                        sheet.write_number(row_idx, col, f)?;
                    }
                    _ => {}
                },
                value => {
                    sheet.write_string(row_idx, col, format_cell(value, locale))?;
                }
            }
        }
    }
    sheet.autofit();

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!("exported {} rows as XLSX ({} bytes)", rows.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn produces_a_zip_container() {
        let columns = [Column::new("date", "Date"), Column::new("amount", "Amount")];
        let rows = [json!({"date": "2025-01-07", "amount": 12.5})
            .as_object()
            .cloned()
            .unwrap()];

        let bytes = to_xlsx(&rows, &columns, &ExportLocale::default()).unwrap();

        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn empty_report_still_has_a_sheet() {
        let bytes = to_xlsx(&[], &[], &ExportLocale::default()).unwrap();
        assert!(!bytes.is_empty());
    }
}
