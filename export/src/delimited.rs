use crate::{Column, ExportError, ExportLocale, Row, format_cell};

/// Spreadsheet apps only detect UTF-8 in a CSV when it starts with a BOM.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";
pub const DELIMITER: u8 = b';';

/// Write `rows` as a semicolon separated file with a header line.
///
/// Fields are only quoted when they contain the delimiter, a quote or a
/// line break.
pub fn to_csv(
    rows: &[Row],
    columns: &[Column],
    locale: &ExportLocale,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(BOM.to_vec());

    writer.write_record(columns.iter().map(|c| c.label.as_str()))?;
    for row in rows {
        writer.write_record(
            columns.iter().map(|c| format_cell(c.value(row), locale)),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    tracing::debug!("exported {} rows as CSV ({} bytes)", rows.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn text(bytes: &[u8]) -> &str {
        std::str::from_utf8(&bytes[BOM.len()..]).unwrap()
    }

    #[test]
    fn header_and_rows() {
        let columns = [Column::new("sku", "SKU"), Column::new("price", "Price")];
        let rows = [
            row(json!({"sku": "TEA-001", "price": 2.5})),
            row(json!({"sku": "TEA-002"})),
        ];

        let bytes = to_csv(&rows, &columns, &ExportLocale::default()).unwrap();

        assert!(bytes.starts_with(BOM));
        assert_eq!(text(&bytes), "SKU;Price\nTEA-001;2.5\nTEA-002;\n");
    }

    #[test]
    fn quotes_only_when_needed() {
        let columns = [Column::new("note", "Note")];
        let rows = [
            row(json!({"note": "plain"})),
            row(json!({"note": "says \"hi\""})),
            row(json!({"note": "two\nlines"})),
        ];

        let bytes = to_csv(&rows, &columns, &ExportLocale::default()).unwrap();

        assert_eq!(
            text(&bytes),
            "Note\nplain\n\"says \"\"hi\"\"\"\n\"two\nlines\"\n"
        );
    }

    #[test]
    fn no_rows_is_just_the_header() {
        let columns = [Column::new("a", "A")];
        let bytes = to_csv(&[], &columns, &ExportLocale::default()).unwrap();
        assert_eq!(text(&bytes), "A\n");
    }
}
