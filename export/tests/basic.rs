use export::{BOM, Column, DELIMITER, ExportLocale, Row, to_csv, to_pdf, to_xlsx};
use serde_json::json;

fn rows(value: serde_json::Value) -> Vec<Row> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row.as_object().cloned().unwrap())
        .collect()
}

#[test]
fn csv_round_trip_with_delimiter_in_a_field() -> anyhow::Result<()> {
    let data = rows(json!([{"a": "x;y", "b": true}]));
    let columns = [Column::new("a", "A"), Column::new("b", "B")];

    let bytes = to_csv(&data, &columns, &ExportLocale::default())?;

    assert!(bytes.starts_with(BOM));
    let body = std::str::from_utf8(&bytes[BOM.len()..])?;
    assert_eq!(body, "A;B\n\"x;y\";Yes\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .from_reader(&bytes[BOM.len()..]);
    assert_eq!(reader.headers()?, vec!["A", "B"]);
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], vec!["x;y", "Yes"]);

    Ok(())
}

#[test]
fn every_format_renders_the_same_report() -> anyhow::Result<()> {
    let data = rows(json!([
        {"date": "2025-01-06", "orders": 4, "amount": 120.5, "closed": true},
        {"date": "2025-01-07", "orders": 0, "amount": 0, "closed": false},
    ]));
    let columns = [
        Column::new("date", "Date"),
        Column::new("orders", "Orders"),
        Column::new("amount", "Amount"),
        Column::new("closed", "Closed"),
    ];
    let locale = ExportLocale::default();
    let chart = vec![("06/01".to_string(), 120.5), ("07/01".to_string(), 0.0)];

    let csv = to_csv(&data, &columns, &locale)?;
    assert_eq!(
        std::str::from_utf8(&csv[BOM.len()..])?,
        "Date;Orders;Amount;Closed\n06/01/2025;4;120.5;Yes\n07/01/2025;0;0;No\n"
    );
    assert!(to_xlsx(&data, &columns, &locale)?.starts_with(b"PK"));
    assert!(to_pdf("Sales", &data, &columns, &chart, &locale)?.starts_with(b"%PDF"));

    Ok(())
}
