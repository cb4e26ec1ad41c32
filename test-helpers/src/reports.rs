use actix_web::{HttpRequest, HttpResponse, web};
use jiff::civil::{Date, date};
use payloads::ReportKind;
use payloads::responses::{ChartPoint, Report, ReportColumn};
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value, json};

use crate::resources::Query;
use crate::server::{MockBackend, MockError, authorize, envelope};
use crate::store::Store;

const MAX_REPORT_DAYS: usize = 92;

fn column(key: &str, label: &str) -> ReportColumn {
    ReportColumn {
        key: key.into(),
        label: label.into(),
    }
}

fn row(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn parse_date(query: &Query, key: &str) -> Result<Option<Date>, MockError> {
    query
        .get(key)
        .map(|raw| {
            raw.parse::<Date>().map_err(|_| {
                MockError::field(key, "Enter a valid date (YYYY-MM-DD).")
            })
        })
        .transpose()
}

/// Every day from `from` to `to`, inclusive.
fn days(from: Date, to: Date) -> Result<Vec<Date>, MockError> {
    if from > to {
        return Err(MockError::field(
            "to",
            "End date must not be before start date",
        ));
    }
    let mut days = vec![from];
    let mut day = from;
    while day < to {
        day = day
            .tomorrow()
            .map_err(|e| MockError::BadRequest(e.to_string()))?;
        days.push(day);
        if days.len() > MAX_REPORT_DAYS {
            return Err(MockError::BadRequest(format!(
                "Reports cover at most {MAX_REPORT_DAYS} days."
            )));
        }
    }
    Ok(days)
}

/// Deterministic daily figures so reports are stable across runs.
fn daily_figure(day: Date, salt: i64) -> i64 {
    let n = i64::from(day.day()) + i64::from(day.month()) * 31 + salt;
    (n * 7919) % 23 + 2
}

fn dated_report(
    kind: ReportKind,
    days: &[Date],
) -> (Vec<ReportColumn>, Vec<Map<String, Value>>, Vec<ChartPoint>) {
    let (count_label, amount_label, salt, unit_price) = match kind {
        ReportKind::Purchases => ("Orders placed", "Cost", 5, 41.25),
        _ => ("Orders", "Revenue", 0, 23.5),
    };
    let columns = vec![
        column("date", "Date"),
        column("orders", count_label),
        column("amount", amount_label),
        column("closed", "Closed"),
    ];
    let mut rows = Vec::with_capacity(days.len());
    let mut chart = Vec::with_capacity(days.len());
    for day in days {
        let orders = daily_figure(*day, salt);
        let amount = orders as f64 * unit_price;
        rows.push(row(json!({
            "date": day.to_string(),
            "orders": orders,
            "amount": amount,
            "closed": day.weekday() != jiff::civil::Weekday::Sunday,
        })));
        chart.push(ChartPoint {
            label: day.strftime("%d/%m").to_string(),
            value: amount,
        });
    }
    (columns, rows, chart)
}

fn inventory_report(
    store: &Store,
) -> (Vec<ReportColumn>, Vec<Map<String, Value>>, Vec<ChartPoint>) {
    let columns = vec![
        column("sku", "SKU"),
        column("name", "Product"),
        column("stock", "Stock"),
        column("price", "Unit price"),
        column("is_active", "Active"),
    ];
    let rows = store
        .products
        .rows
        .iter()
        .map(|p| {
            row(json!({
                "sku": p.sku,
                "name": p.name,
                "stock": p.stock,
                "price": p.price.to_f64(),
                "is_active": p.is_active,
            }))
        })
        .collect();
    let chart = store
        .products
        .rows
        .iter()
        .map(|p| ChartPoint {
            label: p.name.clone(),
            value: p.stock as f64,
        })
        .collect();
    (columns, rows, chart)
}

fn payments_report(
    store: &Store,
    days: &[Date],
) -> (Vec<ReportColumn>, Vec<Map<String, Value>>, Vec<ChartPoint>) {
    let columns = vec![
        column("method", "Method"),
        column("kind", "Type"),
        column("transactions", "Transactions"),
        column("amount", "Amount"),
    ];
    let mut rows = Vec::new();
    let mut chart = Vec::new();
    for method in &store.payment_methods.rows {
        let transactions: i64 = days
            .iter()
            .map(|day| daily_figure(*day, method.id.0))
            .sum();
        let amount = transactions as f64 * 18.75;
        rows.push(row(json!({
            "method": method.name,
            "kind": method.kind.label(),
            "transactions": transactions,
            "amount": amount,
        })));
        chart.push(ChartPoint {
            label: method.name.clone(),
            value: amount,
        });
    }
    (columns, rows, chart)
}

pub async fn report(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
    path: web::Path<String>,
    query: web::Query<Query>,
) -> Result<HttpResponse, MockError> {
    let state = backend.lock();
    authorize(&request, &state)?;
    let kind =
        ReportKind::parse(&path.into_inner()).ok_or(MockError::NotFound("Report"))?;

    let to = parse_date(&query, "to")?.unwrap_or(date(2025, 1, 7));
    let from = match parse_date(&query, "from")? {
        Some(from) => from,
        None => to
            .checked_sub(jiff::Span::new().days(6))
            .map_err(|e| MockError::BadRequest(e.to_string()))?,
    };
    let days = days(from, to)?;

    let (columns, rows, chart) = match kind {
        ReportKind::Sales | ReportKind::Purchases => dated_report(kind, &days),
        ReportKind::Inventory => inventory_report(&state.store),
        ReportKind::Payments => payments_report(&state.store, &days),
    };
    let report = Report {
        kind,
        columns,
        rows,
        chart,
    };
    Ok(HttpResponse::Ok().json(envelope("", report)))
}
