use export::{Column, ExportError, ExportLocale};
use jiff::civil::Date;
use jiff::{Zoned, tz::TimeZone};
use payloads::ReportKind;
use payloads::requests::{ReportQuery, Validate};
use payloads::responses::Report;
use yew::prelude::*;

use crate::components::{BarChart, PageHeader, SelectField, TextField};
use crate::contexts::toast::use_toast;
use crate::get_api_client;
use crate::hooks::{use_fetch, use_title};
use crate::utils::{date_input_value, download_bytes, parse_date};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    const ALL: [ExportFormat; 3] =
        [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf];

    fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Pdf => "PDF",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    fn mime(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    fn render(
        self,
        report: &Report,
        locale: &ExportLocale,
    ) -> Result<Vec<u8>, ExportError> {
        let columns: Vec<Column> = report
            .columns
            .iter()
            .map(|column| Column::new(column.key.clone(), column.label.clone()))
            .collect();
        match self {
            ExportFormat::Csv => export::to_csv(&report.rows, &columns, locale),
            ExportFormat::Xlsx => export::to_xlsx(&report.rows, &columns, locale),
            ExportFormat::Pdf => {
                let chart: Vec<(String, f64)> = report
                    .chart
                    .iter()
                    .map(|point| (point.label.clone(), point.value))
                    .collect();
                export::to_pdf(
                    &report_title(report.kind),
                    &report.rows,
                    &columns,
                    &chart,
                    locale,
                )
            }
        }
    }
}

fn report_title(kind: ReportKind) -> String {
    format!("{} report", kind.label())
}

/// e.g. `sales-report-2025-03-07.csv`
fn file_name(kind: ReportKind, today: Date, format: ExportFormat) -> String {
    format!("{}-report-{today}.{}", kind.as_str(), format.extension())
}

#[function_component]
pub fn ReportsPage() -> Html {
    use_title("Reports");
    let toast = use_toast();

    // The draft is edited freely; only a valid draft becomes the query.
    let draft = use_state(|| ReportQuery {
        kind: ReportKind::Sales,
        from: None,
        to: None,
    });
    let query = use_state(|| (*draft).clone());
    let range_error = use_state(|| None::<String>);

    let report = {
        let query = (*query).clone();
        use_fetch(query.clone(), move || {
            let query = query.clone();
            async move { get_api_client().fetch_report(&query).await }
        })
    };

    let on_kind = {
        let draft = draft.clone();
        let query = query.clone();
        Callback::from(move |raw: String| {
            if let Some(kind) = ReportKind::parse(&raw) {
                let next = ReportQuery {
                    kind,
                    ..(*draft).clone()
                };
                draft.set(next.clone());
                // Switching report kind runs it straight away.
                if next.validate().is_ok() {
                    query.set(next);
                }
            }
        })
    };
    let on_from = {
        let draft = draft.clone();
        Callback::from(move |raw: String| {
            draft.set(ReportQuery {
                from: parse_date(&raw),
                ..(*draft).clone()
            })
        })
    };
    let on_to = {
        let draft = draft.clone();
        Callback::from(move |raw: String| {
            draft.set(ReportQuery {
                to: parse_date(&raw),
                ..(*draft).clone()
            })
        })
    };
    let on_run = {
        let draft = draft.clone();
        let query = query.clone();
        let range_error = range_error.clone();
        let refetch = report.refetch.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match draft.validate() {
                Ok(()) => {
                    range_error.set(None);
                    if *query == *draft {
                        refetch.emit(());
                    } else {
                        query.set((*draft).clone());
                    }
                }
                Err(errors) => range_error.set(errors.get("to").cloned()),
            }
        })
    };

    let download = |format: ExportFormat| {
        let data = report.data.as_ref().cloned();
        let toast = toast.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(report) = &data else {
                return;
            };
            let locale = ExportLocale {
                time_zone: TimeZone::system(),
                ..ExportLocale::default()
            };
            let bytes = match format.render(report, &locale) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("report export failed: {e}");
                    toast.error(e.to_string());
                    return;
                }
            };
            let name = file_name(report.kind, Zoned::now().date(), format);
            match download_bytes(&bytes, &name, format.mime()) {
                Ok(()) => toast.info(format!("Downloaded {name}")),
                Err(e) => {
                    tracing::error!("download of {name} failed: {e:?}");
                    toast.error("The browser refused the download");
                }
            }
        })
    };

    let kinds = ReportKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), kind.label().to_string()))
        .collect::<Vec<_>>();
    let has_data = report.data.as_ref().is_some_and(|r| !r.rows.is_empty());

    html! {
        <div class="space-y-6">
            <PageHeader title="Reports" subtitle="Pick a report and a date range, then export it" />

            <form onsubmit={on_run} class="flex flex-wrap items-end gap-4">
                <div class="w-56">
                    <SelectField
                        label="Report"
                        options={kinds}
                        value={draft.kind.as_str().to_string()}
                        on_change={on_kind}
                    />
                </div>
                <div class="w-44">
                    <TextField
                        label="From"
                        input_type="date"
                        value={date_input_value(draft.from)}
                        on_change={on_from}
                    />
                </div>
                <div class="w-44">
                    <TextField
                        label="To"
                        input_type="date"
                        value={date_input_value(draft.to)}
                        on_change={on_to}
                        error={(*range_error).clone()}
                    />
                </div>
                <button
                    type="submit"
                    disabled={report.is_loading}
                    class="px-4 py-2 text-sm font-medium rounded-md text-white bg-neutral-900 hover:bg-neutral-700 dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                >
                    {"Run"}
                </button>
                <div class="flex gap-2 ml-auto">
                    {for ExportFormat::ALL.into_iter().map(|format| html! {
                        <button
                            type="button"
                            onclick={download(format)}
                            disabled={!has_data}
                            class="px-3 py-2 text-sm font-medium rounded-md border border-neutral-300 dark:border-neutral-600 disabled:opacity-40"
                        >
                            {format!("Export {}", format.label())}
                        </button>
                    })}
                </div>
            </form>

            {report.render("report", |data, is_loading, error| html! {
                <div class="space-y-6">
                    if is_loading {
                        <p class="text-sm text-neutral-500">{"Refreshing..."}</p>
                    }
                    if let Some(error) = error {
                        <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                            <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                        </div>
                    }
                    if !data.chart.is_empty() {
                        <div class="bg-white dark:bg-neutral-800 p-6 rounded-lg shadow border border-neutral-200 dark:border-neutral-700">
                            <h2 class="text-lg font-semibold mb-4 text-neutral-900 dark:text-neutral-100">
                                {report_title(data.kind)}
                            </h2>
                            <BarChart points={data.chart.clone()} />
                        </div>
                    }
                    <ReportTable report={data.clone()} />
                </div>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ReportTableProps {
    report: Report,
}

/// Preview of the rows, formatted the same way as the exports.
#[function_component]
fn ReportTable(props: &ReportTableProps) -> Html {
    let locale = use_memo((), |_| ExportLocale {
        time_zone: TimeZone::system(),
        ..ExportLocale::default()
    });
    let report = &props.report;

    if report.rows.is_empty() {
        return html! {
            <div class="text-center py-12">
                <p class="text-neutral-600 dark:text-neutral-400">
                    {"No rows for this selection."}
                </p>
            </div>
        };
    }

    html! {
        <div class="overflow-x-auto bg-white dark:bg-neutral-800 rounded-lg shadow border border-neutral-200 dark:border-neutral-700">
            <table class="min-w-full divide-y divide-neutral-200 dark:divide-neutral-700 text-sm">
                <thead class="bg-neutral-50 dark:bg-neutral-900">
                    <tr>
                        {for report.columns.iter().map(|column| html! {
                            <th class="px-4 py-3 text-left text-xs font-semibold uppercase tracking-wide text-neutral-500">
                                {&column.label}
                            </th>
                        })}
                    </tr>
                </thead>
                <tbody class="divide-y divide-neutral-200 dark:divide-neutral-700">
                    {for report.rows.iter().map(|row| html! {
                        <tr>
                            {for report.columns.iter().map(|column| {
                                let value = row.get(&column.key).unwrap_or(&serde_json::Value::Null);
                                html! {
                                    <td class="px-4 py-2 text-neutral-700 dark:text-neutral-300">
                                        {export::format_cell(value, &locale)}
                                    </td>
                                }
                            })}
                        </tr>
                    })}
                </tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use payloads::responses::{ChartPoint, ReportColumn};
    use serde_json::json;

    fn report() -> Report {
        Report {
            kind: ReportKind::Payments,
            columns: vec![
                ReportColumn {
                    key: "method".into(),
                    label: "Method".into(),
                },
                ReportColumn {
                    key: "total".into(),
                    label: "Total".into(),
                },
            ],
            rows: vec![
                json!({"method": "Card", "total": 1250.5})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ],
            chart: vec![ChartPoint {
                label: "Card".into(),
                value: 1250.5,
            }],
        }
    }

    #[test]
    fn file_names_carry_kind_and_date() {
        assert_eq!(
            file_name(ReportKind::Sales, date(2025, 3, 7), ExportFormat::Csv),
            "sales-report-2025-03-07.csv"
        );
        assert_eq!(
            file_name(ReportKind::Payments, date(2025, 3, 7), ExportFormat::Pdf),
            "payments-report-2025-03-07.pdf"
        );
    }

    #[test]
    fn csv_export_uses_report_columns() {
        let bytes = ExportFormat::Csv
            .render(&report(), &ExportLocale::default())
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "\u{feff}Method;Total\nCard;1250.5\n");
    }

    #[test]
    fn every_format_renders() {
        for format in ExportFormat::ALL {
            let bytes = format.render(&report(), &ExportLocale::default()).unwrap();
            assert!(!bytes.is_empty(), "{} export is empty", format.label());
        }
    }
}
