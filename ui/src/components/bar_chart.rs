use export::bar_percentages;
use payloads::responses::ChartPoint;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct BarChartProps {
    pub points: Vec<ChartPoint>,
}

/// Horizontal bars scaled to the largest value.
#[function_component]
pub fn BarChart(props: &BarChartProps) -> Html {
    if props.points.is_empty() {
        return html! {};
    }

    let values: Vec<f64> = props.points.iter().map(|p| p.value).collect();
    let widths = bar_percentages(&values);

    html! {
        <div class="space-y-2">
            {for props.points.iter().zip(widths).map(|(point, width)| html! {
                <div class="flex items-center gap-3 text-sm">
                    <span class="w-28 flex-shrink-0 truncate text-neutral-600 dark:text-neutral-400">
                        {&point.label}
                    </span>
                    <div class="flex-1 bg-neutral-100 dark:bg-neutral-800 rounded h-4">
                        <div
                            class="bg-blue-600 h-4 rounded"
                            style={format!("width: {width:.1}%")}
                        ></div>
                    </div>
                    <span class="w-20 text-right tabular-nums">{format!("{}", point.value)}</span>
                </div>
            })}
        </div>
    }
}
