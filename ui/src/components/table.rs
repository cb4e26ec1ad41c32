use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TableProps {
    pub headers: Vec<&'static str>,
    /// `<tr>` rows.
    pub children: Children,
}

#[function_component]
pub fn Table(props: &TableProps) -> Html {
    html! {
        <div class="overflow-x-auto bg-white dark:bg-neutral-800 rounded-lg shadow border border-neutral-200 dark:border-neutral-700">
            <table class="min-w-full divide-y divide-neutral-200 dark:divide-neutral-700 text-sm">
                <thead class="bg-neutral-50 dark:bg-neutral-900">
                    <tr>
                        {for props.headers.iter().map(|header| html! {
                            <th class="px-4 py-3 text-left text-xs font-semibold uppercase tracking-wide text-neutral-500 dark:text-neutral-400">
                                {*header}
                            </th>
                        })}
                    </tr>
                </thead>
                <tbody class="divide-y divide-neutral-200 dark:divide-neutral-700">
                    {for props.children.iter()}
                </tbody>
            </table>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct RowButtonProps {
    pub label: AttrValue,
    pub on_click: Callback<()>,
    #[prop_or_default]
    pub danger: bool,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component]
pub fn RowButton(props: &RowButtonProps) -> Html {
    let onclick = {
        let on_click = props.on_click.clone();
        Callback::from(move |_: MouseEvent| on_click.emit(()))
    };
    let color = if props.danger {
        "text-red-600 hover:text-red-800 dark:text-red-400"
    } else {
        "text-neutral-700 hover:text-neutral-900 dark:text-neutral-300 dark:hover:text-neutral-100"
    };

    html! {
        <button
            {onclick}
            disabled={props.disabled}
            class={classes!("text-sm", "font-medium", "underline", "disabled:opacity-40", color)}
        >
            {&props.label}
        </button>
    }
}
