use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PageHeaderProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub subtitle: Option<AttrValue>,
    /// Label of the primary action button, e.g. "New product".
    #[prop_or_default]
    pub action: Option<AttrValue>,
    #[prop_or_default]
    pub on_action: Callback<()>,
}

#[function_component]
pub fn PageHeader(props: &PageHeaderProps) -> Html {
    let onclick = {
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| on_action.emit(()))
    };

    html! {
        <div class="flex justify-between items-center mb-6">
            <div>
                <h1 class="text-3xl font-bold text-neutral-900 dark:text-neutral-100">
                    {&props.title}
                </h1>
                if let Some(subtitle) = &props.subtitle {
                    <p class="text-neutral-600 dark:text-neutral-400 mt-1">{subtitle}</p>
                }
            </div>
            if let Some(action) = &props.action {
                <button
                    {onclick}
                    class="bg-neutral-900 hover:bg-neutral-800 dark:bg-neutral-100 dark:text-neutral-900 dark:hover:bg-neutral-200 text-white px-4 py-2 rounded-md text-sm font-medium transition-colors"
                >
                    {action}
                </button>
            }
        </div>
    }
}
