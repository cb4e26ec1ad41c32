use yew::prelude::*;

/// Loading, error and empty states shared by the list pages.
///
/// A failed load keeps the previous rows on screen, so the error shows as a
/// banner above the table rather than replacing it.
#[derive(Properties, PartialEq)]
pub struct ListStatusProps {
    pub loading: bool,
    pub error: Option<String>,
    pub is_empty: bool,
    /// Plural noun, e.g. "products".
    pub noun: AttrValue,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

#[function_component]
pub fn ListStatus(props: &ListStatusProps) -> Html {
    let banner = props.error.as_ref().map(|error| {
        let retry = props.on_retry.clone().map(|on_retry| {
            let onclick = Callback::from(move |_: MouseEvent| on_retry.emit(()));
            html! {
                <button {onclick} class="ml-3 text-sm font-medium underline text-red-700 dark:text-red-300">
                    {"Retry"}
                </button>
            }
        });
        html! {
            <div class="mb-4 p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800 flex items-center">
                <p class="text-sm text-red-700 dark:text-red-400">
                    {format!("Could not load {}: {error}", props.noun)}
                </p>
                {retry}
            </div>
        }
    });

    html! {
        <>
            {banner}
            if props.loading {
                <div class="flex items-center gap-2 mb-3 text-sm text-neutral-500 dark:text-neutral-400">
                    <div class="inline-block animate-spin rounded-full h-4 w-4 border-2 border-neutral-500 border-t-transparent"></div>
                    {"Loading..."}
                </div>
            } else if props.is_empty && props.error.is_none() {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {format!("No {} found.", props.noun)}
                    </p>
                </div>
            }
        </>
    }
}
