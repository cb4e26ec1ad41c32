use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::form_field::SelectField;

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    /// Search text currently applied to the list.
    pub search: Option<String>,
    pub placeholder: AttrValue,
    /// Called with the trimmed search text, `None` when blank.
    pub on_search: Callback<Option<String>>,
    pub on_reset: Callback<()>,
    /// Extra selectors next to the search box.
    #[prop_or_default]
    pub children: Children,
}

/// Search box plus resource-specific selectors.
///
/// Every change replaces the whole filter value, which sends the list back
/// to its first page.
#[function_component]
pub fn FilterBar(props: &FilterBarProps) -> Html {
    let draft = use_state(|| props.search.clone().unwrap_or_default());

    // Follow resets coming from outside.
    {
        let draft = draft.clone();
        use_effect_with(props.search.clone(), move |search| {
            draft.set(search.clone().unwrap_or_default());
        });
    }

    let oninput = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let on_search = props.on_search.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let text = draft.trim();
            on_search.emit((!text.is_empty()).then(|| text.to_string()));
        })
    };

    let on_reset_click = {
        let on_reset = props.on_reset.clone();
        Callback::from(move |_: MouseEvent| on_reset.emit(()))
    };

    html! {
        <form {onsubmit} class="flex flex-wrap items-end gap-3 mb-4">
            <div class="flex-1 min-w-[12rem]">
                <input
                    type="search"
                    value={(*draft).clone()}
                    {oninput}
                    placeholder={props.placeholder.clone()}
                    class="w-full px-3 py-2 text-sm border border-neutral-300 dark:border-neutral-600 rounded-md bg-white dark:bg-neutral-700"
                />
            </div>
            {for props.children.iter()}
            <button
                type="submit"
                class="px-4 py-2 text-sm font-medium rounded-md bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900"
            >
                {"Search"}
            </button>
            <button
                type="button"
                onclick={on_reset_click}
                class="px-4 py-2 text-sm font-medium rounded-md border border-neutral-300 dark:border-neutral-600"
            >
                {"Reset"}
            </button>
        </form>
    }
}

/// Select value for an optional boolean filter: "" (all), "true", "false".
pub fn tristate_value(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn parse_tristate(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[derive(Properties, PartialEq)]
pub struct ActiveFilterProps {
    pub value: Option<bool>,
    pub on_change: Callback<Option<bool>>,
}

/// "All / Active / Inactive" selector.
#[function_component]
pub fn ActiveFilter(props: &ActiveFilterProps) -> Html {
    let on_change = props.on_change.reform(|raw: String| parse_tristate(&raw));
    html! {
        <div class="w-40">
            <SelectField
                label="Status"
                options={vec![
                    ("true".to_string(), "Active".to_string()),
                    ("false".to_string(), "Inactive".to_string()),
                ]}
                value={tristate_value(props.value)}
                {on_change}
                empty_label="All"
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tristate_round_trip() {
        for value in [None, Some(true), Some(false)] {
            assert_eq!(parse_tristate(&tristate_value(value)), value);
        }
        assert_eq!(parse_tristate("garbage"), None);
    }
}
