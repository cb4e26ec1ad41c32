//! Controlled inputs with an inline error line.

use payloads::FieldErrors;
use payloads::requests::ValidationErrors;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

const INPUT_CLASS: &str = "w-full px-3 py-2 text-sm border rounded-md \
    bg-white dark:bg-neutral-700 text-neutral-900 dark:text-neutral-100 \
    focus:outline-none focus:ring-2 focus:ring-neutral-500 \
    disabled:opacity-50 disabled:cursor-not-allowed";

fn border(error: &Option<String>) -> &'static str {
    if error.is_some() {
        "border-red-400 dark:border-red-600"
    } else {
        "border-neutral-300 dark:border-neutral-600"
    }
}

/// The message to show under a field: the local validation result first,
/// then whatever the backend said about the same field.
pub fn field_error(
    local: &ValidationErrors,
    server: &FieldErrors,
    field: &str,
) -> Option<String> {
    local
        .get(field)
        .cloned()
        .or_else(|| server.get(field).map(|messages| messages.join(" ")))
}

#[derive(Properties, PartialEq)]
struct LabelledProps {
    label: AttrValue,
    error: Option<String>,
    children: Html,
}

#[function_component]
fn Labelled(props: &LabelledProps) -> Html {
    html! {
        <label class="block">
            <span class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-1">
                {&props.label}
            </span>
            {props.children.clone()}
            if let Some(error) = &props.error {
                <span class="block mt-1 text-xs text-red-600 dark:text-red-400">{error}</span>
            }
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    pub label: AttrValue,
    pub value: String,
    pub on_change: Callback<String>,
    #[prop_or_default]
    pub error: Option<String>,
    #[prop_or_else(|| AttrValue::from("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    #[prop_or_default]
    pub autocomplete: Option<AttrValue>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component]
pub fn TextField(props: &TextFieldProps) -> Html {
    let oninput = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_change.emit(input.value());
        })
    };

    html! {
        <Labelled label={props.label.clone()} error={props.error.clone()}>
            <input
                type={props.input_type.clone()}
                value={props.value.clone()}
                {oninput}
                placeholder={props.placeholder.clone()}
                autocomplete={props.autocomplete.clone()}
                disabled={props.disabled}
                class={classes!(INPUT_CLASS, border(&props.error))}
            />
        </Labelled>
    }
}

#[derive(Properties, PartialEq)]
pub struct TextAreaFieldProps {
    pub label: AttrValue,
    pub value: String,
    pub on_change: Callback<String>,
    #[prop_or_default]
    pub error: Option<String>,
    #[prop_or(3)]
    pub rows: u32,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component]
pub fn TextAreaField(props: &TextAreaFieldProps) -> Html {
    let oninput = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            on_change.emit(input.value());
        })
    };

    html! {
        <Labelled label={props.label.clone()} error={props.error.clone()}>
            <textarea
                value={props.value.clone()}
                {oninput}
                rows={props.rows.to_string()}
                disabled={props.disabled}
                class={classes!(INPUT_CLASS, border(&props.error))}
            />
        </Labelled>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectFieldProps {
    pub label: AttrValue,
    /// `(value, label)` pairs.
    pub options: Vec<(String, String)>,
    pub value: String,
    pub on_change: Callback<String>,
    #[prop_or_default]
    pub error: Option<String>,
    /// Extra first option with an empty value, e.g. "All".
    #[prop_or_default]
    pub empty_label: Option<AttrValue>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component]
pub fn SelectField(props: &SelectFieldProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_change.emit(select.value());
        })
    };

    html! {
        <Labelled label={props.label.clone()} error={props.error.clone()}>
            <select
                {onchange}
                disabled={props.disabled}
                class={classes!(INPUT_CLASS, border(&props.error))}
            >
                if let Some(empty) = &props.empty_label {
                    <option value="" selected={props.value.is_empty()}>{empty}</option>
                }
                {for props.options.iter().map(|(value, label)| html! {
                    <option value={value.clone()} selected={*value == props.value}>
                        {label}
                    </option>
                })}
            </select>
        </Labelled>
    }
}

#[derive(Properties, PartialEq)]
pub struct CheckboxProps {
    pub label: AttrValue,
    pub checked: bool,
    pub on_change: Callback<bool>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component]
pub fn Checkbox(props: &CheckboxProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_change.emit(input.checked());
        })
    };

    html! {
        <label class="inline-flex items-center gap-2 text-sm text-neutral-700 dark:text-neutral-300">
            <input
                type="checkbox"
                checked={props.checked}
                {onchange}
                disabled={props.disabled}
            />
            {&props.label}
        </label>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_errors_win_over_server_errors() {
        let mut local = ValidationErrors::new();
        local.insert("email", "Email is required".into());
        let mut server = FieldErrors::new();
        server.insert("email".into(), vec!["Already taken.".into()]);
        server.insert(
            "username".into(),
            vec!["Too short.".into(), "Invalid.".into()],
        );

        assert_eq!(
            field_error(&local, &server, "email").as_deref(),
            Some("Email is required")
        );
        assert_eq!(
            field_error(&local, &server, "username").as_deref(),
            Some("Too short. Invalid.")
        );
        assert_eq!(field_error(&local, &server, "phone"), None);
    }
}
