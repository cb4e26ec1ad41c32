use yew::prelude::*;

use crate::components::Modal;

#[derive(Properties, PartialEq)]
pub struct ConfirmationModalProps {
    /// Modal title (e.g., "Delete product")
    pub title: AttrValue,
    /// Explains what will happen
    pub message: AttrValue,
    /// Confirm button text (e.g., "Delete")
    pub confirm_text: AttrValue,
    pub on_confirm: Callback<()>,
    pub on_close: Callback<()>,
    /// When set, the user has to type this value before confirming.
    #[prop_or_default]
    pub confirmation_value: Option<AttrValue>,
    #[prop_or_default]
    pub is_loading: bool,
}

#[function_component]
pub fn ConfirmationModal(props: &ConfirmationModalProps) -> Html {
    let confirmation_input = use_state(String::new);

    let can_confirm = match &props.confirmation_value {
        Some(expected) => *confirmation_input == expected.as_str(),
        None => true,
    };

    let on_input = {
        let confirmation_input = confirmation_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            confirmation_input.set(input.value());
        })
    };

    let on_confirm_click = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| on_confirm.emit(()))
    };

    let on_cancel_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <Modal
            title={props.title.clone()}
            on_close={props.on_close.clone()}
            max_width="max-w-md"
            busy={props.is_loading}
        >
            <div class="space-y-4">
                <p class="text-sm text-neutral-600 dark:text-neutral-400">
                    {&props.message}
                </p>

                if let Some(expected) = &props.confirmation_value {
                    <p class="text-sm text-neutral-600 dark:text-neutral-400">
                        {"Please type "}
                        <span class="font-mono font-semibold text-neutral-900 dark:text-neutral-100">
                            {expected}
                        </span>
                        {" to confirm."}
                    </p>
                    <input
                        type="text"
                        value={(*confirmation_input).clone()}
                        oninput={on_input}
                        disabled={props.is_loading}
                        class="w-full px-3 py-2 text-sm border border-neutral-300 dark:border-neutral-600
                               rounded-md bg-white dark:bg-neutral-700
                               text-neutral-900 dark:text-neutral-100
                               focus:outline-none focus:ring-2 focus:ring-red-500 focus:border-red-500
                               disabled:opacity-50 disabled:cursor-not-allowed"
                    />
                }
            </div>

            <div class="flex justify-end gap-3 mt-6">
                <button
                    onclick={on_cancel_click}
                    disabled={props.is_loading}
                    class="px-4 py-2 text-sm font-medium text-neutral-700 dark:text-neutral-300
                           bg-white dark:bg-neutral-700 border border-neutral-300 dark:border-neutral-600
                           rounded-md hover:bg-neutral-50 dark:hover:bg-neutral-600
                           disabled:opacity-50 disabled:cursor-not-allowed
                           transition-colors"
                >
                    {"Cancel"}
                </button>
                <button
                    onclick={on_confirm_click}
                    disabled={!can_confirm || props.is_loading}
                    class="px-4 py-2 text-sm font-medium text-white
                           bg-red-600 hover:bg-red-700 dark:bg-red-700 dark:hover:bg-red-600
                           rounded-md disabled:opacity-50 disabled:cursor-not-allowed
                           transition-colors"
                >
                    {if props.is_loading { "Processing..." } else { props.confirm_text.as_str() }}
                </button>
            </div>
        </Modal>
    }
}
