use wasm_bindgen::JsCast;
use yew::prelude::*;

/// Dialog shell used by the create/edit forms and confirmations.
///
/// Clicking the backdrop or the close button calls `on_close`; the caller
/// owns the open/closed state.
#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: AttrValue,
    pub children: Html,
    pub on_close: Callback<()>,
    /// Maximum width class (default: "max-w-lg")
    #[prop_or_else(|| AttrValue::from("max-w-lg"))]
    pub max_width: AttrValue,
    /// Set while a submit is in flight so the dialog can't be dismissed
    /// halfway through.
    #[prop_or_default]
    pub busy: bool,
}

#[function_component]
pub fn Modal(props: &ModalProps) -> Html {
    let backdrop_ref = use_node_ref();

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        let backdrop_ref = backdrop_ref.clone();
        let busy = props.busy;

        Callback::from(move |e: MouseEvent| {
            if busy {
                return;
            }

            if let Some(backdrop_element) =
                backdrop_ref.cast::<web_sys::Element>()
                && let Some(target) = e.target()
                && target.dyn_ref::<web_sys::Element>()
                    == Some(&backdrop_element)
            {
                on_close.emit(());
            }
        })
    };

    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div
            ref={backdrop_ref.clone()}
            onclick={on_backdrop_click}
            class="fixed inset-0 bg-black bg-opacity-50 z-40 flex
                   items-center justify-center p-4"
        >
            <div
                class={format!(
                    "bg-white dark:bg-neutral-800 rounded-lg shadow-xl \
                     w-full p-6 max-h-[90vh] overflow-y-auto {}",
                    props.max_width
                )}
            >
                <div class="flex justify-between items-start mb-4">
                    <h3 class="text-lg font-semibold text-neutral-900 dark:text-neutral-100">
                        {&props.title}
                    </h3>
                    <button
                        onclick={on_close_click}
                        disabled={props.busy}
                        class="text-neutral-400 hover:text-neutral-600 dark:hover:text-neutral-200"
                        title="Close"
                    >
                        {"×"}
                    </button>
                </div>
                {props.children.clone()}
            </div>
        </div>
    }
}
