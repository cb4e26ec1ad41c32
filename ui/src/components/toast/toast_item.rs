use crate::contexts::toast::{Toast, ToastKind, use_toast};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToastItemProps {
    pub toast: Toast,
}

#[function_component]
pub fn ToastItem(props: &ToastItemProps) -> Html {
    let toast_handle = use_toast();
    let toast = &props.toast;

    let (palette, icon) = match toast.kind {
        ToastKind::Error => (
            "bg-red-50 dark:bg-red-900 border-red-200 dark:border-red-800 \
             text-red-700 dark:text-red-400",
            "✕",
        ),
        ToastKind::Success => (
            "bg-green-50 dark:bg-green-900 border-green-200 dark:border-green-800 \
             text-green-700 dark:text-green-400",
            "✓",
        ),
        ToastKind::Info => (
            "bg-neutral-50 dark:bg-neutral-800 border-neutral-200 \
             dark:border-neutral-700 text-neutral-700 dark:text-neutral-300",
            "ℹ",
        ),
    };

    let on_close = {
        let toast_id = toast.id;
        Callback::from(move |_: MouseEvent| toast_handle.remove(toast_id))
    };

    // Errors are announced immediately to screen readers.
    let role = if toast.kind == ToastKind::Error { "alert" } else { "status" };

    html! {
        <div
            role={role}
            class={format!("relative p-4 rounded-lg border shadow-lg {palette}")}
        >
            <div class="flex items-start space-x-3">
                <span class="flex-shrink-0 text-sm font-medium">{icon}</span>
                <p class="flex-1 min-w-0 text-sm font-medium leading-5">
                    {&toast.message}
                </p>
                <button
                    onclick={on_close}
                    class="flex-shrink-0 text-neutral-400 hover:text-neutral-600 dark:hover:text-neutral-200 transition-colors"
                    title="Dismiss"
                >
                    <span class="text-lg leading-none">{"×"}</span>
                </button>
            </div>
        </div>
    }
}
