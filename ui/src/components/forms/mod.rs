//! Entity forms.
//!
//! Each form keeps a string draft of its fields, validates it locally on
//! submit and hands the typed payload to the page. Server-side field errors
//! from the last failed write are passed back in and shown on the same
//! fields.

pub mod payment_method_form;
pub mod permission_form;
pub mod product_form;
pub mod review_form;
pub mod role_form;
pub mod ticket_form;
pub mod user_form;

pub use payment_method_form::PaymentMethodForm;
pub use permission_form::PermissionForm;
pub use product_form::{ProductForm, ProductImages};
pub use review_form::ReviewForm;
pub use role_form::{PermissionPicker, RoleForm};
pub use ticket_form::{AssignTicketForm, TicketForm};
pub use user_form::{ChangePasswordForm, UserForm};

use yew::prelude::*;

/// Callback that applies one field change to a draft held in state.
pub fn bind<T, V>(draft: &UseStateHandle<T>, apply: fn(&mut T, V)) -> Callback<V>
where
    T: Clone + 'static,
    V: 'static,
{
    let draft = draft.clone();
    Callback::from(move |value: V| {
        let mut next = (*draft).clone();
        apply(&mut next, value);
        draft.set(next);
    })
}

/// Add or remove `item` so that its presence matches `on`.
pub fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T, on: bool) {
    let present = items.contains(&item);
    if on && !present {
        items.push(item);
    } else if !on {
        items.retain(|existing| *existing != item);
    }
}

/// `None` for blank input, the trimmed text otherwise.
pub fn optional(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[derive(Properties, PartialEq)]
pub struct FormActionsProps {
    pub busy: bool,
    pub submit_text: AttrValue,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub fn FormActions(props: &FormActionsProps) -> Html {
    let on_cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| on_cancel.emit(()))
    };

    html! {
        <div class="flex justify-end gap-3 pt-2">
            <button
                type="button"
                onclick={on_cancel}
                disabled={props.busy}
                class="px-4 py-2 text-sm font-medium rounded-md border border-neutral-300 dark:border-neutral-600
                       text-neutral-700 dark:text-neutral-300 hover:bg-neutral-50 dark:hover:bg-neutral-700
                       disabled:opacity-50"
            >
                {"Cancel"}
            </button>
            <button
                type="submit"
                disabled={props.busy}
                class="px-4 py-2 text-sm font-medium rounded-md text-white bg-neutral-900 hover:bg-neutral-700
                       dark:bg-neutral-100 dark:text-neutral-900 dark:hover:bg-neutral-300
                       disabled:opacity-50 disabled:cursor-not-allowed"
            >
                {if props.busy { "Saving..." } else { props.submit_text.as_str() }}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_one_copy() {
        let mut items = vec![1, 2];
        toggle(&mut items, 3, true);
        toggle(&mut items, 3, true);
        assert_eq!(items, vec![1, 2, 3]);
        toggle(&mut items, 1, false);
        toggle(&mut items, 9, false);
        assert_eq!(items, vec![2, 3]);
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(optional("   "), None);
        assert_eq!(optional(" +34 600 "), Some("+34 600".to_string()));
    }
}
