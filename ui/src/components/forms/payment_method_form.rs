use payloads::requests::{PaymentMethodDetails, Validate, ValidationErrors};
use payloads::{FieldErrors, PaymentKind, PaymentMethod};
use yew::prelude::*;

use super::{FormActions, bind, optional};
use crate::components::form_field::{
    SelectField, TextAreaField, TextField, field_error,
};

#[derive(Debug, Clone, PartialEq)]
struct PaymentMethodDraft {
    name: String,
    kind: PaymentKind,
    details: String,
}

#[derive(Properties, PartialEq)]
pub struct PaymentMethodFormProps {
    #[prop_or_default]
    pub method: Option<PaymentMethod>,
    pub server_errors: FieldErrors,
    pub busy: bool,
    pub on_submit: Callback<PaymentMethodDetails>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub fn PaymentMethodForm(props: &PaymentMethodFormProps) -> Html {
    let draft = use_state(|| match &props.method {
        Some(method) => PaymentMethodDraft {
            name: method.name.clone(),
            kind: method.kind,
            details: method.details.clone().unwrap_or_default(),
        },
        None => PaymentMethodDraft {
            name: String::new(),
            kind: PaymentKind::Cash,
            details: String::new(),
        },
    });
    let errors = use_state(ValidationErrors::new);

    let onsubmit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let payload = PaymentMethodDetails {
                name: draft.name.trim().to_string(),
                kind: draft.kind,
                details: optional(&draft.details),
            };
            match payload.validate() {
                Ok(()) => {
                    errors.set(ValidationErrors::new());
                    on_submit.emit(payload);
                }
                Err(found) => errors.set(found),
            }
        })
    };

    let error = |field: &str| field_error(&errors, &props.server_errors, field);
    let kinds = PaymentKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), kind.label().to_string()))
        .collect::<Vec<_>>();

    html! {
        <form {onsubmit} class="space-y-4">
            <TextField
                label="Name"
                value={draft.name.clone()}
                on_change={bind(&draft, |d, v: String| d.name = v)}
                error={error("name")}
                disabled={props.busy}
            />
            <SelectField
                label="Type"
                options={kinds}
                value={draft.kind.as_str().to_string()}
                on_change={bind(&draft, |d, v: String| {
                    if let Some(kind) = PaymentKind::parse(&v) {
                        d.kind = kind;
                    }
                })}
                error={error("kind")}
                disabled={props.busy}
            />
            <TextAreaField
                label="Details"
                value={draft.details.clone()}
                on_change={bind(&draft, |d, v: String| d.details = v)}
                error={error("details")}
                disabled={props.busy}
            />
            <FormActions
                busy={props.busy}
                submit_text={if props.method.is_some() { "Save changes" } else { "Create payment method" }}
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}
