use payloads::requests::{PermissionDetails, Validate, ValidationErrors};
use payloads::{FieldErrors, Permission};
use yew::prelude::*;

use super::{FormActions, bind};
use crate::components::form_field::{TextAreaField, TextField, field_error};

#[derive(Properties, PartialEq)]
pub struct PermissionFormProps {
    #[prop_or_default]
    pub permission: Option<Permission>,
    pub server_errors: FieldErrors,
    pub busy: bool,
    pub on_submit: Callback<PermissionDetails>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub fn PermissionForm(props: &PermissionFormProps) -> Html {
    let draft = use_state(|| match &props.permission {
        Some(p) => PermissionDetails {
            code: p.code.clone(),
            name: p.name.clone(),
            module: p.module.clone(),
            description: p.description.clone(),
        },
        None => PermissionDetails::default(),
    });
    let errors = use_state(ValidationErrors::new);

    let onsubmit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let payload = PermissionDetails {
                code: draft.code.trim().to_string(),
                name: draft.name.trim().to_string(),
                module: draft.module.trim().to_string(),
                description: draft.description.trim().to_string(),
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

    html! {
        <form {onsubmit} class="space-y-4">
            <TextField
                label="Code"
                value={draft.code.clone()}
                on_change={bind(&draft, |d, v: String| d.code = v)}
                error={error("code")}
                placeholder="products.change"
                disabled={props.busy}
            />
            <TextField
                label="Name"
                value={draft.name.clone()}
                on_change={bind(&draft, |d, v: String| d.name = v)}
                error={error("name")}
                disabled={props.busy}
            />
            <TextField
                label="Module"
                value={draft.module.clone()}
                on_change={bind(&draft, |d, v: String| d.module = v)}
                error={error("module")}
                placeholder="products"
                disabled={props.busy}
            />
            <TextAreaField
                label="Description"
                value={draft.description.clone()}
                on_change={bind(&draft, |d, v: String| d.description = v)}
                error={error("description")}
                disabled={props.busy}
            />
            <FormActions
                busy={props.busy}
                submit_text={if props.permission.is_some() { "Save changes" } else { "Create permission" }}
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}
