use payloads::requests::{RoleDetails, Validate, ValidationErrors};
use payloads::{FieldErrors, Permission, PermissionId, Role};
use std::collections::BTreeMap;
use yew::prelude::*;

use super::{FormActions, bind, toggle};
use crate::components::form_field::{
    Checkbox, TextAreaField, TextField, field_error,
};

/// Permissions grouped by module, modules in name order. Permissions
/// without a module are listed under "General".
fn by_module(permissions: &[Permission]) -> BTreeMap<&str, Vec<&Permission>> {
    let mut groups: BTreeMap<&str, Vec<&Permission>> = BTreeMap::new();
    for permission in permissions {
        let module = if permission.module.is_empty() {
            "General"
        } else {
            permission.module.as_str()
        };
        groups.entry(module).or_default().push(permission);
    }
    groups
}

#[derive(Properties, PartialEq)]
pub struct PermissionPickerProps {
    pub permissions: Vec<Permission>,
    pub selected: Vec<PermissionId>,
    pub on_change: Callback<Vec<PermissionId>>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component]
pub fn PermissionPicker(props: &PermissionPickerProps) -> Html {
    if props.permissions.is_empty() {
        return html! {
            <p class="text-sm text-neutral-500">{"No permissions defined."}</p>
        };
    }

    html! {
        <div class="space-y-3 max-h-72 overflow-y-auto">
            {for by_module(&props.permissions).into_iter().map(|(module, permissions)| html! {
                <div>
                    <h4 class="text-xs font-semibold uppercase tracking-wide text-neutral-500 mb-1">
                        {module}
                    </h4>
                    <div class="grid grid-cols-2 gap-1">
                        {for permissions.into_iter().map(|permission| {
                            let id = permission.id;
                            let on_change = {
                                let selected = props.selected.clone();
                                let on_change = props.on_change.clone();
                                Callback::from(move |on: bool| {
                                    let mut next = selected.clone();
                                    toggle(&mut next, id, on);
                                    on_change.emit(next);
                                })
                            };
                            html! {
                                <Checkbox
                                    label={permission.name.clone()}
                                    checked={props.selected.contains(&id)}
                                    {on_change}
                                    disabled={props.disabled}
                                />
                            }
                        })}
                    </div>
                </div>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct RoleFormProps {
    #[prop_or_default]
    pub role: Option<Role>,
    pub permissions: Vec<Permission>,
    pub server_errors: FieldErrors,
    pub busy: bool,
    pub on_submit: Callback<RoleDetails>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub fn RoleForm(props: &RoleFormProps) -> Html {
    let draft = use_state(|| match &props.role {
        Some(role) => RoleDetails {
            name: role.name.clone(),
            description: role.description.clone(),
            permissions: role.permission_ids(),
        },
        None => RoleDetails::default(),
    });
    let errors = use_state(ValidationErrors::new);

    let onsubmit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let payload = RoleDetails {
                name: draft.name.trim().to_string(),
                description: draft.description.trim().to_string(),
                permissions: draft.permissions.clone(),
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
                label="Name"
                value={draft.name.clone()}
                on_change={bind(&draft, |d, v: String| d.name = v)}
                error={error("name")}
                disabled={props.busy}
            />
            <TextAreaField
                label="Description"
                value={draft.description.clone()}
                on_change={bind(&draft, |d, v: String| d.description = v)}
                error={error("description")}
                disabled={props.busy}
            />
            <fieldset>
                <legend class="text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                    {"Permissions"}
                </legend>
                <PermissionPicker
                    permissions={props.permissions.clone()}
                    selected={draft.permissions.clone()}
                    on_change={bind(&draft, |d, v: Vec<PermissionId>| d.permissions = v)}
                    disabled={props.busy}
                />
            </fieldset>
            <FormActions
                busy={props.busy}
                submit_text={if props.role.is_some() { "Save changes" } else { "Create role" }}
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permission(id: i64, module: &str, name: &str) -> Permission {
        Permission {
            id: PermissionId(id),
            code: format!("{}.{}", module, name.to_lowercase()),
            name: name.into(),
            module: module.into(),
            description: String::new(),
        }
    }

    #[test]
    fn permissions_group_by_module() {
        let permissions = vec![
            permission(1, "sales", "View"),
            permission(2, "", "Dashboard"),
            permission(3, "products", "Edit"),
            permission(4, "sales", "Refund"),
        ];
        let groups = by_module(&permissions);
        let modules: Vec<_> = groups.keys().copied().collect();
        assert_eq!(modules, vec!["General", "products", "sales"]);
        let sales: Vec<_> = groups["sales"].iter().map(|p| p.id).collect();
        assert_eq!(sales, vec![PermissionId(1), PermissionId(4)]);
    }
}
