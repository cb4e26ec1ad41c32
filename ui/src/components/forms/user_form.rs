use payloads::requests::{
    ChangePassword, CreateUser, UpdateUser, Validate, ValidationErrors,
};
use payloads::{FieldErrors, RoleId, RoleSummary, User};
use yew::prelude::*;

use super::{FormActions, bind, optional, toggle};
use crate::components::form_field::{Checkbox, TextField, field_error};

#[derive(Debug, Clone, Default, PartialEq)]
struct UserDraft {
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    phone: String,
    password: String,
    roles: Vec<RoleId>,
}

impl UserDraft {
    fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            password: String::new(),
            roles: user.roles.iter().map(|role| role.id).collect(),
        }
    }

    fn to_create(&self) -> CreateUser {
        CreateUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: optional(&self.phone),
            password: self.password.clone(),
            roles: self.roles.clone(),
        }
    }

    fn to_update(&self) -> UpdateUser {
        UpdateUser {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: optional(&self.phone),
            roles: self.roles.clone(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct UserFormProps {
    /// The user being edited; `None` creates a new account.
    #[prop_or_default]
    pub user: Option<User>,
    /// Roles that can be granted.
    pub roles: Vec<RoleSummary>,
    pub server_errors: FieldErrors,
    pub busy: bool,
    pub on_create: Callback<CreateUser>,
    pub on_update: Callback<UpdateUser>,
    pub on_cancel: Callback<()>,
}

/// Account details. Username and password are only asked for on creation;
/// passwords of existing users change through [`ChangePasswordForm`].
#[function_component]
pub fn UserForm(props: &UserFormProps) -> Html {
    let draft = use_state(|| {
        props.user.as_ref().map(UserDraft::from_user).unwrap_or_default()
    });
    let errors = use_state(ValidationErrors::new);
    let is_new = props.user.is_none();

    let onsubmit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let on_create = props.on_create.clone();
        let on_update = props.on_update.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let result = if is_new {
                let payload = draft.to_create();
                payload.validate().map(|()| on_create.emit(payload))
            } else {
                let payload = draft.to_update();
                payload.validate().map(|()| on_update.emit(payload))
            };
            errors.set(result.err().unwrap_or_default());
        })
    };

    let error = |field: &str| field_error(&errors, &props.server_errors, field);

    html! {
        <form {onsubmit} class="space-y-4">
            if is_new {
                <TextField
                    label="Username"
                    value={draft.username.clone()}
                    on_change={bind(&draft, |d, v: String| d.username = v)}
                    error={error("username")}
                    autocomplete="off"
                    disabled={props.busy}
                />
            }
            <TextField
                label="Email"
                input_type="email"
                value={draft.email.clone()}
                on_change={bind(&draft, |d, v: String| d.email = v)}
                error={error("email")}
                disabled={props.busy}
            />
            <div class="grid grid-cols-2 gap-4">
                <TextField
                    label="First name"
                    value={draft.first_name.clone()}
                    on_change={bind(&draft, |d, v: String| d.first_name = v)}
                    error={error("first_name")}
                    disabled={props.busy}
                />
                <TextField
                    label="Last name"
                    value={draft.last_name.clone()}
                    on_change={bind(&draft, |d, v: String| d.last_name = v)}
                    error={error("last_name")}
                    disabled={props.busy}
                />
            </div>
            <TextField
                label="Phone"
                input_type="tel"
                value={draft.phone.clone()}
                on_change={bind(&draft, |d, v: String| d.phone = v)}
                error={error("phone")}
                placeholder="Optional"
                disabled={props.busy}
            />
            if is_new {
                <TextField
                    label="Password"
                    input_type="password"
                    value={draft.password.clone()}
                    on_change={bind(&draft, |d, v: String| d.password = v)}
                    error={error("password")}
                    autocomplete="new-password"
                    disabled={props.busy}
                />
            }
            <fieldset>
                <legend class="text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                    {"Roles"}
                </legend>
                if props.roles.is_empty() {
                    <p class="text-sm text-neutral-500">{"No roles available."}</p>
                }
                <div class="grid grid-cols-2 gap-2">
                    {for props.roles.iter().map(|role| {
                        let id = role.id;
                        let on_change = {
                            let draft = draft.clone();
                            Callback::from(move |on: bool| {
                                let mut next = (*draft).clone();
                                toggle(&mut next.roles, id, on);
                                draft.set(next);
                            })
                        };
                        html! {
                            <Checkbox
                                label={role.name.clone()}
                                checked={draft.roles.contains(&id)}
                                {on_change}
                                disabled={props.busy}
                            />
                        }
                    })}
                </div>
                if let Some(message) = error("roles") {
                    <p class="mt-1 text-xs text-red-600 dark:text-red-400">{message}</p>
                }
            </fieldset>
            <FormActions
                busy={props.busy}
                submit_text={if is_new { "Create user" } else { "Save changes" }}
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct ChangePasswordFormProps {
    pub server_errors: FieldErrors,
    pub busy: bool,
    pub on_submit: Callback<ChangePassword>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub fn ChangePasswordForm(props: &ChangePasswordFormProps) -> Html {
    let password = use_state(String::new);
    let confirmation = use_state(String::new);
    let errors = use_state(ValidationErrors::new);

    let onsubmit = {
        let password = password.clone();
        let confirmation = confirmation.clone();
        let errors = errors.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let payload = ChangePassword {
                password: (*password).clone(),
            };
            let mut found = payload.validate().err().unwrap_or_default();
            if *password != *confirmation {
                found.insert("confirmation", "Passwords do not match".into());
            }
            if found.is_empty() {
                on_submit.emit(payload);
            }
            errors.set(found);
        })
    };

    let set_password = {
        let password = password.clone();
        Callback::from(move |value: String| password.set(value))
    };
    let set_confirmation = {
        let confirmation = confirmation.clone();
        Callback::from(move |value: String| confirmation.set(value))
    };

    html! {
        <form {onsubmit} class="space-y-4">
            <TextField
                label="New password"
                input_type="password"
                value={(*password).clone()}
                on_change={set_password}
                error={field_error(&errors, &props.server_errors, "password")}
                autocomplete="new-password"
                disabled={props.busy}
            />
            <TextField
                label="Confirm password"
                input_type="password"
                value={(*confirmation).clone()}
                on_change={set_confirmation}
                error={errors.get("confirmation").cloned()}
                autocomplete="new-password"
                disabled={props.busy}
            />
            <FormActions
                busy={props.busy}
                submit_text="Change password"
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use payloads::UserId;

    fn user() -> User {
        User {
            id: UserId(4),
            username: "dora".into(),
            email: "dora@example.com".into(),
            first_name: "Dora".into(),
            last_name: "Reyes".into(),
            phone: None,
            is_active: true,
            roles: vec![RoleSummary {
                id: RoleId(2),
                name: "Cashier".into(),
            }],
            date_joined: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn editing_keeps_roles_and_clears_blank_phone() {
        let mut draft = UserDraft::from_user(&user());
        draft.phone = "  ".into();
        draft.email = " dora@shop.example.com ".into();
        let update = draft.to_update();
        assert_eq!(update.roles, vec![RoleId(2)]);
        assert_eq!(update.phone, None);
        assert_eq!(update.email, "dora@shop.example.com");
        assert!(update.validate().is_ok());
    }

    #[test]
    fn new_user_needs_a_password() {
        let draft = UserDraft {
            username: "erin".into(),
            email: "erin@example.com".into(),
            first_name: "Erin".into(),
            ..Default::default()
        };
        let errors = draft.to_create().validate().unwrap_err();
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec!["password"]);
    }
}
