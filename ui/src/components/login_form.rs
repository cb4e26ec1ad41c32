use payloads::requests::{LoginCredentials, Validate, ValidationErrors};
use payloads::responses::UserProfile;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::State;
use crate::components::form_field::TextField;

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub on_success: Callback<UserProfile>,
    #[prop_or_default]
    pub show_dev_credentials: bool,
}

#[function_component]
pub fn LoginForm(props: &LoginFormProps) -> Html {
    let (_state, dispatch) = use_store::<State>();

    let username = use_state(String::new);
    let password = use_state(String::new);
    let field_errors = use_state(ValidationErrors::new);
    let error_message = use_state(|| None::<String>);
    let is_loading = use_state(|| false);

    let on_submit = {
        let username = username.clone();
        let password = password.clone();
        let field_errors = field_errors.clone();
        let error_message = error_message.clone();
        let is_loading = is_loading.clone();
        let on_success = props.on_success.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let credentials = LoginCredentials {
                username: username.trim().to_string(),
                password: (*password).clone(),
            };
            if let Err(errors) = credentials.validate() {
                field_errors.set(errors);
                return;
            }
            field_errors.set(ValidationErrors::new());

            let error_message = error_message.clone();
            let is_loading = is_loading.clone();
            let on_success = on_success.clone();
            let dispatch = dispatch.clone();

            yew::platform::spawn_local(async move {
                is_loading.set(true);
                error_message.set(None);

                let api_client = crate::get_api_client();
                match api_client.login(&credentials).await {
                    Ok(profile) => {
                        tracing::info!("signed in as {}", profile.username);
                        dispatch.reduce_mut(|state| state.login(profile.clone()));
                        on_success.emit(profile);
                    }
                    Err(e) => {
                        dispatch.reduce_mut(|state| state.clear());
                        error_message.set(Some(e.user_message()));
                    }
                }

                is_loading.set(false);
            });
        })
    };

    let set_username = {
        let username = username.clone();
        Callback::from(move |value: String| username.set(value))
    };
    let set_password = {
        let password = password.clone();
        Callback::from(move |value: String| password.set(value))
    };

    html! {
        <div class="max-w-md w-full bg-white dark:bg-neutral-800 p-8 rounded-lg shadow-md">
            <div class="mb-6">
                <h2 class="text-2xl font-bold text-neutral-900 dark:text-neutral-100">
                    {"Sign in to Retail Admin"}
                </h2>
                <p class="mt-1 text-sm text-neutral-600 dark:text-neutral-400">
                    {"Staff accounts only"}
                </p>
            </div>

            if props.show_dev_credentials {
                <div class="mb-4 p-3 rounded-md bg-neutral-100 dark:bg-neutral-700 text-xs text-neutral-700 dark:text-neutral-300">
                    {"Dev server: admin / Admin-pass-2024"}
                </div>
            }

            <form onsubmit={on_submit} class="space-y-4">
                <TextField
                    label="Username"
                    value={(*username).clone()}
                    on_change={set_username}
                    error={field_errors.get("username").cloned()}
                    autocomplete="username"
                    disabled={*is_loading}
                />
                <TextField
                    label="Password"
                    input_type="password"
                    value={(*password).clone()}
                    on_change={set_password}
                    error={field_errors.get("password").cloned()}
                    autocomplete="current-password"
                    disabled={*is_loading}
                />

                if let Some(error) = &*error_message {
                    <div class="p-3 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                        <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                    </div>
                }

                <button
                    type="submit"
                    disabled={*is_loading}
                    class="w-full py-2 px-4 rounded-md text-sm font-medium text-white
                           bg-neutral-900 hover:bg-neutral-700 dark:bg-neutral-100
                           dark:text-neutral-900 dark:hover:bg-neutral-300
                           disabled:opacity-50 disabled:cursor-not-allowed"
                >
                    {if *is_loading { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
