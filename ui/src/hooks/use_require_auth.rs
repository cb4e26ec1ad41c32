use crate::{AuthState, Route, State};
use payloads::responses::UserProfile;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::use_store;

/// Hook that requires authentication. Returns the user profile if logged in,
/// or None if logged out or still checking auth status.
#[hook]
pub fn use_require_auth() -> Option<UserProfile> {
    let (state, _) = use_store::<State>();
    state.profile().cloned()
}

/// Shows a spinner while auth is being checked and sends signed-out users
/// to the login page.
#[function_component]
fn LoginRedirect() -> Html {
    let (state, _) = use_store::<State>();

    match &state.auth_state {
        AuthState::Unknown => html! {
            <div class="text-center py-8">
                <div class="inline-block animate-spin rounded-full h-8 w-8 border-2 border-neutral-900 dark:border-neutral-100 border-t-transparent dark:border-t-transparent"></div>
            </div>
        },
        AuthState::LoggedOut => html! { <Redirect<Route> to={Route::Login} /> },
        AuthState::LoggedIn(_) => html! {},
    }
}

pub fn login_redirect() -> Html {
    html! { <LoginRedirect /> }
}
