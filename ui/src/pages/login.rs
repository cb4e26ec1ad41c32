use payloads::responses::UserProfile;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::Route;
use crate::components::LoginForm;
use crate::config::is_dev_mode;
use crate::hooks::use_title;
use crate::state::State;

#[function_component]
pub fn LoginPage() -> Html {
    use_title("Sign in");
    let navigator = use_navigator().unwrap();
    let (state, _) = use_store::<State>();

    // Redirect to the dashboard if already signed in
    {
        let navigator = navigator.clone();
        let is_authenticated = state.is_authenticated();

        use_effect_with(is_authenticated, move |is_auth| {
            if *is_auth {
                navigator.push(&Route::Home);
            }
        });
    }

    let on_success = Callback::from(move |_profile: UserProfile| {
        navigator.push(&Route::Home);
    });

    html! {
        <div class="flex items-center justify-center min-h-screen bg-neutral-50 dark:bg-neutral-900 px-4">
            <LoginForm {on_success} show_dev_credentials={is_dev_mode()} />
        </div>
    }
}
