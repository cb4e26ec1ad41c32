use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_logout;
use crate::{Route, State};

#[function_component]
pub fn Header() -> Html {
    let (state, _) = use_store::<State>();
    let on_logout = use_logout();

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <Link<Route> to={Route::Home} classes="text-xl font-semibold text-neutral-900 dark:text-white">
                        {"Retail Admin"}
                    </Link<Route>>
                    if let Some(profile) = state.profile() {
                        <div class="flex items-center space-x-4">
                            <span class="text-sm text-neutral-600 dark:text-neutral-400">
                                {profile.display_name()}
                            </span>
                            <button
                                onclick={on_logout}
                                class="text-sm font-medium text-neutral-700 dark:text-neutral-300 hover:text-neutral-900 dark:hover:text-white"
                            >
                                {"Sign out"}
                            </button>
                        </div>
                    }
                </div>
            </div>
        </header>
    }
}
