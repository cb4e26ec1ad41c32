use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_title;
use crate::{Route, State};

/// One-line description for each quick link.
fn blurb(route: &Route) -> &'static str {
    match route {
        Route::Products => "Catalogue, prices, stock and images",
        Route::Reviews => "Moderate customer reviews",
        Route::Tickets => "Customer support requests",
        Route::PaymentMethods => "Methods offered at checkout",
        Route::Reports => "Sales, purchases, inventory and payments",
        Route::Users => "Staff accounts",
        Route::Roles => "Groups of permissions",
        Route::Permissions => "Individual access rights",
        _ => "",
    }
}

#[function_component]
pub fn DashboardPage() -> Html {
    use_title("Dashboard");
    let (state, _) = use_store::<State>();
    let greeting = state
        .profile()
        .map(|profile| format!("Welcome back, {}", profile.display_name()))
        .unwrap_or_else(|| "Welcome".to_string());

    html! {
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl font-bold text-neutral-900 dark:text-neutral-100">
                    {greeting}
                </h1>
                <p class="text-neutral-600 dark:text-neutral-400 mt-1">
                    {"Jump to a section of the store back office."}
                </p>
            </div>
            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                {for Route::NAV.iter().filter(|(route, _)| *route != Route::Home).map(|(route, label)| html! {
                    <Link<Route>
                        to={route.clone()}
                        classes="block p-5 bg-white dark:bg-neutral-800 rounded-lg shadow border border-neutral-200 dark:border-neutral-700 hover:border-neutral-400 dark:hover:border-neutral-500 transition-colors"
                    >
                        <h2 class="text-lg font-semibold text-neutral-900 dark:text-neutral-100">
                            {*label}
                        </h2>
                        <p class="text-sm text-neutral-600 dark:text-neutral-400 mt-1">
                            {blurb(route)}
                        </p>
                    </Link<Route>>
                })}
            </div>
        </div>
    }
}
