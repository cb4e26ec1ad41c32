use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component]
pub fn Sidebar() -> Html {
    let current = use_route::<Route>();

    html! {
        <nav class="w-52 flex-shrink-0 space-y-1">
            {for Route::NAV.iter().map(|(route, label)| {
                let active = current.as_ref() == Some(route);
                let classes = if active {
                    "block px-3 py-2 rounded-md text-sm font-medium bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900"
                } else {
                    "block px-3 py-2 rounded-md text-sm font-medium text-neutral-700 dark:text-neutral-300 hover:bg-neutral-100 dark:hover:bg-neutral-800"
                };
                html! {
                    <Link<Route> to={route.clone()} classes={classes}>
                        {*label}
                    </Link<Route>>
                }
            })}
        </nav>
    }
}
