use payloads::APIClient;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

mod components;
mod config;
mod contexts;
mod hooks;
mod logs;
mod pages;
mod state;
mod utils;

pub use logs::init_logging;
pub use state::{AuthState, State};

use components::{MainLayout, RequireAuth, ToastContainer};
use contexts::toast::ToastProvider;
use hooks::{use_authentication, use_session_keepalive};

thread_local! {
    static API_CLIENT: APIClient = build_api_client();
}

/// The shared API client. Every clone shares one refresh gate, so the whole
/// app performs at most one token refresh at a time.
pub fn get_api_client() -> APIClient {
    API_CLIENT.with(APIClient::clone)
}

fn build_api_client() -> APIClient {
    APIClient::from_config(config::config(), reqwest::Client::new())
        .on_session_expired(|| {
            tracing::info!("session expired, signing out");
            state::remove_session();
            // Protected pages redirect to the login page once signed out.
            Dispatch::<State>::global().reduce_mut(|state| state.clear());
        })
}

#[function_component]
pub fn App() -> Html {
    html! {
        <BrowserRouter>
            <ToastProvider>
                <Session />
                <ToastContainer />
                <Switch<Route> render={switch} />
            </ToastProvider>
        </BrowserRouter>
    }
}

/// Startup session check plus the periodic token refresh.
#[function_component]
fn Session() -> Html {
    use_authentication();
    use_session_keepalive();
    html! {}
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/users")]
    Users,
    #[at("/roles")]
    Roles,
    #[at("/permissions")]
    Permissions,
    #[at("/payment-methods")]
    PaymentMethods,
    #[at("/reviews")]
    Reviews,
    #[at("/products")]
    Products,
    #[at("/tickets")]
    Tickets,
    #[at("/reports")]
    Reports,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Entries of the navigation sidebar.
    pub const NAV: [(Route, &'static str); 9] = [
        (Route::Home, "Dashboard"),
        (Route::Products, "Products"),
        (Route::Reviews, "Reviews"),
        (Route::Tickets, "Support tickets"),
        (Route::PaymentMethods, "Payment methods"),
        (Route::Reports, "Reports"),
        (Route::Users, "Users"),
        (Route::Roles, "Roles"),
        (Route::Permissions, "Permissions"),
    ];
}

fn switch(route: Route) -> Html {
    let page = match route {
        Route::Login => return html! { <pages::LoginPage /> },
        Route::NotFound => return html! { <pages::NotFoundPage /> },
        Route::Home => html! { <pages::DashboardPage /> },
        Route::Users => html! { <pages::UsersPage /> },
        Route::Roles => html! { <pages::RolesPage /> },
        Route::Permissions => html! { <pages::PermissionsPage /> },
        Route::PaymentMethods => html! { <pages::PaymentMethodsPage /> },
        Route::Reviews => html! { <pages::ReviewsPage /> },
        Route::Products => html! { <pages::ProductsPage /> },
        Route::Tickets => html! { <pages::TicketsPage /> },
        Route::Reports => html! { <pages::ReportsPage /> },
    };

    html! {
        <RequireAuth>
            <MainLayout>{page}</MainLayout>
        </RequireAuth>
    }
}
