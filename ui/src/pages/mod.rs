pub mod dashboard;
pub mod login;
pub mod not_found;
pub mod payment_methods;
pub mod permissions;
pub mod products;
pub mod reports;
pub mod reviews;
pub mod roles;
pub mod tickets;
pub mod users;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use payment_methods::PaymentMethodsPage;
pub use permissions::PermissionsPage;
pub use products::ProductsPage;
pub use reports::ReportsPage;
pub use reviews::ReviewsPage;
pub use roles::RolesPage;
pub use tickets::TicketsPage;
pub use users::UsersPage;
