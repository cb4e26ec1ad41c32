pub mod bar_chart;
pub mod confirmation_modal;
pub mod filter_bar;
pub mod form_field;
pub mod forms;
pub mod layout;
pub mod list_status;
pub mod login_form;
pub mod modal;
pub mod page_header;
pub mod pagination_controls;
pub mod require_auth;
pub mod status_badge;
pub mod table;
pub mod toast;

pub use bar_chart::BarChart;
pub use confirmation_modal::ConfirmationModal;
pub use filter_bar::{ActiveFilter, FilterBar};
pub use form_field::{Checkbox, SelectField, TextAreaField, TextField};
pub use layout::MainLayout;
pub use list_status::ListStatus;
pub use login_form::LoginForm;
pub use modal::Modal;
pub use page_header::PageHeader;
pub use pagination_controls::PaginationControls;
pub use require_auth::RequireAuth;
pub use status_badge::{ActiveBadge, StatusBadge, Tone};
pub use table::{RowButton, Table};
pub use toast::ToastContainer;
