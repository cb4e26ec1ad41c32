pub mod use_authentication;
pub mod use_fetch;
pub mod use_logout;
pub mod use_require_auth;
pub mod use_resource;
pub mod use_session_keepalive;
pub mod use_title;

pub use use_authentication::use_authentication;
pub use use_fetch::{FetchHookReturn, FetchState, use_fetch};
pub use use_logout::use_logout;
pub use use_require_auth::{login_redirect, use_require_auth};
pub use use_resource::{UseResourceHandle, use_resource};
pub use use_session_keepalive::use_session_keepalive;
pub use use_title::use_title;
