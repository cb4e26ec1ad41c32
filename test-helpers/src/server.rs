use actix_cors::Cors;
use actix_web::cookie::Cookie;
use actix_web::dev::{HttpServiceFactory, Server, Service};
use actix_web::http::StatusCode;
use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, ResponseError, body::BoxBody,
    web,
};
use payloads::requests::{LoginCredentials, ValidationErrors};
use payloads::{
    PaymentMethod, Permission, Product, Review, Role, SupportTicket, User,
    UserId,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::net::TcpListener;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use crate::store::Store;
use crate::{reports, resources};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// How list endpoints shape their bodies. Real deployments mix these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListShape {
    /// `[...]`
    Bare,
    /// `{count, total_pages, results: [...]}`
    Results,
    /// `{data: {count, total_pages, results: [...]}}`
    NestedResults,
    /// `{data: [...], count}`
    Data,
    /// `{success, message, data: {count, total_pages, results: [...]}}`
    #[default]
    Enveloped,
}

#[derive(Debug, Default)]
struct Behavior {
    list_shape: ListShape,
    refresh_delay: Duration,
    fail_refresh: bool,
    fail_next_lists: u32,
    list_delays: VecDeque<Duration>,
    refresh_calls: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    access: HashMap<String, UserId>,
    refresh: HashMap<String, UserId>,
}

impl Sessions {
    fn grant_access(&mut self, user: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        self.access.insert(token.clone(), user);
        token
    }

    fn open(&mut self, user: UserId) -> (String, String) {
        let refresh = Uuid::new_v4().to_string();
        self.refresh.insert(refresh.clone(), user);
        (self.grant_access(user), refresh)
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    pub store: Store,
    sessions: Sessions,
    behavior: Behavior,
    requests: Vec<String>,
}

impl MockState {
    pub(crate) fn list_shape(&self) -> ListShape {
        self.behavior.list_shape
    }

    /// Consume one injected list failure, if any are queued.
    pub(crate) fn take_list_failure(&mut self) -> bool {
        if self.behavior.fail_next_lists > 0 {
            self.behavior.fail_next_lists -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn take_list_delay(&mut self) -> Option<Duration> {
        self.behavior.list_delays.pop_front()
    }
}

/// Shared handle to the mock's data and fault injection switches.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the data store directly.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        f(&mut self.lock().store)
    }

    pub fn set_list_shape(&self, shape: ListShape) {
        self.lock().behavior.list_shape = shape;
    }

    /// Invalidate every access token; refresh tokens stay valid.
    pub fn expire_access_tokens(&self) {
        self.lock().sessions.access.clear();
    }

    /// Invalidate every token, forcing a new login.
    pub fn expire_sessions(&self) {
        let mut state = self.lock();
        state.sessions.access.clear();
        state.sessions.refresh.clear();
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        self.lock().behavior.refresh_delay = delay;
    }

    pub fn fail_refresh(&self, fail: bool) {
        self.lock().behavior.fail_refresh = fail;
    }

    /// Make the next `n` list requests fail with a 503.
    pub fn fail_next_lists(&self, n: u32) {
        self.lock().behavior.fail_next_lists = n;
    }

    /// Hold the next list response back by `delay`. Calls queue up, one
    /// delay per list request.
    pub fn delay_next_list(&self, delay: Duration) {
        self.lock().behavior.list_delays.push_back(delay);
    }

    pub fn refresh_calls(&self) -> u64 {
        self.lock().behavior.refresh_calls
    }

    /// Number of requests seen whose `"METHOD /path"` starts with `prefix`.
    pub fn requests_matching(&self, prefix: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("Authentication credentials were not provided or have expired.")]
    Unauthorized,
    #[error("Invalid username or password.")]
    BadCredentials,
    #[error("This account is disabled.")]
    Disabled,
    #[error("{0} not found.")]
    NotFound(&'static str),
    #[error("Validation failed.")]
    Validation(BTreeMap<String, Vec<String>>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Malformed request body.")]
    Malformed(#[from] serde_json::Error),
    #[error("Service temporarily unavailable.")]
    Unavailable,
}

impl MockError {
    pub fn field(field: &str, message: &str) -> Self {
        MockError::Validation(BTreeMap::from([(
            field.to_string(),
            vec![message.to_string()],
        )]))
    }
}

impl From<ValidationErrors> for MockError {
    fn from(errors: ValidationErrors) -> Self {
        MockError::Validation(
            errors
                .into_iter()
                .map(|(field, message)| (field.to_string(), vec![message]))
                .collect(),
        )
    }
}

impl ResponseError for MockError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::BadCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Disabled => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) | Self::Malformed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let mut body = json!({ "success": false, "message": self.to_string() });
        if let Self::Validation(errors) = self {
            body["errors"] = json!(errors);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

pub(crate) fn envelope(message: &str, data: impl Serialize) -> Value {
    json!({ "success": true, "message": message, "data": data })
}

/// The user behind the request's access token.
pub(crate) fn authorize(
    request: &HttpRequest,
    state: &MockState,
) -> Result<UserId, MockError> {
    let token = request
        .cookie(ACCESS_COOKIE)
        .ok_or(MockError::Unauthorized)?;
    state
        .sessions
        .access
        .get(token.value())
        .copied()
        .ok_or(MockError::Unauthorized)
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build(name, value).path("/").http_only(true).finish()
}

async fn login(
    backend: web::Data<MockBackend>,
    credentials: web::Json<LoginCredentials>,
) -> Result<HttpResponse, MockError> {
    let mut state = backend.lock();
    let user_id = state
        .store
        .check_credentials(&credentials.username, &credentials.password)?;
    if !state.store.user(user_id)?.is_active {
        return Err(MockError::Disabled);
    }
    let profile = state.store.profile(user_id)?;
    let (access, refresh) = state.sessions.open(user_id);
    tracing::debug!(username = %credentials.username, "signed in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(ACCESS_COOKIE, access))
        .cookie(session_cookie(REFRESH_COOKIE, refresh))
        .json(envelope("Signed in", profile)))
}

async fn refresh(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let (delay, fail) = {
        let mut state = backend.lock();
        state.behavior.refresh_calls += 1;
        (state.behavior.refresh_delay, state.behavior.fail_refresh)
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if fail {
        return Err(MockError::Unauthorized);
    }

    let token = request
        .cookie(REFRESH_COOKIE)
        .ok_or(MockError::Unauthorized)?;
    let mut state = backend.lock();
    let user_id = *state
        .sessions
        .refresh
        .get(token.value())
        .ok_or(MockError::Unauthorized)?;
    let access = state.sessions.grant_access(user_id);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(ACCESS_COOKIE, access))
        .json(envelope("Token refreshed", Value::Null)))
}

async fn logout(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> HttpResponse {
    let mut state = backend.lock();
    if let Some(token) = request.cookie(ACCESS_COOKIE) {
        state.sessions.access.remove(token.value());
    }
    if let Some(token) = request.cookie(REFRESH_COOKIE) {
        state.sessions.refresh.remove(token.value());
    }

    let mut access = session_cookie(ACCESS_COOKIE, String::new());
    access.make_removal();
    let mut refresh = session_cookie(REFRESH_COOKIE, String::new());
    refresh.make_removal();
    HttpResponse::Ok()
        .cookie(access)
        .cookie(refresh)
        .json(envelope("Signed out", Value::Null))
}

async fn me(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    let state = backend.lock();
    let user_id = authorize(&request, &state)?;
    Ok(HttpResponse::Ok().json(envelope("", state.store.profile(user_id)?)))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("healthy")
}

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .route("/health_check", web::get().to(health_check))
        .route("/auth/login/", web::post().to(login))
        .route("/auth/refresh/", web::post().to(refresh))
        .route("/auth/logout/", web::post().to(logout))
        .route("/auth/me/", web::get().to(me))
        .route("/reports/{kind}/", web::get().to(reports::report))
        .configure(resources::routes::<User>)
        .configure(resources::routes::<Role>)
        .configure(resources::routes::<Permission>)
        .configure(resources::routes::<PaymentMethod>)
        .configure(resources::routes::<Review>)
        .configure(resources::routes::<Product>)
        .configure(resources::routes::<SupportTicket>)
}

/// Build the server, but not await it.
///
/// Returns the server and the port it bound to (the OS assigns one if
/// `port` is 0).
pub fn build(
    backend: MockBackend,
    ip: &str,
    port: u16,
) -> std::io::Result<(Server, u16)> {
    let listener = TcpListener::bind(format!("{ip}:{port}"))?;
    let port = listener.local_addr()?.port();
    let data = web::Data::new(backend);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();
        let log = data.clone();

        App::new()
            .wrap_fn(move |request, service| {
                log.lock()
                    .requests
                    .push(format!("{} {}", request.method(), request.path()));
                service.call(request)
            })
            .wrap(cors)
            .app_data(data.clone())
            .service(api_services())
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok((server, port))
}
