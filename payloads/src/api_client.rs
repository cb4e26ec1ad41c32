use crate::config::ClientConfig;
use crate::envelope::{
    Envelope, FieldErrors, ListPage, decode_data, decode_list,
    normalize_failure, normalize_success,
};
use crate::session::RefreshGate;
use crate::{Resource, requests, responses};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// Called once when a token refresh is rejected and the user must sign in
/// again.
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Endpoints whose 401 means bad credentials rather than an expired token.
const AUTH_PATHS: [&str; 3] = ["auth/login/", "auth/refresh/", "auth/logout/"];

/// An API client for interfacing with the backend.
///
/// Clones share the refresh gate, so at most one token refresh is in flight
/// no matter how many clones are issuing requests.
#[derive(Clone)]
pub struct APIClient {
    /// API root, without a trailing slash.
    pub address: String,
    pub inner_client: reqwest::Client,
    timeout: Duration,
    refresh_gate: Arc<RefreshGate>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl std::fmt::Debug for APIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("APIClient")
            .field("address", &self.address)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl APIClient {
    pub fn new(
        address: impl Into<String>,
        inner_client: reqwest::Client,
    ) -> Self {
        Self {
            address: address.into().trim_end_matches('/').to_string(),
            inner_client,
            timeout: Duration::from_millis(crate::config::DEFAULT_TIMEOUT_MS),
            refresh_gate: Arc::new(RefreshGate::new()),
            on_session_expired: None,
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        inner_client: reqwest::Client,
    ) -> Self {
        Self::new(config.base_url.clone(), inner_client)
            .with_timeout(config.timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn on_session_expired(
        mut self,
        hook: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_session_expired = Some(Arc::new(hook));
        self
    }

    /// Number of `auth/refresh/` calls this client and its clones have made.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_gate.refresh_count()
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/{path}", &self.address)
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        params: &[(String, String)],
    ) -> ReqwestResult {
        let mut request = self
            .inner_client
            .request(method.clone(), self.format_url(path))
            .timeout(self.timeout);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }

    /// Issue a request and normalize the result into an [`Envelope`].
    ///
    /// A 401 from a non-auth endpoint triggers one shared token refresh and a
    /// single replay of the request.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(String, String)],
    ) -> Result<Envelope<Value>, ClientError> {
        let body = body.map(serde_json::to_value).transpose()?;
        let observed = self.refresh_gate.generation();

        tracing::debug!("{method} {path}");
        let response = self.send(&method, path, body.as_ref(), params).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && !AUTH_PATHS.contains(&path)
        {
            tracing::debug!("{method} {path} was unauthorized");
            self.refresh_or_expire(observed).await?;
            let retry = self.send(&method, path, body.as_ref(), params).await?;
            return normalize_response(retry).await;
        }

        normalize_response(response).await
    }

    async fn refresh_or_expire(&self, observed: u64) -> Result<(), ClientError> {
        let refreshed = self
            .refresh_gate
            .refresh(observed, || async {
                let ok = self.post_refresh().await;
                if !ok && let Some(hook) = &self.on_session_expired {
                    hook();
                }
                ok
            })
            .await;
        if refreshed {
            Ok(())
        } else {
            Err(ClientError::SessionExpired)
        }
    }

    async fn post_refresh(&self) -> bool {
        match self.send(&Method::POST, "auth/refresh/", None, &[]).await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("token refresh failed: {e}");
                false
            }
        }
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let envelope = self.request::<()>(Method::GET, path, None, &[]).await?;
        decode_data(envelope)
    }

    /// POST to a record action such as `users/4/activate/`.
    pub(crate) async fn action<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ClientError> {
        self.request(Method::POST, path, body, &[]).await?;
        Ok(())
    }
}

/// Generic collection methods shared by every [`Resource`].
impl APIClient {
    pub async fn list<R: Resource>(
        &self,
        filters: &R::Filters,
        page: u32,
        page_size: u32,
    ) -> Result<ListPage<R>, ClientError> {
        let mut params = query_params(filters)?;
        params.push(("page".into(), page.to_string()));
        params.push(("page_size".into(), page_size.to_string()));
        let envelope = self
            .request::<()>(Method::GET, R::PATH, None, &params)
            .await?;
        Ok(decode_list(envelope.data.unwrap_or(Value::Null)))
    }

    pub async fn get<R: Resource>(&self, id: R::Id) -> Result<R, ClientError> {
        self.get_data(&record_path::<R>(id)).await
    }

    pub async fn create<R: Resource>(
        &self,
        details: &R::Create,
    ) -> Result<R, ClientError> {
        let envelope = self
            .request(Method::POST, R::PATH, Some(details), &[])
            .await?;
        decode_data(envelope)
    }

    /// Partial update; only the fields present in `details` change.
    pub async fn update<R: Resource>(
        &self,
        id: R::Id,
        details: &R::Update,
    ) -> Result<R, ClientError> {
        let envelope = self
            .request(Method::PATCH, &record_path::<R>(id), Some(details), &[])
            .await?;
        decode_data(envelope)
    }

    pub async fn delete<R: Resource>(&self, id: R::Id) -> Result<(), ClientError> {
        self.request::<()>(Method::DELETE, &record_path::<R>(id), None, &[])
            .await?;
        Ok(())
    }
}

/// Session methods
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response =
            self.send(&Method::GET, "health_check", None, &[]).await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(normalize_failure(status, &response.text().await?))
        }
    }

    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<responses::UserProfile, ClientError> {
        let envelope = self
            .request(Method::POST, "auth/login/", Some(details), &[])
            .await?;
        match envelope.data {
            Some(data) if !data.is_null() => Ok(serde_json::from_value(data)?),
            _ => self.get_data("auth/me/").await,
        }
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.request::<()>(Method::POST, "auth/logout/", None, &[])
            .await?;
        Ok(())
    }

    /// The signed-in user, or `None` if there is no usable session.
    pub async fn session_check(
        &self,
    ) -> Result<Option<responses::UserProfile>, ClientError> {
        match self.get_data("auth/me/").await {
            Ok(profile) => Ok(Some(profile)),
            Err(ClientError::SessionExpired) => Ok(None),
            Err(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Proactively refresh the access token through the shared gate.
    pub async fn refresh_session(&self) -> Result<(), ClientError> {
        self.refresh_or_expire(self.refresh_gate.generation()).await
    }
}

fn record_path<R: Resource>(id: R::Id) -> String {
    format!("{}{id}/", R::PATH)
}

/// Flatten a filter struct into query parameters. Unset (`null`) fields are
/// left out and sequences are joined with commas.
pub fn query_params<T: Serialize>(
    filters: &T,
) -> Result<Vec<(String, String)>, ClientError> {
    let Value::Object(map) = serde_json::to_value(filters)? else {
        return Ok(Vec::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) if s.trim().is_empty() => return None,
                Value::String(s) => s,
                Value::Array(items) => items
                    .iter()
                    .map(scalar_param)
                    .collect::<Vec<_>>()
                    .join(","),
                other => scalar_param(&other),
            };
            Some((key, value))
        })
        .collect())
}

fn scalar_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn normalize_response(
    response: reqwest::Response,
) -> Result<Envelope<Value>, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        normalize_success(status, &body)
    } else {
        Err(normalize_failure(status, &body))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing the normalized message.
    #[error("{1}")]
    APIError(StatusCode, String),
    /// The backend rejected the submitted fields.
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },
    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response from the server.")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::APIError(status, _) => Some(*status),
            ClientError::Validation { .. } => Some(StatusCode::BAD_REQUEST),
            ClientError::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            ClientError::Network(e) => e.status(),
            ClientError::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// The message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(e) if e.is_timeout() => {
                "The server took too long to respond.".into()
            }
            ClientError::Validation { message, errors } => {
                match errors.values().flatten().next() {
                    Some(first) if message.is_empty() => first.clone(),
                    _ => message.clone(),
                }
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::{ProductFilters, UserFilters};
    use crate::RoleId;

    #[test]
    fn unset_filters_are_left_out() {
        let params = query_params(&UserFilters {
            search: Some("ann".into()),
            role: Some(RoleId(2)),
            is_active: None,
        })
        .unwrap();
        assert_eq!(
            params,
            vec![
                ("role".to_string(), "2".to_string()),
                ("search".to_string(), "ann".to_string()),
            ]
        );
    }

    #[test]
    fn blank_search_is_left_out() {
        let params = query_params(&ProductFilters {
            search: Some("  ".into()),
            is_active: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params, vec![("is_active".to_string(), "false".to_string())]);
    }

    #[test]
    fn error_helpers() {
        let err = ClientError::APIError(StatusCode::NOT_FOUND, "gone".into());
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "gone");
        assert!(ClientError::SessionExpired.field_errors().is_none());

        let err = ClientError::Validation {
            message: String::new(),
            errors: FieldErrors::from([(
                "sku".to_string(),
                vec!["Already used".to_string()],
            )]),
        };
        assert_eq!(err.user_message(), "Already used");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn record_paths() {
        assert_eq!(record_path::<crate::User>(crate::UserId(7)), "users/7/");
        assert_eq!(
            record_path::<crate::PaymentMethod>(crate::PaymentMethodId(3)),
            "payment-methods/3/"
        );
    }
}
