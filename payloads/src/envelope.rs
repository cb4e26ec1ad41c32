//! Normalization of backend responses.
//!
//! The backend wraps most responses in an envelope
//! `{success, message, data, errors}`, but some endpoints return bare bodies
//! and list endpoints use several pagination shapes. Everything is funneled
//! through [`normalize_success`], [`normalize_failure`] and [`decode_list`]
//! so callers only ever see one shape.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::ClientError;

/// Server-side validation messages keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The standard response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl<T> Envelope<T> {
    /// Wrap a raw, unenveloped body.
    pub fn synthesized(data: Option<T>) -> Self {
        Self {
            success: true,
            message: String::new(),
            data,
            errors: None,
        }
    }
}

/// One page of a collection, after shape normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Total matching records across all pages, when the server reports it.
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
}

impl<T> ListPage<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: None,
            total_pages: None,
        }
    }
}

#[derive(Deserialize)]
struct Paged<T> {
    results: Vec<T>,
    #[serde(default, alias = "total")]
    count: Option<u64>,
    #[serde(default)]
    total_pages: Option<u32>,
}

impl<T> From<Paged<T>> for ListPage<T> {
    fn from(paged: Paged<T>) -> Self {
        ListPage {
            items: paged.results,
            total: paged.count,
            total_pages: paged.total_pages,
        }
    }
}

/// Every list shape the backend is known to produce. Serde tries the
/// variants top to bottom, which fixes the matching priority.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Results(Paged<T>),
    NestedResults {
        data: Paged<T>,
    },
    Data {
        data: Vec<T>,
        #[serde(default, alias = "total")]
        count: Option<u64>,
        #[serde(default)]
        total_pages: Option<u32>,
    },
}

/// Decode the `data` of a list response into a page of items.
///
/// Accepts, in priority order, `T[]`, `{results: T[]}`,
/// `{data: {results: T[]}}` and `{data: T[]}`. Anything else is logged and
/// treated as an empty page.
pub fn decode_list<T: DeserializeOwned>(data: Value) -> ListPage<T> {
    if data.is_null() {
        return ListPage::empty();
    }
    match serde_json::from_value::<ListBody<T>>(data) {
        Ok(ListBody::Bare(items)) => ListPage {
            items,
            total: None,
            total_pages: None,
        },
        Ok(ListBody::Results(paged)) => paged.into(),
        Ok(ListBody::NestedResults { data }) => data.into(),
        Ok(ListBody::Data {
            data,
            count,
            total_pages,
        }) => ListPage {
            items: data,
            total: count,
            total_pages,
        },
        Err(e) => {
            tracing::warn!("unrecognized list response shape: {e}");
            ListPage::empty()
        }
    }
}

/// Decode the `data` of an envelope into the requested type.
pub fn decode_data<T: DeserializeOwned>(
    envelope: Envelope<Value>,
) -> Result<T, ClientError> {
    Ok(serde_json::from_value(envelope.data.unwrap_or(Value::Null))?)
}

fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|map| map.get("success"))
        .is_some_and(Value::is_boolean)
}

/// Normalize the body of a 2xx response.
///
/// An envelope reporting `success: false` is still a failure, whatever the
/// status code says.
pub fn normalize_success(
    status: StatusCode,
    body: &str,
) -> Result<Envelope<Value>, ClientError> {
    if body.trim().is_empty() {
        return Ok(Envelope::synthesized(None));
    }
    let value: Value = serde_json::from_str(body)?;
    if !is_envelope(&value) {
        return Ok(Envelope::synthesized(Some(value)));
    }
    let envelope: Envelope<Value> = serde_json::from_value(value)?;
    if envelope.success {
        Ok(envelope)
    } else {
        let errors = envelope
            .errors
            .as_ref()
            .map(field_errors)
            .unwrap_or_default();
        let message = non_empty(envelope.message)
            .unwrap_or_else(|| fallback_message(status).to_string());
        if errors.is_empty() {
            Err(ClientError::APIError(status, message))
        } else {
            Err(ClientError::Validation { message, errors })
        }
    }
}

/// Normalize the body of a non-2xx response into an error.
pub fn normalize_failure(status: StatusCode, body: &str) -> ClientError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed
        .as_ref()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("detail"))
                .and_then(Value::as_str)
        })
        .and_then(|m| non_empty(m.to_string()))
        .or_else(|| plain_text_message(parsed.is_none(), body))
        .unwrap_or_else(|| fallback_message(status).to_string());

    if status == StatusCode::BAD_REQUEST
        && let Some(value) = &parsed
    {
        // Either the envelope's `errors`, or a bare `{field: [messages]}`
        // body as produced by DRF serializers.
        let errors = match value.get("errors") {
            Some(errors) => field_errors(errors),
            None if !is_envelope(value) => field_errors(value),
            None => FieldErrors::new(),
        };
        if !errors.is_empty() {
            return ClientError::Validation { message, errors };
        }
    }

    ClientError::APIError(status, message)
}

/// Collect `{field: "msg" | ["msg", ...]}` into [`FieldErrors`], skipping
/// entries that are neither.
pub fn field_errors(value: &Value) -> FieldErrors {
    let Some(map) = value.as_object() else {
        return FieldErrors::new();
    };
    map.iter()
        .filter(|(field, _)| !matches!(field.as_str(), "message" | "detail"))
        .filter_map(|(field, messages)| {
            let messages: Vec<String> = match messages {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => return None,
            };
            (!messages.is_empty()).then(|| (field.clone(), messages))
        })
        .collect()
}

/// Short plain-text bodies are shown as-is; HTML error pages and the like are
/// not.
fn plain_text_message(unparsed: bool, body: &str) -> Option<String> {
    let body = body.trim();
    (unparsed && !body.is_empty() && body.len() <= 200 && !body.starts_with('<'))
        .then(|| body.to_string())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

pub fn fallback_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "The submitted data is not valid.",
        StatusCode::UNAUTHORIZED => "You need to sign in to continue.",
        StatusCode::FORBIDDEN => {
            "You do not have permission to perform this action."
        }
        StatusCode::NOT_FOUND => "The requested resource was not found.",
        StatusCode::CONFLICT => {
            "The resource was modified or already exists."
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            "The server took too long to respond."
        }
        s if s.is_server_error() => {
            "Something went wrong on the server. Please try again later."
        }
        _ => "Something went wrong. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        id: i64,
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                name: "Mug".into(),
            },
            Item {
                id: 2,
                name: "Tea".into(),
            },
        ]
    }

    fn raw_items() -> Value {
        json!([{"id": 1, "name": "Mug"}, {"id": 2, "name": "Tea"}])
    }

    #[test]
    fn every_list_shape_yields_the_same_items() {
        let shapes = [
            raw_items(),
            json!({"results": raw_items()}),
            json!({"data": {"results": raw_items()}}),
            json!({"data": raw_items()}),
        ];
        for shape in shapes {
            let page: ListPage<Item> = decode_list(shape.clone());
            assert_eq!(page.items, items(), "shape {shape}");
        }
    }

    #[test]
    fn enveloped_list_bodies_normalize_like_bare_ones() {
        let bodies = [
            json!({"success": true, "message": "", "data": raw_items()}),
            json!({"success": true, "data": {"results": raw_items()}}),
            json!({"data": {"results": raw_items()}}),
            json!({"data": raw_items()}),
            raw_items(),
        ];
        for body in bodies {
            let envelope =
                normalize_success(StatusCode::OK, &body.to_string()).unwrap();
            let page: ListPage<Item> =
                decode_list(envelope.data.unwrap_or(Value::Null));
            assert_eq!(page.items, items(), "body {body}");
        }
    }

    #[test]
    fn list_counts_are_kept() {
        let page: ListPage<Item> = decode_list(json!({
            "count": 42,
            "total_pages": 3,
            "results": raw_items(),
        }));
        assert_eq!(page.total, Some(42));
        assert_eq!(page.total_pages, Some(3));

        let page: ListPage<Item> =
            decode_list(json!({"data": raw_items(), "total": 7}));
        assert_eq!(page.total, Some(7));
    }

    #[test]
    fn unknown_list_shape_is_empty() {
        let page: ListPage<Item> = decode_list(json!({"rows": raw_items()}));
        assert!(page.items.is_empty());
        let page: ListPage<Item> = decode_list(json!("nope"));
        assert!(page.items.is_empty());
        let page: ListPage<Item> = decode_list(Value::Null);
        assert!(page.items.is_empty());
    }

    #[test]
    fn envelope_is_unwrapped() {
        let body = json!({
            "success": true,
            "message": "Created",
            "data": {"id": 1, "name": "Mug"},
        });
        let envelope =
            normalize_success(StatusCode::CREATED, &body.to_string()).unwrap();
        assert_eq!(envelope.message, "Created");
        let item: Item = decode_data(envelope).unwrap();
        assert_eq!(item, items()[0]);
    }

    #[test]
    fn raw_body_is_synthesized() {
        let envelope =
            normalize_success(StatusCode::OK, r#"{"id": 2, "name": "Tea"}"#)
                .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.message, "");
        let item: Item = decode_data(envelope).unwrap();
        assert_eq!(item, items()[1]);
    }

    #[test]
    fn empty_body_has_no_data() {
        let envelope = normalize_success(StatusCode::NO_CONTENT, "").unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, None);
        let unit: () = decode_data(envelope).unwrap();
        assert_eq!(unit, ());
    }

    #[test]
    fn unsuccessful_envelope_on_ok_status_is_an_error() {
        let body = json!({"success": false, "message": "Out of stock"});
        let err = normalize_success(StatusCode::OK, &body.to_string())
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::APIError(StatusCode::OK, ref m) if m == "Out of stock"
        ));
    }

    #[test]
    fn failure_uses_backend_message() {
        let body = json!({"success": false, "message": "Role is in use"});
        let err = normalize_failure(StatusCode::CONFLICT, &body.to_string());
        assert_eq!(err.to_string(), "Role is in use");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn failure_uses_detail() {
        let err = normalize_failure(
            StatusCode::FORBIDDEN,
            r#"{"detail": "Not allowed here"}"#,
        );
        assert_eq!(err.to_string(), "Not allowed here");
    }

    #[test]
    fn failure_falls_back_by_status() {
        let err = normalize_failure(StatusCode::NOT_FOUND, "");
        assert_eq!(err.to_string(), "The requested resource was not found.");
        let err = normalize_failure(
            StatusCode::BAD_GATEWAY,
            "<html><body>Bad gateway</body></html>",
        );
        assert_eq!(
            err.to_string(),
            "Something went wrong on the server. Please try again later."
        );
        let err =
            normalize_failure(StatusCode::INTERNAL_SERVER_ERROR, "db down");
        assert_eq!(err.to_string(), "db down");
    }

    #[test]
    fn validation_errors_from_envelope() {
        let body = json!({
            "success": false,
            "message": "Validation failed",
            "errors": {"email": ["Enter a valid email."], "username": "Taken"},
        });
        let err = normalize_failure(StatusCode::BAD_REQUEST, &body.to_string());
        let ClientError::Validation { message, errors } = err else {
            panic!("expected validation error");
        };
        assert_eq!(message, "Validation failed");
        assert_eq!(errors["email"], vec!["Enter a valid email."]);
        assert_eq!(errors["username"], vec!["Taken"]);
    }

    #[test]
    fn validation_errors_from_bare_body() {
        let body = json!({"sku": ["This field must be unique."]});
        let err = normalize_failure(StatusCode::BAD_REQUEST, &body.to_string());
        let errors = err.field_errors().expect("field errors");
        assert_eq!(errors["sku"], vec!["This field must be unique."]);
        assert_eq!(err.to_string(), "The submitted data is not valid.");
    }
}
