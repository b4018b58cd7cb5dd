//! Request body extractor accepting JSON or urlencoded forms.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Request body as a JSON value.
///
/// `application/x-www-form-urlencoded` bodies become a flat object of
/// strings (repeated keys collect into an array). An empty body is `{}`.
#[derive(Debug, Clone)]
pub struct Payload(pub Value);

impl Payload {
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Deserialize the body into `T`.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.0)?)
    }
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn form_to_value(pairs: Vec<(String, String)>) -> Value {
    let mut object = Map::new();
    for (key, value) in pairs {
        match object.get_mut(&key) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                object.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(object)
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return Ok(Payload(form_to_value(pairs)));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(Value::Object(Map::new())));
        }
        Ok(Payload(serde_json::from_slice(&bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Value, ApiError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        Payload::from_request(req, &()).await.map(Payload::into_inner)
    }

    #[tokio::test]
    async fn test_json_body() {
        let value = extract(Some("application/json"), r#"{"a":1}"#).await.unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        assert_eq!(extract(None, "").await.unwrap(), json!({}));
        assert_eq!(extract(Some("application/json"), "  ").await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_urlencoded_body() {
        let value = extract(
            Some("application/x-www-form-urlencoded"),
            "email=a%40example.com&skill=rust&skill=go&skill=sql",
        )
        .await
        .unwrap();
        assert_eq!(
            value,
            json!({"email": "a@example.com", "skill": ["rust", "go", "sql"]})
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let err = extract(Some("application/json"), "{nope").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
