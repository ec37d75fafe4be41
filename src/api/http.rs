use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ApiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text.to_string()),
        }
    }

    fn as_value(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value.clone(),
            Self::Text(text) => Value::String(text.clone()),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("<empty>"),
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {path} failed (network error)")]
    Network {
        method: Method,
        path: String,
        reason: String,
    },
    #[error("{method} {path} failed")]
    Status {
        method: Method,
        path: String,
        status: u16,
        body: ResponseBody,
    },
    #[error("{method} {path} returned an unexpected payload: {reason}")]
    Decode {
        method: Method,
        path: String,
        reason: String,
        body: ResponseBody,
    },
    #[error("{method} {path} payload could not be encoded: {reason}")]
    Encode {
        method: Method,
        path: String,
        reason: String,
    },
}

impl ApiError {
    pub fn path(&self) -> &str {
        match self {
            Self::Network { path, .. }
            | Self::Status { path, .. }
            | Self::Decode { path, .. }
            | Self::Encode { path, .. } => path,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            Self::Status { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub text: String,
}

pub trait Transport: Send + Sync {
    fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<RawResponse, String>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
    config: ApiConfig,
}

impl UreqTransport {
    pub fn new(config: ApiConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            config,
        }
    }
}

impl Transport for UreqTransport {
    fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<RawResponse, String> {
        let url = self.config.url_for(path);
        let request = self
            .agent
            .request(method.as_str(), &url)
            .set("Accept", "application/json");

        let outcome = match payload {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => return Err(err.to_string()),
        };

        let status = response.status();
        let text = response
            .into_string()
            .map_err(|err| format!("failed to read response body: {err}"))?;

        Ok(RawResponse { status, text })
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_transport(Arc::new(UreqTransport::new(config)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn post<T, P>(&self, path: &str, payload: &P) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let payload = encode(Method::Post, path, payload)?;
        let body = self.fetch(Method::Post, path, Some(&payload))?;
        decode(Method::Post, path, &body)
    }

    pub fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let body = self.fetch(Method::Get, path, None)?;
        ensure_array(Method::Get, path, &body)?;
        decode(Method::Get, path, &body)
    }

    pub fn post_list<T, P>(&self, path: &str, payload: &P) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let payload = encode(Method::Post, path, payload)?;
        let body = self.fetch(Method::Post, path, Some(&payload))?;
        ensure_array(Method::Post, path, &body)?;
        decode(Method::Post, path, &body)
    }

    fn fetch(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ResponseBody, ApiError> {
        debug!(%method, path, "sending request");

        let response = self
            .transport
            .send(method, path, payload)
            .map_err(|reason| {
                warn!(%method, path, reason = %reason, "request did not complete");
                ApiError::Network {
                    method,
                    path: path.to_string(),
                    reason,
                }
            })?;

        let body = ResponseBody::parse(&response.text);
        if !(200..300).contains(&response.status) {
            warn!(%method, path, status = response.status, body = %body, "request rejected");
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status: response.status,
                body,
            });
        }

        debug!(%method, path, status = response.status, "response received");
        Ok(body)
    }
}

fn encode<P: Serialize + ?Sized>(method: Method, path: &str, payload: &P) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|err| ApiError::Encode {
        method,
        path: path.to_string(),
        reason: err.to_string(),
    })
}

fn decode<T: DeserializeOwned>(method: Method, path: &str, body: &ResponseBody) -> Result<T, ApiError> {
    serde_json::from_value(body.as_value()).map_err(|err| ApiError::Decode {
        method,
        path: path.to_string(),
        reason: err.to_string(),
        body: body.clone(),
    })
}

fn ensure_array(method: Method, path: &str, body: &ResponseBody) -> Result<(), ApiError> {
    match body {
        ResponseBody::Json(Value::Array(_)) => Ok(()),
        other => Err(ApiError::Decode {
            method,
            path: path.to_string(),
            reason: "expected a JSON array".to_string(),
            body: other.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::model::OptionItem;

    #[test]
    fn response_body_prefers_json_and_falls_back_to_text() {
        assert_eq!(ResponseBody::parse(""), ResponseBody::Empty);
        assert_eq!(
            ResponseBody::parse(r#"{"detail":"boom"}"#),
            ResponseBody::Json(json!({ "detail": "boom" }))
        );
        assert_eq!(
            ResponseBody::parse("Internal Server Error"),
            ResponseBody::Text("Internal Server Error".to_string())
        );
    }

    #[test]
    fn non_success_status_carries_path_status_and_parsed_body() {
        let transport = FakeTransport::new().respond_json(
            Method::Post,
            "/recommendations",
            502,
            json!({ "detail": "GraphDB error" }),
        );
        let client = ApiClient::with_transport(Arc::new(transport));

        let err = client
            .post::<Value, _>("/recommendations", &json!({}))
            .expect_err("502 should fail");

        assert_eq!(err.to_string(), "POST /recommendations failed");
        assert_eq!(err.path(), "/recommendations");
        assert_eq!(err.status(), Some(502));
        assert_eq!(
            err.body(),
            Some(&ResponseBody::Json(json!({ "detail": "GraphDB error" })))
        );
    }

    #[test]
    fn non_success_status_keeps_raw_text_body() {
        let transport =
            FakeTransport::new().respond_text(Method::Get, "/meta/phases", 500, "upstream down");
        let client = ApiClient::with_transport(Arc::new(transport));

        let err = client
            .get_list::<Value>("/meta/phases")
            .expect_err("500 should fail");
        assert_eq!(
            err.body(),
            Some(&ResponseBody::Text("upstream down".to_string()))
        );
    }

    #[test]
    fn success_with_text_body_is_returned_when_caller_accepts_any_value() {
        let transport = FakeTransport::new().respond_text(Method::Post, "/health", 200, "ok");
        let client = ApiClient::with_transport(Arc::new(transport));

        let value: Value = client
            .post("/health", &json!({}))
            .expect("text body is recovered");
        assert_eq!(value, Value::String("ok".to_string()));
    }

    #[test]
    fn transport_failure_becomes_network_error() {
        let transport = FakeTransport::new().fail(Method::Get, "/meta/tasks", "connection refused");
        let client = ApiClient::with_transport(Arc::new(transport));

        let err = client
            .get_list::<Value>("/meta/tasks")
            .expect_err("network failure");
        assert_eq!(err.to_string(), "GET /meta/tasks failed (network error)");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn list_endpoints_reject_non_array_bodies() {
        let transport = FakeTransport::new().respond_json(
            Method::Get,
            "/meta/phases",
            200,
            json!({ "phases": [] }),
        );
        let client = ApiClient::with_transport(Arc::new(transport));

        let err = client
            .get_list::<OptionItem>("/meta/phases")
            .expect_err("object is not a list");
        assert!(matches!(err, ApiError::Decode { ref reason, .. } if reason == "expected a JSON array"));
    }

    #[test]
    fn post_sends_serialized_payload() {
        let transport = Arc::new(FakeTransport::new().respond_json(
            Method::Post,
            "/echo",
            201,
            json!([]),
        ));
        let client = ApiClient::with_transport(transport.clone());

        let rows: Vec<Value> = client
            .post_list("/echo", &json!({ "phase_iri": "P1" }))
            .expect("201 is a success");
        assert!(rows.is_empty());

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::Post);
        assert_eq!(calls[0].payload, Some(json!({ "phase_iri": "P1" })));
    }
}
