pub mod coach;
pub mod dashboard;
pub mod partner;
pub mod payments;
pub mod upload;

use reqwest::blocking::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Thin JSON-over-HTTPS client for the membership backend.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        }
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        debug!("GET {}", path);
        let req = self.authorized(self.client.get(self.url(path)));
        self.execute(path, req)
    }

    pub fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        debug!("POST {}", path);
        let req = self.authorized(self.client.post(self.url(path)).json(body));
        self.execute(path, req)
    }

    /// POST for operations that may charge the user.
    ///
    /// Each call gets its own `Idempotency-Key`. The key only lets the backend
    /// drop transport-level replays of this one request; a retry issued by
    /// the user is a new call with a new key and is not deduplicated.
    pub fn post_charging<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.charging_request(path, body);
        self.execute(path, req)
    }

    fn charging_request<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        let key = uuid::Uuid::new_v4().to_string();
        info!("POST {} (idempotency key {})", path, key);
        self.authorized(self.client.post(self.url(path)).json(body))
            .header("Idempotency-Key", key)
    }

    pub fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        debug!("PUT {}", path);
        let req = self.authorized(self.client.put(self.url(path)).json(body));
        self.execute(path, req)
    }

    pub fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::blocking::multipart::Form,
    ) -> ClientResult<T> {
        debug!("POST {} (multipart)", path);
        let req = self.authorized(self.client.post(self.url(path)).multipart(form));
        self.execute(path, req)
    }

    fn execute<T: DeserializeOwned>(&self, path: &str, req: RequestBuilder) -> ClientResult<T> {
        let resp = req.send()?;
        decode(path, resp)
    }
}

fn decode<T: DeserializeOwned>(path: &str, resp: Response) -> ClientResult<T> {
    let status = resp.status();
    let text = resp.text().unwrap_or_default();

    if !status.is_success() {
        return Err(ClientError::Http {
            status: status.as_u16(),
            message: envelope_message(&text),
        });
    }

    parse_body(path, &text)
}

/// Parse a success body into the expected resource shape.
pub fn parse_body<T: DeserializeOwned>(path: &str, text: &str) -> ClientResult<T> {
    serde_json::from_str(text).map_err(|e| ClientError::MalformedResponse {
        endpoint: path.to_string(),
        reason: e.to_string(),
    })
}

/// Pull a human-readable message out of a backend error body.
///
/// Accepts `{"message": ..}`, `{"error": ..}`, `{"error": {"message": ..}}`
/// and `{"errors": [{"msg"|"message": ..}]}`.
pub fn envelope_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let text = |v: &serde_json::Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(m) = json.get("message").and_then(text) {
        return Some(m);
    }
    if let Some(err) = json.get("error") {
        if let Some(m) = text(err) {
            return Some(m);
        }
        if let Some(m) = err.get("message").and_then(text) {
            return Some(m);
        }
    }
    json.get("errors")
        .and_then(|e| e.as_array())
        .and_then(|arr| arr.first())
        .and_then(|first| first.get("msg").or_else(|| first.get("message")))
        .and_then(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shapes() {
        assert_eq!(envelope_message(r#"{"message":"Plan not found"}"#).as_deref(), Some("Plan not found"));
        assert_eq!(envelope_message(r#"{"error":"Unauthorized"}"#).as_deref(), Some("Unauthorized"));
        assert_eq!(
            envelope_message(r#"{"error":{"message":"Card declined"}}"#).as_deref(),
            Some("Card declined")
        );
        assert_eq!(
            envelope_message(r#"{"errors":[{"msg":"plan is required"}]}"#).as_deref(),
            Some("plan is required")
        );
    }

    #[test]
    fn no_envelope() {
        assert_eq!(envelope_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(envelope_message(r#"{"message":""}"#), None);
        assert_eq!(envelope_message(""), None);
    }

    #[test]
    fn base_url_trailing_slash() {
        let c = ApiClient::new("https://api.example.org/", None);
        assert_eq!(c.url("/api/auth/dashboard"), "https://api.example.org/api/auth/dashboard");
    }

    #[test]
    fn charging_request_has_one_key_per_call() {
        let c = ApiClient::new("https://api.example.org", Some("tok".into()));
        let body = serde_json::json!({ "plan": "pro" });
        let key_of = |req: RequestBuilder| {
            let req = req.build().unwrap();
            assert_eq!(req.headers()["Authorization"], "Bearer tok");
            req.headers()["Idempotency-Key"].to_str().unwrap().to_string()
        };
        let first = key_of(c.charging_request("/api/coach/membership/renew", &body));
        let second = key_of(c.charging_request("/api/coach/membership/renew", &body));
        assert!(uuid::Uuid::parse_str(&first).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_body_is_typed() {
        let err = parse_body::<crate::models::CoachMembership>("/api/coach/membership", r#"{"plan":1}"#)
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { .. }));
    }
}
