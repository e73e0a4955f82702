//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::response::is_falsy;
use super::{ApiError, ApiRequest, ApiResponse, Transport};
use crate::config::Config;

/// HTTP transport for the pet-management API.
///
/// No retries, no explicit timeout and no cancellation: a request that never
/// completes keeps the caller waiting.
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Create a transport for the given base URL
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a transport from the `[api]` config section
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(config.base_url(), &config.api.user_agent)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(&request.path);

        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        let code = status.as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::body(code, e.to_string()))?;

        debug!(status = code, body = %text, "Response received");

        if text.trim().is_empty() {
            if status.is_success() {
                return Ok(ApiResponse::new(Some(code), Value::String(String::new())));
            }
            return Err(ApiError::EmptyFailure { status: code });
        }

        // Non-JSON bodies are kept verbatim as a string value
        let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text));
        if !status.is_success() && is_falsy(&body) {
            return Err(ApiError::EmptyFailure { status: code });
        }
        Ok(ApiResponse::new(Some(code), body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResponse {
        info!(method = %request.method, target = %request.target(), "Sending request");

        match self.execute(&request).await {
            Ok(response) => {
                if !response.is_success() {
                    info!(
                        status = response.status,
                        target = %request.target(),
                        "Server declined request"
                    );
                }
                response
            }
            Err(err) => {
                warn!(error = %err, target = %request.target(), "Request failed");
                ApiResponse::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(server.uri(), "petquest-test").unwrap()
    }

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let t = HttpTransport::new("http://localhost:1234/", "petquest-test").unwrap();
        assert_eq!(t.base_url(), "http://localhost:1234");
        assert_eq!(t.url_for("/signup"), "http://localhost:1234/signup");
    }

    #[tokio::test]
    async fn test_success_body_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/signup"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "username": "alice", "password": "p1" })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "message": "User created" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request =
            ApiRequest::post("/signup").with_body(json!({ "username": "alice", "password": "p1" }));
        let response = transport(&server).send(request).await;

        assert_eq!(response.status, Some(201));
        assert_eq!(response.display_text(), "User created");
    }

    #[tokio::test]
    async fn test_failure_body_is_ordinary_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pets"))
            .and(query_param("userId", "u1"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "message": "Admins only" })),
            )
            .mount(&server)
            .await;

        let response = transport(&server)
            .send(ApiRequest::get("/pets").with_query("userId", "u1"))
            .await;

        assert_eq!(response.status, Some(403));
        assert!(!response.is_success());
        assert_eq!(response.display_text(), "Admins only");
    }

    #[tokio::test]
    async fn test_empty_failure_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/pets/p1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let response = transport(&server).send(ApiRequest::delete("/pets/p1")).await;
        assert_eq!(response, ApiResponse::fallback());
    }

    #[tokio::test]
    async fn test_falsy_failure_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats/pets/count"))
            .respond_with(ResponseTemplate::new(500).set_body_string("null"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stats/users/ages"))
            .respond_with(ResponseTemplate::new(400).set_body_string("0"))
            .mount(&server)
            .await;

        let t = transport(&server);
        let response = t.send(ApiRequest::get("/stats/pets/count")).await;
        assert_eq!(response.display_text(), "Error");
        let response = t.send(ApiRequest::get("/stats/users/ages")).await;
        assert_eq!(response, ApiResponse::fallback());
    }

    #[tokio::test]
    async fn test_falsy_success_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats/pets/count"))
            .respond_with(ResponseTemplate::new(200).set_body_string("0"))
            .mount(&server)
            .await;

        let response = transport(&server)
            .send(ApiRequest::get("/stats/pets/count"))
            .await;
        assert_eq!(response.status, Some(200));
        assert_eq!(response.display_text(), "0");
    }

    #[tokio::test]
    async fn test_plain_text_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats/users/count"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let response = transport(&server)
            .send(ApiRequest::get("/stats/users/count"))
            .await;
        assert_eq!(response.body(), &Value::String("Not Found".to_string()));
        assert_eq!(response.display_text(), r#""Not Found""#);
    }

    #[tokio::test]
    async fn test_connection_failure_falls_back() {
        // Nothing listens on the discard port
        let t = HttpTransport::new("http://127.0.0.1:9", "petquest-test").unwrap();
        let response = t.send(ApiRequest::post("/logout")).await;
        assert_eq!(response.display_text(), "Error");
        assert_eq!(response.status, None);
    }
}
