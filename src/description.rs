//! Client for the AI task-description function.

use serde::{Deserialize, Serialize};

const DEFAULT_FAILURE: &str = "Failed to generate description";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptionError {
    #[error("description endpoint is not configured")]
    NotConfigured,

    #[error("description request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Service(String),
}

#[derive(Serialize)]
struct DescriptionRequest<'a> {
    title: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct DescriptionReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DescriptionClient {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl DescriptionClient {
    pub fn new(endpoint: Option<String>) -> Self {
        DescriptionClient { http: reqwest::Client::new(), endpoint }
    }

    /// A client that fails every call with `NotConfigured`.
    pub fn disabled() -> Self {
        DescriptionClient::new(None)
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// POST `{ "title": .. }` and return the generated text. Anything but a
    /// 2xx reply with `success: true` and a non-empty description is an error.
    pub async fn generate(&self, title: &str) -> Result<String, DescriptionError> {
        let endpoint = self.endpoint.as_deref().ok_or(DescriptionError::NotConfigured)?;

        let response = self
            .http
            .post(endpoint)
            .json(&DescriptionRequest { title })
            .send()
            .await
            .map_err(|e| DescriptionError::Transport(e.to_string()))?;

        let status = response.status();
        // Error bodies are not always JSON; fall back to the default message.
        let reply = match response.json::<DescriptionReply>().await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(%status, error = %e, "description reply was not valid JSON");
                DescriptionReply::default()
            }
        };

        if !status.is_success() || !reply.success {
            let message = reply.error.unwrap_or_else(|| DEFAULT_FAILURE.to_string());
            tracing::warn!(%status, %message, "description service reported failure");
            return Err(DescriptionError::Service(message));
        }

        reply
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| DescriptionError::Service(DEFAULT_FAILURE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    /// Serve a single POST handler on an ephemeral port and return its URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/generate")
    }

    #[tokio::test]
    async fn returns_generated_text() {
        let url = serve(Router::new().route(
            "/generate",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "success": true, "description": format!("  Plan: {}  ", body["title"].as_str().unwrap()) }))
            }),
        ))
        .await;

        let client = DescriptionClient::new(Some(url));
        assert_eq!(client.generate("Ship v2").await.unwrap(), "Plan: Ship v2");
    }

    #[tokio::test]
    async fn service_error_message_is_surfaced() {
        let url = serve(Router::new().route(
            "/generate",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "error": "Title is required and must be a non-empty string" })),
                )
            }),
        ))
        .await;

        let err = DescriptionClient::new(Some(url)).generate("").await.unwrap_err();
        assert_eq!(err, DescriptionError::Service("Title is required and must be a non-empty string".into()));
    }

    #[tokio::test]
    async fn success_without_description_is_an_error() {
        let url = serve(Router::new().route("/generate", post(|| async { Json(json!({ "success": true })) }))).await;

        let err = DescriptionClient::new(Some(url)).generate("Anything").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate description");
    }

    #[tokio::test]
    async fn non_json_failure_uses_default_message() {
        let url = serve(Router::new().route(
            "/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;

        let err = DescriptionClient::new(Some(url)).generate("Anything").await.unwrap_err();
        assert_eq!(err, DescriptionError::Service("Failed to generate description".into()));
    }

    #[tokio::test]
    async fn malformed_success_reply_is_an_error() {
        let url = serve(Router::new().route("/generate", post(|| async { "<html>ok</html>" }))).await;

        let err = DescriptionClient::new(Some(url)).generate("Anything").await.unwrap_err();
        assert_eq!(err, DescriptionError::Service("Failed to generate description".into()));
    }

    #[tokio::test]
    async fn unconfigured_client_refuses() {
        let err = DescriptionClient::disabled().generate("Anything").await.unwrap_err();
        assert_eq!(err, DescriptionError::NotConfigured);
    }
}
