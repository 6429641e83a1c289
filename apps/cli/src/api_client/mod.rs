//! HTTP client for the AI backend.
//!
//! This is the only module that talks to the network. Each call makes
//! exactly one attempt: there is no retry loop here, so a failure surfaces
//! immediately and the user decides whether to try again.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Normalized failure for any backend call. Raw transport errors never reach
/// callers directly; the `Display` text is safe to put in front of the user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: connect, timeout, TLS, or an interrupted body.
    #[error("Could not reach the AI backend: {0}")]
    Transport(reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    #[error("AI backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The backend answered 200 but the body was not the expected shape.
    #[error("Unexpected reply from the AI backend: {0}")]
    Decode(reqwest::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Response bodies
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub reply: Option<String>,
}

/// Body of `POST /api/uploadResume`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    /// ATS score as reported by the backend. Tolerates fractional JSON
    /// numbers; the normalizer rounds and clamps into `[0, 100]`.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub details: Option<BTreeMap<String, String>>,
    /// Rewritten resume text the backend offers alongside a low score.
    #[serde(default, rename = "improvedResume")]
    pub improved_resume: Option<String>,
}

/// Body of `POST /api/generateResume`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub resume: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Backend boundary
// ────────────────────────────────────────────────────────────────────────────

/// Boundary to the remote AI backend. The session store depends on this
/// trait rather than on the concrete client, so tests can drive it with
/// scripted implementations.
#[async_trait]
pub trait AiBackend: Send + Sync {
    async fn chat(&self, message: &str) -> Result<ChatResponse, ApiError>;

    async fn analyze_resume(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError>;

    async fn generate_resume(&self, prompt: &str) -> Result<GenerateResponse, ApiError>;
}

/// `reqwest`-backed implementation used by the real CLI.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` should include the `/api` prefix, e.g.
    /// `http://localhost:5000/api`. A `timeout` of `None` keeps the
    /// transport default (no overall deadline).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().expect("Failed to build HTTP client"),
            base_url: trim_trailing_slash(base_url.into()),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        decode(response).await
    }
}

#[async_trait]
impl AiBackend for ApiClient {
    async fn chat(&self, message: &str) -> Result<ChatResponse, ApiError> {
        debug!(chars = message.len(), "sending chat message");
        self.post_json("chat", &json!({ "message": message })).await
    }

    async fn analyze_resume(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        debug!(file = file_name, bytes = bytes.len(), "uploading resume");
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())
            .map_err(ApiError::Transport)?;
        let form = Form::new().part("resume", part);
        let response = self
            .client
            .post(self.endpoint("uploadResume"))
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        decode(response).await
    }

    async fn generate_resume(&self, prompt: &str) -> Result<GenerateResponse, ApiError> {
        debug!(chars = prompt.len(), "requesting resume generation");
        self.post_json("generateResume", &json!({ "prompt": prompt }))
            .await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(response).await);
    }
    response.json::<T>().await.map_err(ApiError::Decode)
}

/// Builds a `Status` error from a non-success response, pulling the message
/// out of an `{"error": ...}` or `{"message": ...}` body when one is there.
async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error.or(parsed.message))
        .unwrap_or_else(|| {
            if body.is_empty() {
                "no response body".to_string()
            } else {
                body
            }
        });
    ApiError::Status { status, message }
}

fn trim_trailing_slash(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_deserializes() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"success": true, "reply": "Hello!"}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.reply.as_deref(), Some("Hello!"));
    }

    #[test]
    fn test_chat_response_tolerates_missing_reply() {
        let response: ChatResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert!(response.reply.is_none());
    }

    #[test]
    fn test_upload_response_deserializes_full_body() {
        let body = r#"{
            "success": true,
            "score": 85,
            "summary": "Solid backend resume.",
            "details": {"strengths": "Rust, SQL"},
            "improvedResume": "JANE DOE\nBackend Engineer"
        }"#;
        let response: UploadResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.score, Some(85.0));
        assert_eq!(response.summary.as_deref(), Some("Solid backend resume."));
        assert_eq!(
            response.details.unwrap().get("strengths").map(String::as_str),
            Some("Rust, SQL")
        );
        assert!(response.improved_resume.unwrap().starts_with("JANE DOE"));
    }

    #[test]
    fn test_upload_response_tolerates_minimal_body() {
        let response: UploadResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert!(response.score.is_none());
        assert!(response.summary.is_none());
        assert!(response.details.is_none());
        assert!(response.improved_resume.is_none());
    }

    #[test]
    fn test_upload_response_accepts_fractional_score() {
        let response: UploadResponse =
            serde_json::from_str(r#"{"success": true, "score": 85.4}"#).unwrap();
        assert_eq!(response.score, Some(85.4));
    }

    #[test]
    fn test_generate_response_tolerates_missing_resume() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.resume.is_none());
    }

    #[test]
    fn test_endpoint_join_strips_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/api/", None);
        assert_eq!(client.endpoint("chat"), "http://localhost:5000/api/chat");
    }

    #[test]
    fn test_status_error_display_is_user_readable() {
        let error = ApiError::Status {
            status: 503,
            message: "model overloaded".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "AI backend returned 503: model overloaded"
        );
    }
}
