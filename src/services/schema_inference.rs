// Schema inference - turns a free-form app description into a GenerationRequest via an LLM

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use crate::error::{AppError, AppResult};
use crate::schema::GenerationRequest;

pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Provider settings handed to the adapter at construction
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Resolved provider endpoint and key
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_url: String,
}

impl InferenceConfig {
    fn credentials(&self) -> Option<Credentials> {
        match (&self.api_key, &self.api_url) {
            (Some(api_key), Some(api_url)) if !api_key.is_empty() && !api_url.is_empty() => Some(Credentials {
                api_key: api_key.clone(),
                api_url: api_url.clone(),
            }),
            _ => None,
        }
    }
}

/// One request/response exchange with a text-completion provider.
/// Returns the provider's raw reply envelope.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, credentials: &Credentials, payload: &Value) -> AppResult<Value>;
}

/// Gemini `generateContent` client over reqwest
pub struct GeminiClient {
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, credentials: &Credentials, payload: &Value) -> AppResult<Value> {
        let response = self
            .http_client
            .post(&credentials.api_url)
            .header("x-goog-api-key", &credentials.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::TransportError {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TransportError {
                status: Some(status.as_u16()),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::DecodeError(format!("Provider reply is not JSON: {}", e)))
    }
}

/// Adapter from free text to a validated schema. Performs no retries.
#[derive(Clone)]
pub struct SchemaInference {
    client: Arc<dyn CompletionClient>,
    config: InferenceConfig,
}

impl SchemaInference {
    pub fn new(client: Arc<dyn CompletionClient>, config: InferenceConfig) -> Self {
        Self { client, config }
    }

    /// Adapter backed by the Gemini HTTP client
    pub fn gemini(config: InferenceConfig) -> AppResult<Self> {
        let client = GeminiClient::new(config.timeout)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    pub async fn infer(&self, text: &str) -> AppResult<GenerationRequest> {
        let credentials = self.config.credentials().ok_or_else(|| {
            AppError::ConfigurationError("LLM_API_KEY or LLM_API_URL is not set".to_string())
        })?;

        let payload = json!({
            "contents": [{ "parts": [{ "text": build_prompt(text) }] }]
        });

        info!("Requesting schema inference ({} chars of input)", text.len());
        let envelope = self.client.complete(&credentials, &payload).await?;
        debug!("Provider envelope: {}", envelope);

        decode_envelope(&envelope).map_err(|e| {
            warn!("Failed to decode LLM reply: {}", e);
            e
        })
    }
}

/// Fixed instruction template with the user's text embedded verbatim
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"Convert the following request into a JSON structure for API generation.
The JSON must strictly follow the format: {{ "entities": [ {{ "name": "...", "fields": [ {{ "name": "...", "type": "..." }} ] }} ] }}.
Use only the following field types: str, int, bool, float.
Entity names must be singular and CamelCase (for example, UserStory, BlogPost).

Request text: "{text}"

Your answer must be ONLY the JSON object, without any explanations, comments or markdown wrapping such as ```json ... ```."#
    )
}

/// Pull the generated text out of the provider envelope and validate it
pub fn decode_envelope(envelope: &Value) -> AppResult<GenerationRequest> {
    let text = envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::DecodeError("Reply envelope has no candidates[0].content.parts[0].text".to_string())
        })?;

    let stripped = strip_code_fence(text);
    let value: Value = serde_json::from_str(stripped)
        .map_err(|e| AppError::DecodeError(format!("Could not parse schema from LLM response: {}", e)))?;

    GenerationRequest::from_value(value).map_err(|e| match e {
        AppError::SchemaValidationError(msg) => {
            AppError::DecodeError(format!("Could not validate schema from LLM response: {}", msg))
        }
        other => other,
    })
}

/// Remove a surrounding markdown fence, matched structurally: an opening
/// ``` with an optional info string on its own line, and a closing ```.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = after_open.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the info string (`json`, `JSON`, ...) up to the first line break
    let body = match inner.find('\n') {
        Some(newline) if inner[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &inner[newline + 1..]
        }
        _ => inner.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;

    /// Replays a canned provider result and records each call
    struct MockClient {
        reply: Mutex<Option<AppResult<Value>>>,
        calls: AtomicUsize,
        last_payload: Mutex<Option<Value>>,
    }

    impl MockClient {
        fn replying(reply: AppResult<Value>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                calls: AtomicUsize::new(0),
                last_payload: Mutex::new(None),
            })
        }

        fn with_text(text: &str) -> Arc<Self> {
            Self::replying(Ok(json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            })))
        }
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(&self, _credentials: &Credentials, payload: &Value) -> AppResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_payload.lock().unwrap() = Some(payload.clone());
            self.reply.lock().unwrap().take().expect("mock called twice")
        }
    }

    fn configured() -> InferenceConfig {
        InferenceConfig {
            api_key: Some("test-key".to_string()),
            api_url: Some("http://llm.invalid/v1/generate".to_string()),
            ..InferenceConfig::default()
        }
    }

    #[tokio::test]
    async fn test_infer_parses_reply() {
        let client = MockClient::with_text(
            r#"{"entities":[{"name":"Post","fields":[{"name":"title","type":"str"}]}]}"#,
        );
        let inference = SchemaInference::new(client.clone(), configured());

        let request = inference.infer("a blog with posts").await.unwrap();
        assert_eq!(request.entities[0].name, "Post");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        let payload = client.last_payload.lock().unwrap().clone().unwrap();
        let prompt = payload["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Request text: \"a blog with posts\""));
    }

    #[tokio::test]
    async fn test_infer_accepts_fenced_reply() {
        let client = MockClient::with_text("```json\n{\"entities\": []}\n```");
        let inference = SchemaInference::new(client, configured());
        let request = inference.infer("nothing").await.unwrap();
        assert!(request.entities.is_empty());
    }

    #[tokio::test]
    async fn test_missing_configuration_makes_no_calls() {
        let client = MockClient::with_text("{}");
        let config = InferenceConfig {
            api_url: None,
            ..configured()
        };
        let inference = SchemaInference::new(client.clone(), config);

        let err = inference.infer("anything").await.unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert!(!inference.is_configured());
    }

    #[tokio::test]
    async fn test_transport_error_keeps_status() {
        let client = MockClient::replying(Err(AppError::TransportError {
            status: Some(429),
            body: "quota exceeded".to_string(),
        }));
        let inference = SchemaInference::new(client, configured());

        let err = inference.infer("anything").await.unwrap_err();
        assert!(matches!(err, AppError::TransportError { .. }));
        assert_eq!(err.upstream_status(), Some(429));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_decode_error() {
        let client = MockClient::with_text("not json");
        let inference = SchemaInference::new(client, configured());
        let err = inference.infer("anything").await.unwrap_err();
        assert!(matches!(err, AppError::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_invalid_schema_reply_is_decode_error() {
        let client = MockClient::with_text(r#"{"entities":[{"name":"Post","fields":[{"name":"x","type":"date"}]}]}"#);
        let inference = SchemaInference::new(client, configured());
        let err = inference.infer("anything").await.unwrap_err();
        assert!(matches!(err, AppError::DecodeError(_)));
    }

    /// Serve `router` on an ephemeral local port and return its `/generate` URL
    async fn serve(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/generate", addr)
    }

    fn local_config(api_url: String) -> InferenceConfig {
        InferenceConfig {
            api_url: Some(api_url),
            timeout: Duration::from_secs(5),
            ..configured()
        }
    }

    #[tokio::test]
    async fn test_gemini_non_success_status_is_transport_error() {
        let router = axum::Router::new().route(
            "/generate",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        );
        let inference = SchemaInference::gemini(local_config(serve(router).await)).unwrap();

        let err = inference.infer("anything").await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
        match err {
            AppError::TransportError { body, .. } => assert_eq!(body, "overloaded"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_gemini_sends_key_and_payload() {
        let router = axum::Router::new().route(
            "/generate",
            post(|headers: HeaderMap, axum::Json(body): axum::Json<Value>| async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                axum::Json(json!({ "key": key, "payload": body }))
            }),
        );
        let config = local_config(serve(router).await);
        let credentials = config.credentials().unwrap();
        let client = GeminiClient::new(config.timeout).unwrap();

        let payload = json!({ "contents": [{ "parts": [{ "text": "hi" }] }] });
        let reply = client.complete(&credentials, &payload).await.unwrap();
        assert_eq!(reply["key"], "test-key");
        assert_eq!(reply["payload"], payload);
    }

    #[tokio::test]
    async fn test_gemini_success_with_non_json_body_is_decode_error() {
        let router = axum::Router::new().route("/generate", post(|| async { "definitely not json" }));
        let inference = SchemaInference::gemini(local_config(serve(router).await)).unwrap();

        let err = inference.infer("anything").await.unwrap_err();
        assert!(matches!(err, AppError::DecodeError(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_gemini_end_to_end() {
        let router = axum::Router::new().route(
            "/generate",
            post(|| async {
                axum::Json(json!({
                    "candidates": [{ "content": { "parts": [{
                        "text": "{\"entities\": [{\"name\": \"Note\", \"fields\": []}]}"
                    }] } }]
                }))
            }),
        );
        let inference = SchemaInference::gemini(local_config(serve(router).await)).unwrap();

        let request = inference.infer("notes").await.unwrap();
        assert_eq!(request.entities[0].name, "Note");
    }

    #[test]
    fn test_malformed_envelope() {
        for envelope in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"content": {"parts": [{}]}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": 7}]}}]}),
        ] {
            assert!(matches!(decode_envelope(&envelope), Err(AppError::DecodeError(_))));
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  ```JSON\n{\"a\": 1}```  "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json {\"a\": 1} ```"), "{\"a\": 1}");
        // Unterminated fence is left alone
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "```json\n{\"a\": 1}");
    }
}
