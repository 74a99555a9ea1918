//! OpenAI-compatible chat backend.
//!
//! Speaks the `/chat/completions` wire format, which several hosted and
//! self-hosted endpoints accept. Streaming uses SSE with incremental
//! content deltas. Quota exhaustion is detected from both the HTTP status
//! and the error body so the caller can fall back instead of failing.

use async_trait::async_trait;
use breedbox_config::LlmConfig;
use breedbox_core::chat::{ChatClient, ChatMessage, ChatRole, FragmentStream};
use breedbox_core::error::ChatError;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Substrings the API uses to signal an exhausted billing quota. A 429 can
/// also mean plain rate limiting, but for this tool both get the same
/// treatment: stop calling the model and fall back.
const QUOTA_MARKERS: [&str; 2] = ["insufficient_quota", "You exceeded your current quota"];

/// Client for OpenAI-compatible chat completion APIs.
#[derive(Debug)]
pub struct OpenAiChatClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiChatClient {
    /// Build a client from config. Fails with `NotConfigured` when no API
    /// key is present so callers can install a stub instead.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = match &config.api_key {
            Some(key) if !key.trim().is_empty() => key.clone(),
            _ => return Err(ChatError::NotConfigured("no API key set".to_string())),
        };
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        })
    }

    fn to_api_messages(messages: &[ChatMessage]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    ChatRole::System => "system",
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                };
                serde_json::json!({ "role": role, "content": m.content })
            })
            .collect()
    }

    fn request_body(&self, messages: &[ChatMessage], stream: bool) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(messages),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": stream,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Map an HTTP failure to the matching chat error. Quota markers win over
/// the status code because some endpoints report exhausted quota as 429
/// and others as 200 with an error body mid-stream.
fn classify_failure(status: u16, body: &str) -> ChatError {
    if QUOTA_MARKERS.iter().any(|marker| body.contains(marker)) || status == 429 {
        return ChatError::QuotaExceeded;
    }
    if status == 401 || status == 403 {
        return ChatError::NotConfigured("API key rejected by the endpoint".to_string());
    }
    ChatError::Transient(format!("status {status}: {body}"))
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(messages, false))
            .send()
            .await
            .map_err(|e| ChatError::Transient(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!("Chat completion failed with status {status}");
            return Err(classify_failure(status, &body));
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Transient(format!("invalid response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ChatError::Transient("No choices in response".to_string()))
    }

    async fn stream(&self, messages: &[ChatMessage]) -> Result<FragmentStream, ChatError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "text/event-stream")
            .json(&self.request_body(messages, true))
            .send()
            .await
            .map_err(|e| ChatError::Transient(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!("Chat stream failed with status {status}");
            return Err(classify_failure(status, &body));
        }

        let (tx, rx) = mpsc::channel(64);
        let mut byte_stream = response.bytes_stream();

        tokio::spawn(async move {
            let mut buffer = String::new();
            while let Some(chunk) = byte_stream.next().await {
                let chunk = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx
                            .send(Err(ChatError::Transient(format!("stream interrupted: {e}"))))
                            .await;
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(newline) = buffer.find('\n') {
                    let line = buffer[..newline].trim_end_matches('\r').to_string();
                    buffer.drain(..=newline);

                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }
                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        return;
                    }

                    match serde_json::from_str::<StreamResponse>(data) {
                        Ok(parsed) => {
                            if let Some(error) = parsed.error {
                                let _ = tx.send(Err(classify_failure(200, &error.message))).await;
                                return;
                            }
                            for choice in &parsed.choices {
                                if let Some(content) = &choice.delta.content {
                                    if !content.is_empty()
                                        && tx.send(Ok(content.clone())).await.is_err()
                                    {
                                        return;
                                    }
                                }
                            }
                        }
                        Err(_) => {
                            trace!("Ignoring unparseable SSE chunk");
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> OpenAiChatClient {
        OpenAiChatClient::from_config(&LlmConfig {
            api_key: Some("sk-test".into()),
            base_url: "https://api.example.com/v1/".into(),
            model: "gpt-5-nano".into(),
            temperature: 0.4,
            max_tokens: 256,
        })
        .unwrap()
    }

    #[test]
    fn missing_key_is_not_configured() {
        let err = OpenAiChatClient::from_config(&LlmConfig::default()).unwrap_err();
        assert!(matches!(err, ChatError::NotConfigured(_)));

        let err = OpenAiChatClient::from_config(&LlmConfig {
            api_key: Some("   ".into()),
            ..LlmConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ChatError::NotConfigured(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = configured();
        assert_eq!(client.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn status_429_is_quota() {
        assert!(matches!(classify_failure(429, "rate limited"), ChatError::QuotaExceeded));
    }

    #[test]
    fn quota_marker_in_body_is_quota_even_on_other_status() {
        let body = r#"{"error":{"message":"You exceeded your current quota, please check your plan"}}"#;
        assert!(matches!(classify_failure(400, body), ChatError::QuotaExceeded));
        assert!(matches!(
            classify_failure(200, "insufficient_quota"),
            ChatError::QuotaExceeded
        ));
    }

    #[test]
    fn auth_failures_map_to_not_configured() {
        assert!(matches!(classify_failure(401, "bad key"), ChatError::NotConfigured(_)));
        assert!(matches!(classify_failure(403, "forbidden"), ChatError::NotConfigured(_)));
    }

    #[test]
    fn other_failures_are_transient() {
        let err = classify_failure(500, "internal error");
        match err {
            ChatError::Transient(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("internal error"));
            }
            other => panic!("expected transient, got {other:?}"),
        }
    }

    #[test]
    fn roles_convert_to_wire_names() {
        let messages = vec![
            ChatMessage::system("be helpful"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        let api = OpenAiChatClient::to_api_messages(&messages);
        assert_eq!(api[0]["role"], "system");
        assert_eq!(api[1]["role"], "user");
        assert_eq!(api[2]["role"], "assistant");
        assert_eq!(api[1]["content"], "hi");
    }

    #[test]
    fn request_body_carries_model_and_stream_flag() {
        let client = configured();
        let body = client.request_body(&[ChatMessage::user("hi")], true);
        assert_eq!(body["model"], "gpt-5-nano");
        assert_eq!(body["stream"], true);
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn stream_chunk_parses_content_delta() {
        let data = r#"{"choices":[{"delta":{"content":"Hel"}}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.error.is_none());
        assert_eq!(parsed.choices[0].delta.content.as_deref(), Some("Hel"));
    }

    #[test]
    fn stream_chunk_parses_embedded_error() {
        let data = r#"{"error":{"message":"insufficient_quota"}}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        let message = parsed.error.unwrap().message;
        assert!(matches!(classify_failure(200, &message), ChatError::QuotaExceeded));
    }

    #[test]
    fn stream_chunk_without_content_yields_nothing() {
        let data = r#"{"choices":[{"delta":{}}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices[0].delta.content.is_none());
    }
}
