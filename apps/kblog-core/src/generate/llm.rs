use crate::config::GenerationConfig;
use crate::error::{GenerateError, GenerationError};
use crate::generate::types::Conversation;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Chat-completion client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    http: Client,
    cfg: GenerationConfig,
}

impl CompletionClient {
    pub fn new(http: Client, cfg: GenerationConfig) -> Self { Self { http, cfg } }

    pub fn model(&self) -> &str { &self.cfg.model }

    pub fn has_credential(&self) -> bool { self.credential().is_some() }

    fn credential(&self) -> Option<&str> {
        self.cfg.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.cfg.base_url.trim_end_matches('/'))
    }

    /// Sends the conversation and returns the first choice's text.
    pub async fn complete(&self, conversation: Conversation) -> Result<String, GenerateError> {
        #[derive(Deserialize)]
        struct RespMessage { content: Option<String> }
        #[derive(Deserialize)]
        struct Choice { message: Option<RespMessage> }
        #[derive(Deserialize)]
        struct Resp { #[serde(default)] choices: Vec<Choice> }

        let key = self.credential().ok_or(GenerateError::MissingCredential)?;
        let body = serde_json::json!({
            "model": self.cfg.model,
            "messages": conversation.into_messages(),
            "temperature": self.cfg.temperature,
            "max_tokens": self.cfg.max_tokens,
        });
        let mut req = self.http.post(self.endpoint()).bearer_auth(key).json(&body);
        if let Some(secs) = self.cfg.timeout_secs {
            req = req.timeout(Duration::from_secs(secs));
        }
        let resp = req.send().await.map_err(|e| GenerationError::Provider(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status, &txt).into());
        }
        let v: Resp = resp.json().await.map_err(|e| GenerationError::Provider(format!("decoding completion: {}", e)))?;
        let content = v.choices.into_iter().next().and_then(|c| c.message).and_then(|m| m.content).unwrap_or_default();
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion.into());
        }
        Ok(content)
    }
}

/// Maps a provider error response onto the auth / quota / generic split.
pub fn classify_failure(status: StatusCode, body: &str) -> GenerationError {
    let message = provider_message(body);
    let lower = message.to_ascii_lowercase();
    let detail = format!("http {}: {}", status.as_u16(), message);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || lower.contains("api key") {
        return GenerationError::InvalidCredential(detail);
    }
    if status == StatusCode::TOO_MANY_REQUESTS
        || lower.contains("quota")
        || lower.contains("rate limit")
        || lower.contains("rate_limit")
    {
        return GenerationError::QuotaExceeded(detail);
    }
    GenerationError::Provider(detail)
}

/// `error.message` from an OpenAI-style error body, else a truncated copy of the body.
fn provider_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(m) = v.pointer("/error/message").and_then(|m| m.as_str()) {
            return m.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > 400 {
        format!("{}…", trimmed.chars().take(400).collect::<String>())
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_decide_first() {
        assert!(matches!(classify_failure(StatusCode::UNAUTHORIZED, ""), GenerationError::InvalidCredential(_)));
        assert!(matches!(classify_failure(StatusCode::TOO_MANY_REQUESTS, ""), GenerationError::QuotaExceeded(_)));
        assert!(matches!(classify_failure(StatusCode::BAD_GATEWAY, "upstream"), GenerationError::Provider(_)));
    }

    #[test]
    fn message_substrings_are_recognised() {
        let body = r#"{"error":{"message":"Incorrect API key provided: sk-****","type":"invalid_request_error"}}"#;
        assert!(matches!(classify_failure(StatusCode::BAD_REQUEST, body), GenerationError::InvalidCredential(_)));
        let body = r#"{"error":{"message":"You exceeded your current quota, please check your plan","type":"insufficient_quota"}}"#;
        assert!(matches!(classify_failure(StatusCode::BAD_REQUEST, body), GenerationError::QuotaExceeded(_)));
        let body = r#"{"error":{"message":"Rate limit reached for gpt-4o-mini"}}"#;
        assert!(matches!(classify_failure(StatusCode::SERVICE_UNAVAILABLE, body), GenerationError::QuotaExceeded(_)));
    }

    #[test]
    fn generic_word_containing_rate_is_not_quota() {
        let body = r#"{"error":{"message":"failed to generate"}}"#;
        assert!(matches!(classify_failure(StatusCode::INTERNAL_SERVER_ERROR, body), GenerationError::Provider(_)));
    }

    #[test]
    fn long_plain_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let GenerationError::Provider(detail) = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, &body) else {
            panic!("expected provider error");
        };
        assert!(detail.starts_with("http 500: "));
        assert!(detail.ends_with('…'));
        assert!(detail.chars().count() < 450);
    }

    #[tokio::test]
    async fn missing_key_fails_without_a_request() {
        let cfg = GenerationConfig { base_url: "http://127.0.0.1:9".into(), api_key: Some("  ".into()), ..GenerationConfig::default() };
        let client = CompletionClient::new(Client::new(), cfg);
        assert!(!client.has_credential());
        let err = client.complete(Conversation::new("s", "u")).await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingCredential));
    }
}
