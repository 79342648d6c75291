use crate::request::{Body, HttpRequest, join_url};
use serde_json::json;
use wingman_core::ChatMessage;

#[derive(Clone, PartialEq)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// JSON body for `POST {base}/chat/completions` with the system and user
/// messages plus the answer length and sampling caps.
pub fn build_chat_completions_request(
    cfg: &CompletionConfig,
    messages: &[ChatMessage],
) -> HttpRequest {
    let payload = json!({
        "model": cfg.model,
        "messages": messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect::<Vec<_>>(),
        "max_tokens": cfg.max_tokens,
        "temperature": cfg.temperature,
    });

    HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, "/chat/completions"),
        headers: vec![
            ("Content-Type".into(), "application/json".into()),
            ("Authorization".into(), format!("Bearer {}", cfg.api_key)),
        ],
        body: Body::Json(payload.to_string()),
    }
}
