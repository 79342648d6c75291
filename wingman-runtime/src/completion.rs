use async_trait::async_trait;
use wingman_core::{ANSWER_TEMPERATURE, ChatMessage, MAX_ANSWER_TOKENS, SessionSettings};
use wingman_engine::traits::CompletionService;
use wingman_providers::completions::{CompletionConfig, build_chat_completions_request};
use wingman_providers::parse::parse_chat_completion;
use wingman_providers::runtime::execute;

/// `/chat/completions` client with the interview answer caps baked in.
#[derive(Clone)]
pub struct RemoteCompleter {
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for RemoteCompleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCompleter")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl RemoteCompleter {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self::new(
            &settings.api_base_url,
            &settings.api_key,
            &settings.completion_model,
        )
    }
}

#[async_trait]
impl CompletionService for RemoteCompleter {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let cfg = CompletionConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_tokens: MAX_ANSWER_TOKENS,
            temperature: ANSWER_TEMPERATURE,
        };
        let req = build_chat_completions_request(&cfg, messages);
        let resp = execute(&req).await?;
        if !resp.is_success() {
            return Err(anyhow::anyhow!(
                "completion request failed: status={} body={}",
                resp.status,
                String::from_utf8_lossy(&resp.body)
            ));
        }
        parse_chat_completion(&resp.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn messages() -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system".into(),
                content: "You are a job interview assistant.".into(),
            },
            ChatMessage {
                role: "user".into(),
                content: "The interviewer asked: \"Why Rust?\"".into(),
            },
        ]
    }

    #[tokio::test]
    async fn completes_with_the_configured_model_and_caps() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 400,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"choices":[{"message":{"content":"Because of the type system."}}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let completer = RemoteCompleter::new(server.uri(), "sk-test", "gpt-3.5-turbo");
        let answer = completer.complete(&messages()).await.unwrap();
        assert_eq!(answer, "Because of the type system.");
    }

    #[tokio::test]
    async fn http_errors_carry_the_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let completer = RemoteCompleter::new(server.uri(), "sk-test", "gpt-3.5-turbo");
        let err = completer.complete(&messages()).await.unwrap_err();
        assert!(err.to_string().contains("status=429"));
    }
}
