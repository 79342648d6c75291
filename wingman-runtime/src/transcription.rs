use async_trait::async_trait;
use wingman_core::{AudioClip, LanguageTag, SessionSettings};
use wingman_engine::traits::TranscriptionService;
use wingman_providers::parse::parse_transcription;
use wingman_providers::runtime::execute;
use wingman_providers::transcription::{TranscriptionConfig, build_transcription_request};

/// Whisper-style `/audio/transcriptions` client.
#[derive(Clone)]
pub struct RemoteTranscriber {
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for RemoteTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTranscriber")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl RemoteTranscriber {
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
            &settings.transcription_model,
        )
    }
}

#[async_trait]
impl TranscriptionService for RemoteTranscriber {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        language: &LanguageTag,
    ) -> anyhow::Result<String> {
        let cfg = TranscriptionConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            language_hint: Some(language.primary().to_string()),
        };
        let req = build_transcription_request(&cfg, clip);
        let resp = execute(&req).await?;
        if !resp.is_success() {
            return Err(anyhow::anyhow!(
                "transcription request failed: status={} body={}",
                resp.status,
                String::from_utf8_lossy(&resp.body)
            ));
        }
        parse_transcription(&resp.body)
    }
}
