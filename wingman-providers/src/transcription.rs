use crate::multipart::MultipartForm;
use crate::request::{Body, HttpRequest, join_url};
use wingman_core::AudioClip;

#[derive(Clone, PartialEq, Eq)]
pub struct TranscriptionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Two-letter hint, e.g. `pt`. Skipped when empty.
    pub language_hint: Option<String>,
}

impl std::fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("language_hint", &self.language_hint)
            .finish()
    }
}

/// Multipart upload for `POST {base}/audio/transcriptions`: the clip bytes
/// under `file`, the model identifier, and the optional language hint.
pub fn build_transcription_request(cfg: &TranscriptionConfig, clip: &AudioClip) -> HttpRequest {
    let mut form = MultipartForm::new();
    form.file("file", &clip.file_name(), &clip.media_type, &clip.bytes);
    form.field("model", &cfg.model);
    if let Some(lang) = cfg.language_hint.as_ref().filter(|s| !s.trim().is_empty()) {
        form.field("language", lang);
    }

    let content_type = form.content_type();
    let (boundary, bytes) = form.finish();

    HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, "/audio/transcriptions"),
        headers: vec![
            ("Content-Type".into(), content_type),
            ("Accept".into(), "application/json".into()),
            ("Authorization".into(), format!("Bearer {}", cfg.api_key)),
        ],
        body: Body::MultipartFormData { boundary, bytes },
    }
}
