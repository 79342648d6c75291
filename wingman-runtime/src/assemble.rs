//! Engine assembly from persisted settings.

use std::sync::Arc;

use wingman_core::SessionSettings;
use wingman_engine::engine::InterviewEngine;
use wingman_engine::suggest::SuggestionEngine;
use wingman_engine::traits::{SpeechRecognizer, TranscriptionService};
use wingman_engine::transcribe::FallbackTranscriber;

use crate::completion::RemoteCompleter;
use crate::transcription::RemoteTranscriber;

/// Wires the transcription chain and the drafting engine for one exchange.
/// The remote leg only joins the chain when an API key is configured; the
/// recognizer always joins and excuses itself via `is_available`.
pub fn build_engine_from_settings(
    settings: &SessionSettings,
    recognizer: Arc<dyn SpeechRecognizer>,
) -> InterviewEngine {
    let remote: Option<Arc<dyn TranscriptionService>> = settings.has_api_key().then(|| {
        Arc::new(RemoteTranscriber::from_settings(settings)) as Arc<dyn TranscriptionService>
    });
    let transcriber = FallbackTranscriber::standard(remote, Some(recognizer));
    let suggestions = SuggestionEngine::new(Arc::new(RemoteCompleter::from_settings(settings)));
    InterviewEngine::new(transcriber, suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::NoRecognizer;
    use wingman_core::{AudioClip, TranscriptOrigin};
    use wingman_engine::session::ExchangeStage;

    #[tokio::test]
    async fn default_settings_build_an_offline_capable_engine() {
        let settings = SessionSettings::default();
        let engine = build_engine_from_settings(&settings, Arc::new(NoRecognizer));

        let clip = AudioClip::new("audio/webm", vec![0; 200]);
        let result = engine.process_clip(&clip, &settings).await;

        // No key and no recognizer: the chain degrades to a canned question
        // and drafting refuses to run.
        assert_eq!(result.entry.origin, TranscriptOrigin::Synthetic);
        assert_eq!(result.stage, ExchangeStage::Failed);
        assert!(result.suggestion.is_none());
    }
}
