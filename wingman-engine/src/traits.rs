use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use wingman_core::{AudioClip, ChatMessage, LanguageTag};

/// One utterance from continuous on-device recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedUtterance {
    pub text: String,
    pub is_final: bool,
}

/// Remote speech-to-text over a whole clip.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip, language: &LanguageTag)
    -> anyhow::Result<String>;
}

/// Chat-completion backend that drafts answers.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<String>;
}

/// On-device speech recognition. Serves both as a transcription fallback and
/// as the live listener that picks interviewer questions out of the room.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the host actually has a recognizer. When false, callers skip
    /// this strategy instead of paying for a doomed attempt.
    fn is_available(&self) -> bool;

    /// Captures a single utterance, waiting at most `window`.
    async fn recognize_once(
        &self,
        language: &LanguageTag,
        window: Duration,
    ) -> anyhow::Result<String>;

    /// Starts continuous recognition. Utterances arrive on the returned
    /// channel until the receiver is dropped or the recognizer shuts down.
    fn start_continuous(
        &self,
        language: &LanguageTag,
    ) -> anyhow::Result<mpsc::Receiver<RecognizedUtterance>>;
}
