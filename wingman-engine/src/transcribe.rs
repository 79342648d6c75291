//! Clip transcription with graceful degradation.
//!
//! Strategies run in order, each tried at most once per clip: the remote
//! endpoint, then the on-device recognizer, then a canned question. The
//! chain never fails outright, so a session with a dead network keeps
//! moving; the utterance origin records how far it had to degrade.

use std::sync::Arc;
use std::time::Duration;

use wingman_core::{AudioClip, LanguageTag, SIMULATED_QUESTIONS, TranscriptOrigin, pick_seeded};

use crate::traits::{SpeechRecognizer, TranscriptionService};

/// How long the on-device fallback gets before the chain moves on.
pub const ON_DEVICE_WINDOW: Duration = Duration::from_secs(10);

/// One transcription strategy, in the order the chain tries them.
pub enum TranscribeStrategy {
    Remote(Arc<dyn TranscriptionService>),
    OnDevice(Arc<dyn SpeechRecognizer>),
    Simulated,
}

impl std::fmt::Debug for TranscribeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Remote(_) => "Remote",
            Self::OnDevice(_) => "OnDevice",
            Self::Simulated => "Simulated",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscribedUtterance {
    pub text: String,
    pub origin: TranscriptOrigin,
}

/// Ordered strategy chain over a clip.
pub struct FallbackTranscriber {
    strategies: Vec<TranscribeStrategy>,
}

impl FallbackTranscriber {
    pub fn new(strategies: Vec<TranscribeStrategy>) -> Self {
        Self { strategies }
    }

    /// The standard chain: remote when configured, on-device when present,
    /// and always the simulated terminal step.
    pub fn standard(
        remote: Option<Arc<dyn TranscriptionService>>,
        recognizer: Option<Arc<dyn SpeechRecognizer>>,
    ) -> Self {
        let mut strategies = Vec::new();
        if let Some(remote) = remote {
            strategies.push(TranscribeStrategy::Remote(remote));
        }
        if let Some(recognizer) = recognizer {
            strategies.push(TranscribeStrategy::OnDevice(recognizer));
        }
        strategies.push(TranscribeStrategy::Simulated);
        Self::new(strategies)
    }

    /// Transcribes the clip, degrading through the chain. Always yields an
    /// utterance; the origin tells the caller how much to trust it.
    pub async fn transcribe(
        &self,
        clip: &AudioClip,
        language: &LanguageTag,
    ) -> TranscribedUtterance {
        for strategy in &self.strategies {
            match strategy {
                TranscribeStrategy::Remote(service) => {
                    match service.transcribe(clip, language).await {
                        Ok(text) if !text.trim().is_empty() => {
                            return TranscribedUtterance {
                                text,
                                origin: TranscriptOrigin::Remote,
                            };
                        }
                        Ok(_) => log::warn!("remote transcription returned empty text"),
                        Err(err) => log::warn!("remote transcription failed: {err:#}"),
                    }
                }
                TranscribeStrategy::OnDevice(recognizer) => {
                    if !recognizer.is_available() {
                        continue;
                    }
                    match recognizer.recognize_once(language, ON_DEVICE_WINDOW).await {
                        Ok(text) if !text.trim().is_empty() => {
                            return TranscribedUtterance {
                                text,
                                origin: TranscriptOrigin::OnDevice,
                            };
                        }
                        Ok(_) => log::warn!("on-device recognition heard nothing"),
                        Err(err) => log::warn!("on-device recognition failed: {err:#}"),
                    }
                }
                TranscribeStrategy::Simulated => break,
            }
        }
        TranscribedUtterance {
            text: pick_seeded(SIMULATED_QUESTIONS).to_string(),
            origin: TranscriptOrigin::Synthetic,
        }
    }
}
