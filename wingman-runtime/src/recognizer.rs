//! On-device recognizer implementations.
//!
//! Desktop builds currently ship without a native speech stack, so the
//! default recognizer reports itself unavailable and the transcription chain
//! skips straight past it. [`ScriptedRecognizer`] replays a fixed utterance
//! feed for tests and the demo binary.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use wingman_core::LanguageTag;
use wingman_engine::traits::{RecognizedUtterance, SpeechRecognizer};

/// The absent recognizer. Keeps the seam honest on hosts with no speech
/// stack: `is_available` is false and every call fails loudly if reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecognizer;

#[async_trait]
impl SpeechRecognizer for NoRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognize_once(
        &self,
        _language: &LanguageTag,
        _window: Duration,
    ) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("no on-device recognizer on this host"))
    }

    fn start_continuous(
        &self,
        _language: &LanguageTag,
    ) -> anyhow::Result<mpsc::Receiver<RecognizedUtterance>> {
        Err(anyhow::anyhow!("no on-device recognizer on this host"))
    }
}

/// Recognizer that replays a scripted utterance feed and then goes quiet.
#[derive(Debug, Clone)]
pub struct ScriptedRecognizer {
    utterances: Vec<RecognizedUtterance>,
}

impl ScriptedRecognizer {
    pub fn new(utterances: Vec<RecognizedUtterance>) -> Self {
        Self { utterances }
    }

    /// Every line becomes one final utterance.
    pub fn from_lines(lines: &[&str]) -> Self {
        Self::new(
            lines
                .iter()
                .map(|line| RecognizedUtterance {
                    text: line.to_string(),
                    is_final: true,
                })
                .collect(),
        )
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    async fn recognize_once(
        &self,
        _language: &LanguageTag,
        _window: Duration,
    ) -> anyhow::Result<String> {
        self.utterances
            .iter()
            .find(|u| u.is_final)
            .map(|u| u.text.clone())
            .ok_or_else(|| anyhow::anyhow!("no utterance scripted"))
    }

    fn start_continuous(
        &self,
        _language: &LanguageTag,
    ) -> anyhow::Result<mpsc::Receiver<RecognizedUtterance>> {
        // Pre-filled channel: the sender drops here, so the receiver yields
        // the whole feed and then reports closure.
        let (tx, rx) = mpsc::channel(self.utterances.len().max(1));
        for utterance in &self.utterances {
            let _ = tx.try_send(utterance.clone());
        }
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_recognizer_reports_unavailable() {
        let recognizer = NoRecognizer;
        assert!(!recognizer.is_available());
        assert!(
            recognizer
                .recognize_once(&LanguageTag::new("en-US"), Duration::from_secs(1))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn scripted_feed_replays_and_closes() {
        let recognizer =
            ScriptedRecognizer::from_lines(&["Qual é sua experiência?", "Me conte mais."]);
        let mut rx = recognizer
            .start_continuous(&LanguageTag::new("pt-BR"))
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().text, "Qual é sua experiência?");
        assert_eq!(rx.recv().await.unwrap().text, "Me conte mais.");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn recognize_once_returns_the_first_final_utterance() {
        let recognizer = ScriptedRecognizer::new(vec![
            RecognizedUtterance {
                text: "parcial".into(),
                is_final: false,
            },
            RecognizedUtterance {
                text: "Como você trabalha?".into(),
                is_final: true,
            },
        ]);
        let text = recognizer
            .recognize_once(&LanguageTag::new("pt-BR"), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(text, "Como você trabalha?");
    }
}
