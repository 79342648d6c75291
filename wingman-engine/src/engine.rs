use std::future::Future;
use std::time::Instant;

use wingman_core::{AudioClip, SessionSettings, SpeakerRole, TranscriptEntry, markup};

use crate::session::{ExchangeResult, ExchangeStage, ExchangeTimings, ms};
use crate::suggest::SuggestionEngine;
use crate::transcribe::FallbackTranscriber;

const STAGE_TRANSCRIBING: &str = "transcribing";
const STAGE_SUGGESTING: &str = "suggesting";
const STAGE_DONE: &str = "done";
const STAGE_FAILED: &str = "failed";

/// Drives one captured clip through transcribe -> suggest and packages the
/// outcome for display.
pub struct InterviewEngine {
    transcriber: FallbackTranscriber,
    suggestions: SuggestionEngine,
}

impl InterviewEngine {
    pub fn new(transcriber: FallbackTranscriber, suggestions: SuggestionEngine) -> Self {
        Self {
            transcriber,
            suggestions,
        }
    }

    /// Runs the pipeline without progress reporting.
    pub async fn process_clip(
        &self,
        clip: &AudioClip,
        settings: &SessionSettings,
    ) -> ExchangeResult {
        self.process_clip_with_hook(clip, settings, |_stage| async {})
            .await
    }

    /// Same as `process_clip`, but emits a stage hook as the pipeline
    /// progresses. The hook feeds UI status lines and must be fast.
    pub async fn process_clip_with_hook<F, Fut>(
        &self,
        clip: &AudioClip,
        settings: &SessionSettings,
        on_stage: F,
    ) -> ExchangeResult
    where
        F: Fn(&'static str) -> Fut,
        Fut: Future<Output = ()>,
    {
        on_stage(STAGE_TRANSCRIBING).await;
        let t0 = Instant::now();
        let utterance = self.transcriber.transcribe(clip, &settings.language).await;
        let transcription_ms = ms(t0.elapsed());

        // The loopback clip carries the other side of the call, so an
        // utterance from it is always the interviewer speaking.
        let entry =
            TranscriptEntry::new(SpeakerRole::Interviewer, &utterance.text, utterance.origin);
        let entry_display = markup::format(&entry.text);

        let mut result = ExchangeResult {
            stage: ExchangeStage::Suggesting,
            stage_label: Some(STAGE_SUGGESTING.into()),
            entry,
            entry_display,
            suggestion: None,
            timings: ExchangeTimings {
                transcription_ms: Some(transcription_ms),
                suggestion_ms: None,
            },
            error: None,
        };
        on_stage(STAGE_SUGGESTING).await;

        let s0 = Instant::now();
        match self
            .suggestions
            .suggest(&result.entry.text, settings)
            .await
        {
            Ok(suggestion) => {
                result.timings.suggestion_ms = Some(ms(s0.elapsed()));
                result.suggestion = Some(suggestion);
                result.stage = ExchangeStage::Done;
                result.stage_label = Some(STAGE_DONE.into());
                on_stage(STAGE_DONE).await;
            }
            Err(err) => {
                result.stage = ExchangeStage::Failed;
                result.stage_label = Some(STAGE_FAILED.into());
                result.error = Some(err.to_string());
            }
        }
        result
    }

    /// Drafts an answer for a question that arrived as text, e.g. from the
    /// live recognizer, without a transcription leg.
    pub async fn suggest_for_question(
        &self,
        question: &str,
        settings: &SessionSettings,
    ) -> Result<wingman_core::SuggestionText, crate::suggest::SuggestError> {
        self.suggestions.suggest(question, settings).await
    }
}
