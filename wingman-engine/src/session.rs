use serde::{Deserialize, Serialize};
use std::time::Duration;
use wingman_core::{SuggestionText, TranscriptEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeStage {
    Transcribing,
    Suggesting,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExchangeTimings {
    pub transcription_ms: Option<u64>,
    pub suggestion_ms: Option<u64>,
}

/// Outcome of one clip through the pipeline: the transcript entry that was
/// heard and, when drafting succeeded, the suggestion that goes with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResult {
    pub stage: ExchangeStage,

    // A stable string label for UI display.
    // This is intentionally not derived from `Debug`.
    pub stage_label: Option<String>,

    pub entry: TranscriptEntry,
    pub entry_display: String,
    pub suggestion: Option<SuggestionText>,
    pub timings: ExchangeTimings,
    pub error: Option<String>,
}

pub fn ms(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}
