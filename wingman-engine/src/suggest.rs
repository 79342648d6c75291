//! Answer drafting: prompt assembly, the completion call, cleanup, and the
//! canned fallback when the call fails.

use std::sync::Arc;

use thiserror::Error;
use wingman_core::{
    FALLBACK_NOTICE, FALLBACK_SUGGESTIONS, SessionSettings, SuggestionOrigin, SuggestionText,
    build_interview_prompt, clean_suggestion, markup, pick_seeded,
};

use crate::traits::CompletionService;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("chat API key is not configured")]
    NoApiKey,
}

/// Drafts answers for interviewer questions.
pub struct SuggestionEngine {
    completions: Arc<dyn CompletionService>,
}

impl SuggestionEngine {
    pub fn new(completions: Arc<dyn CompletionService>) -> Self {
        Self { completions }
    }

    /// Drafts an answer for `question`. A missing API key is the only hard
    /// error; request failures degrade to a canned fallback so the candidate
    /// is never left staring at nothing. Model answers are cleaned of labels
    /// and dismissal tails; canned fallbacks are shipped as written.
    pub async fn suggest(
        &self,
        question: &str,
        settings: &SessionSettings,
    ) -> Result<SuggestionText, SuggestError> {
        if !settings.has_api_key() {
            return Err(SuggestError::NoApiKey);
        }

        let prompt = build_interview_prompt(question, settings);
        match self.completions.complete(&prompt.messages).await {
            Ok(answer) => {
                let cleaned = clean_suggestion(&answer);
                let display = markup::format(&cleaned);
                Ok(SuggestionText {
                    raw: cleaned,
                    display,
                    origin: SuggestionOrigin::Model,
                })
            }
            Err(err) => {
                log::error!("completion request failed: {err:#}");
                let canned = pick_seeded(FALLBACK_SUGGESTIONS);
                let raw = format!("{FALLBACK_NOTICE}{canned}");
                let display = markup::format(&raw);
                Ok(SuggestionText {
                    raw,
                    display,
                    origin: SuggestionOrigin::Fallback,
                })
            }
        }
    }
}
