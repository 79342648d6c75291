use crate::types::{SpeakerRole, TranscriptEntry, TranscriptOrigin};

/// Swappable policy deciding who said a recognized utterance.
pub type SpeakerClassifier = fn(&str) -> SpeakerRole;

/// Openings that mark a line as an interviewer question.
pub const QUESTION_STARTERS: &[&str] = &[
    "Como", "Qual", "Me conte", "Descreva", "How", "What", "Tell me", "Describe", "Why", "Where",
];

/// Minimum length for a recognized utterance to be worth processing.
pub const MIN_RECOGNIZED_CHARS: usize = 6;

/// Default attribution heuristic: question marks or a question-starter
/// opening mean the interviewer is speaking. Fragile and language-specific
/// on purpose; replace the `SpeakerClassifier` instead of extending this.
pub fn classify_speaker(text: &str) -> SpeakerRole {
    let text = text.trim_start();
    if text.contains('?')
        || QUESTION_STARTERS
            .iter()
            .any(|starter| text.starts_with(starter))
    {
        SpeakerRole::Interviewer
    } else {
        SpeakerRole::Candidate
    }
}

/// Gate for continuous-recognition finals: drop short fragments and exact
/// repeats of the previously processed utterance.
pub fn worth_processing(text: &str, last_processed: Option<&str>) -> bool {
    text.chars().count() >= MIN_RECOGNIZED_CHARS && last_processed != Some(text)
}

/// Append-only session transcript, ordered by append time.
#[derive(Debug, Default, Clone)]
pub struct TranscriptLog {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spoken lines as a `Speaker: text` dialogue block. Suggestions and
    /// notices are display artifacts, not conversation, and are skipped.
    pub fn as_dialogue(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry.origin {
                TranscriptOrigin::Remote
                | TranscriptOrigin::OnDevice
                | TranscriptOrigin::Synthetic => {
                    let speaker = match entry.role {
                        SpeakerRole::Interviewer => "Interviewer",
                        SpeakerRole::Candidate => "Candidate",
                    };
                    out.push_str(speaker);
                    out.push_str(": ");
                    out.push_str(&entry.text);
                    out.push('\n');
                }
                TranscriptOrigin::Suggestion | TranscriptOrigin::Notice => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_marks_mean_interviewer() {
        assert_eq!(
            classify_speaker("Você tem experiência com Rust?"),
            SpeakerRole::Interviewer
        );
        assert_eq!(
            classify_speaker("Tenho cinco anos de experiência."),
            SpeakerRole::Candidate
        );
    }

    #[test]
    fn question_starters_mean_interviewer() {
        assert_eq!(
            classify_speaker("Me conte sobre seu último projeto"),
            SpeakerRole::Interviewer
        );
        assert_eq!(
            classify_speaker("Describe a hard bug you fixed"),
            SpeakerRole::Interviewer
        );
        assert_eq!(
            classify_speaker("I fixed a hard bug last year"),
            SpeakerRole::Candidate
        );
    }

    #[test]
    fn worth_processing_drops_fragments_and_repeats() {
        assert!(!worth_processing("ok", None));
        assert!(!worth_processing("same question", Some("same question")));
        assert!(worth_processing("same question", Some("other question")));
        assert!(worth_processing("long enough", None));
    }

    #[test]
    fn log_preserves_append_order() {
        let mut log = TranscriptLog::new();
        log.append(TranscriptEntry::new(
            SpeakerRole::Interviewer,
            "first",
            TranscriptOrigin::Remote,
        ));
        log.append(TranscriptEntry::new(
            SpeakerRole::Candidate,
            "second",
            TranscriptOrigin::OnDevice,
        ));
        let texts: Vec<_> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn dialogue_skips_suggestions_and_notices() {
        let mut log = TranscriptLog::new();
        log.append(TranscriptEntry::new(
            SpeakerRole::Interviewer,
            "Qual é a sua experiência?",
            TranscriptOrigin::Remote,
        ));
        log.append(TranscriptEntry::new(
            SpeakerRole::Candidate,
            "**Eu** adoraria.",
            TranscriptOrigin::Suggestion,
        ));
        log.append(TranscriptEntry::new(
            SpeakerRole::Candidate,
            "API key missing",
            TranscriptOrigin::Notice,
        ));
        assert_eq!(log.as_dialogue(), "Interviewer: Qual é a sua experiência?\n");
    }
}
