use regex::Regex;
use std::sync::OnceLock;

/// Closing remarks models tack onto answers despite instructions. A match
/// anywhere cuts from the matched word to the end of the text.
pub const DISMISSAL_PHRASES: &[&str] = &[
    "espero",
    "isso deve",
    "espero que",
    "isso esclarece",
    "espero ter ajudado",
    "tem mais alguma",
    "posso ajudar",
    "mais alguma dúvida",
    "ficou claro",
    "está claro",
    "isso responde",
    "hope this helps",
    "hope that helps",
    "i hope this",
    "let me know if",
    "feel free to ask",
];

fn answer_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // One or more stacked labels; models sometimes emit both.
        Regex::new(r"(?i)^(?:(?:pergunta|resposta|question|answer):\s*)+")
            .expect("valid answer label regex")
    })
}

fn dismissal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternatives = DISMISSAL_PHRASES.join("|");
        Regex::new(&format!(r"(?is)\b(?:{alternatives})\b.*$")).expect("valid dismissal regex")
    })
}

/// Deterministic cleanup for model answers: drop leading
/// "Question:"/"Answer:" labels, cut trailing dismissal boilerplate, trim
/// the tail. Idempotent on already-clean text.
pub fn clean_suggestion(text: &str) -> String {
    let text = text.trim();
    let text = answer_label_re().replace(text, "");
    let text = dismissal_re().replace(&text, "");
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_label_and_trailing_dismissal() {
        let input = "Resposta: **Eu** adoraria. Espero ter ajudado!";
        assert_eq!(clean_suggestion(input), "**Eu** adoraria.");
    }

    #[test]
    fn strips_stacked_labels() {
        assert_eq!(clean_suggestion("Pergunta: Resposta: Sim."), "Sim.");
        assert_eq!(clean_suggestion("Answer: I led the migration."), "I led the migration.");
    }

    #[test]
    fn cuts_from_the_leftmost_dismissal_to_the_end() {
        let input = "First point.\nSecond point. Isso esclarece? Espero que sim.";
        assert_eq!(clean_suggestion(input), "First point.\nSecond point.");
    }

    #[test]
    fn english_dismissals_are_cut_too() {
        let input = "I would use a queue here. Hope this helps!\n\n";
        assert_eq!(clean_suggestion(input), "I would use a queue here.");
    }

    #[test]
    fn clean_is_idempotent() {
        let cases = [
            "Resposta: **Eu** adoraria. Espero ter ajudado!",
            "Pergunta: Pergunta: nested labels",
            "plain answer with no boilerplate",
            "multi\nline\nanswer.\n\n",
        ];
        for case in cases {
            let once = clean_suggestion(case);
            assert_eq!(clean_suggestion(&once), once, "not idempotent for {case:?}");
        }
    }

    #[test]
    fn labels_mid_text_are_left_alone() {
        let input = "The answer: it depends on the workload.";
        assert_eq!(clean_suggestion(input), "The answer: it depends on the workload.");
    }

    #[test]
    fn dismissal_words_inside_larger_words_do_not_match() {
        // "esperot" must not trigger the "espero" cut.
        let input = "O time esperotrabalho concluiu tudo.";
        assert_eq!(clean_suggestion(input), input);
    }
}
