use crate::settings::SessionSettings;
use serde::{Deserialize, Serialize};

/// Token cap for drafted answers; interview replies should stay short.
pub const MAX_ANSWER_TOKENS: u32 = 400;
pub const ANSWER_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub system_message: String,
    pub user_message: String,
    pub messages: Vec<ChatMessage>,
}

/// Assembles the completion prompt from the session context and the
/// transcribed question. Context blocks are skipped when blank so the model
/// never sees empty tags.
pub fn build_interview_prompt(question: &str, settings: &SessionSettings) -> BuiltPrompt {
    let language = settings.language.as_str();

    let system = format!(
        "You are a job interview assistant. Draft the candidate's answer to the \
         interviewer's question. Give only the direct answer: no \"Question:\" or \
         \"Answer:\" labels at the start, and no closing remarks such as \"hope this \
         helps\" at the end. Speak as the candidate, in the first person, without \
         mentioning that this is a suggestion. Use the company, role, and resume \
         context when provided. Structure the answer with markdown: bold for key \
         concepts, lists where they help, code blocks when code is relevant. \
         IMPORTANT: always answer in the specified language ({language})."
    );

    let mut user = String::new();
    if !settings.company.trim().is_empty() {
        user.push_str(&format!("<COMPANY>\n{}\n</COMPANY>\n\n", settings.company));
    }
    if !settings.role.trim().is_empty() {
        user.push_str(&format!("<ROLE>\n{}\n</ROLE>\n\n", settings.role));
    }
    if !settings.resume.trim().is_empty() {
        user.push_str(&format!("<RESUME>\n{}\n</RESUME>\n\n", settings.resume));
    }
    user.push_str(&format!("The interviewer asked: \"{question}\""));

    let messages = vec![
        ChatMessage {
            role: "system".into(),
            content: system.clone(),
        },
        ChatMessage {
            role: "user".into(),
            content: user.clone(),
        },
    ];

    BuiltPrompt {
        system_message: system,
        user_message: user,
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LanguageTag;

    fn settings() -> SessionSettings {
        SessionSettings {
            company: "Acme".into(),
            role: "Backend engineer".into(),
            resume: "Five years of Rust services.".into(),
            language: LanguageTag::new("pt-BR"),
            ..SessionSettings::default()
        }
    }

    #[test]
    fn prompt_embeds_context_blocks_and_question() {
        let built = build_interview_prompt("Qual é a sua experiência?", &settings());
        assert!(built.user_message.contains("<COMPANY>\nAcme\n</COMPANY>"));
        assert!(built.user_message.contains("<ROLE>\nBackend engineer\n</ROLE>"));
        assert!(built.user_message.contains("<RESUME>"));
        assert!(
            built
                .user_message
                .ends_with("The interviewer asked: \"Qual é a sua experiência?\"")
        );
    }

    #[test]
    fn prompt_pins_the_answer_language() {
        let built = build_interview_prompt("anything", &settings());
        assert!(built.system_message.contains("(pt-BR)"));
    }

    #[test]
    fn blank_context_blocks_are_omitted() {
        let built = build_interview_prompt("question", &SessionSettings::default());
        assert!(!built.user_message.contains("<COMPANY>"));
        assert!(!built.user_message.contains("<ROLE>"));
        assert!(!built.user_message.contains("<RESUME>"));
        assert_eq!(
            built.user_message,
            "The interviewer asked: \"question\""
        );
    }

    #[test]
    fn messages_are_system_then_user() {
        let built = build_interview_prompt("q", &settings());
        assert_eq!(built.messages.len(), 2);
        assert_eq!(built.messages[0].role, "system");
        assert_eq!(built.messages[1].role, "user");
        assert_eq!(built.messages[0].content, built.system_message);
        assert_eq!(built.messages[1].content, built.user_message);
    }
}
