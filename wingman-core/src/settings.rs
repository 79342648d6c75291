use serde::{Deserialize, Serialize};

/// BCP-47 language tag, e.g. `pt-BR` or `en-US`.
///
/// The transcription endpoint wants the bare primary code (`pt`) while the
/// on-device recognizer wants the full tag; both derive from this one field
/// so they cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(pub String);

impl LanguageTag {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Full tag, for recognizer configuration.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary subtag, the two-letter hint remote services take.
    pub fn primary(&self) -> &str {
        self.0.split(['-', '_']).next().unwrap_or(self.0.as_str())
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self("en-US".to_string())
    }
}

/// The single settings record. Loaded once at startup, saved wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    /// Resume / CV text pasted by the user, fed verbatim into the prompt.
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub language: LanguageTag,
    #[serde(default)]
    pub capture_device: String,
    #[serde(default = "default_system_device")]
    pub system_device: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
}

impl SessionSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            company: String::new(),
            role: String::new(),
            resume: String::new(),
            language: LanguageTag::default(),
            capture_device: String::new(),
            system_device: default_system_device(),
            debug: false,
            transcription_model: default_transcription_model(),
            completion_model: default_completion_model(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_system_device() -> String {
    "system".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_completion_model() -> String {
    "gpt-3.5-turbo".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tag_primary_strips_region() {
        assert_eq!(LanguageTag::new("pt-BR").primary(), "pt");
        assert_eq!(LanguageTag::new("en").primary(), "en");
        assert_eq!(LanguageTag::new("zh_CN").primary(), "zh");
    }

    #[test]
    fn settings_deserialize_fills_defaults() {
        let settings: SessionSettings =
            serde_json::from_str(r#"{"api_key":"sk-test","company":"Acme"}"#).unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.company, "Acme");
        assert_eq!(settings.api_base_url, "https://api.openai.com/v1");
        assert_eq!(settings.transcription_model, "whisper-1");
        assert_eq!(settings.completion_model, "gpt-3.5-turbo");
        assert_eq!(settings.language, LanguageTag::default());
        assert!(!settings.debug);
    }

    #[test]
    fn has_api_key_rejects_blank() {
        let mut settings = SessionSettings::default();
        assert!(!settings.has_api_key());
        settings.api_key = "   ".to_string();
        assert!(!settings.has_api_key());
        settings.api_key = "sk-real".to_string();
        assert!(settings.has_api_key());
    }
}
