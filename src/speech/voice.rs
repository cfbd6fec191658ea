use crate::config::VoiceConfig;

/// Language tag plus the service-specific voice that speaks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub language_tag: String,
    pub voice: String,
}

impl VoiceProfile {
    pub fn new(language_tag: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            language_tag: language_tag.into(),
            voice: voice.into(),
        }
    }

    /// Tags compare case-insensitively (`en-GB` == `en-gb`).
    pub fn matches(&self, language_tag: &str) -> bool {
        self.language_tag.eq_ignore_ascii_case(language_tag)
    }
}

impl From<&VoiceConfig> for VoiceProfile {
    fn from(config: &VoiceConfig) -> Self {
        Self::new(&config.language_tag, &config.voice)
    }
}
