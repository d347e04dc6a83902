use serde::{Deserialize, Serialize};

/// Options controlling how a page is described to the AI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocatorConfig {
    /// The model answers with coordinates: omit the element tree from the
    /// description (default: false)
    #[serde(default)]
    pub match_by_position: bool,

    /// Cut element content to this many characters in the description
    #[serde(default)]
    pub truncate_text_length: Option<usize>,

    /// Omit non-text elements without content from the description
    #[serde(default)]
    pub filter_non_text_content: bool,

    /// Model name recorded in dumps
    #[serde(default)]
    pub model_name: Option<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            match_by_position: false,
            truncate_text_length: None,
            filter_non_text_content: false,
            model_name: None,
        }
    }
}

impl LocatorConfig {
    /// Create config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Compact description: text-only, content cut at 200 characters
    pub fn lite() -> Self {
        Self::default().truncate_text_length(200).filter_non_text_content(true)
    }

    /// Read overrides from `LOCATOR_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from a key lookup; unset or unparsable keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("LOCATOR_MATCH_BY_POSITION") {
            config.match_by_position = parse_flag(&value);
        }
        if let Some(value) = lookup("LOCATOR_TRUNCATE_TEXT_LENGTH") {
            match value.trim().parse::<usize>() {
                Ok(length) => config.truncate_text_length = Some(length),
                Err(_) => log::warn!("Ignoring invalid LOCATOR_TRUNCATE_TEXT_LENGTH: {}", value),
            }
        }
        if let Some(value) = lookup("LOCATOR_FILTER_NON_TEXT") {
            config.filter_non_text_content = parse_flag(&value);
        }
        if let Some(value) = lookup("LOCATOR_MODEL_NAME") {
            if !value.trim().is_empty() {
                config.model_name = Some(value.trim().to_string());
            }
        }

        config
    }

    /// Builder method: set position matching
    pub fn match_by_position(mut self, enabled: bool) -> Self {
        self.match_by_position = enabled;
        self
    }

    /// Builder method: set content truncation
    pub fn truncate_text_length(mut self, length: usize) -> Self {
        self.truncate_text_length = Some(length);
        self
    }

    /// Builder method: set non-text filtering
    pub fn filter_non_text_content(mut self, enabled: bool) -> Self {
        self.filter_non_text_content = enabled;
        self
    }

    /// Builder method: set model name
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
