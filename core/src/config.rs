use crate::errors::{GeminiError, GeminiResult};
use crate::types::GenerationConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_NAME: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
You are a compassionate and supportive AI therapist. Your role is to:
- Listen attentively to the user's concerns
- Respond with empathy and understanding
- Provide helpful insights and coping strategies
- Ask thoughtful questions to help users explore their feelings
- Suggest practical exercises or techniques when appropriate
- Maintain a warm, non-judgmental tone
- Never claim to be a human or licensed professional
- Clarify that you're an AI assistant providing support, not medical advice
- Encourage seeking professional help for serious mental health concerns

Your responses should be supportive, thoughtful, and focused on the user's wellbeing.
";

/// Configuration struct for Gemini API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    /// Scheme and host of the generative language API, without a trailing path
    pub base_url: Option<String>,
}

impl GeminiConfig {
    pub fn new(api_key: Option<String>, model_name: Option<String>) -> Self {
        Self {
            api_key,
            model_name,
            base_url: None,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
        }
    }
}

/// The canned opening exchange prepended to every model call
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SeedExchange {
    pub user: String,
    pub model: String,
}

impl Default for SeedExchange {
    fn default() -> Self {
        Self {
            user: "Hello, I could use someone to talk to.".to_string(),
            model: "I'm here to listen and support you. What's on your mind today?".to_string(),
        }
    }
}

/// Sampling limits sent with every generation request
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: i32,
    pub top_p: f32,
    pub max_output_tokens: i32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

impl From<GenerationSettings> for GenerationConfig {
    fn from(settings: GenerationSettings) -> Self {
        Self {
            temperature: Some(settings.temperature),
            top_p: Some(settings.top_p),
            top_k: Some(settings.top_k),
            max_output_tokens: Some(settings.max_output_tokens),
        }
    }
}

/// Persona directive, seed exchange and generation limits for the relay.
///
/// Everything the model sees besides the caller's own text comes from here,
/// so tests can swap the persona without touching request handling.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PersonaConfig {
    pub system_instruction: String,
    pub seed: SeedExchange,
    pub generation: GenerationSettings,
    /// Upper bound on replayed history turns when a client supplies them
    pub max_history_turns: usize,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            seed: SeedExchange::default(),
            generation: GenerationSettings::default(),
            max_history_turns: 20,
        }
    }
}

/// Loads a TOML file into `T`, falling back to `T::default()` when the file is absent
pub fn load_toml_or_default<T>(path: &Path) -> GeminiResult<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| GeminiError::ConfigError(format!("Failed to read config file: {}", e)))?;

    toml::from_str(&content)
        .map_err(|e| GeminiError::ConfigError(format!("Failed to parse config file: {}", e)))
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get a default config file path inside the app's config directory
pub fn get_default_config_file(app_name: &str, file_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join(file_name))
}
