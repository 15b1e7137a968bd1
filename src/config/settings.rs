//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides `api.api_key` from `settings.toml`.
pub const API_KEY_ENV: &str = "SPEAK_COACH_API_KEY";

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Connection settings shared by every hosted endpoint (transcription,
/// completions, chat, speech).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API.
    ///
    /// - OpenAI: `https://api.openai.com`
    /// - Self-hosted gateways (LM Studio, LiteLLM …) work as long as they
    ///   expose the same routes.
    pub base_url: String,
    /// API key — `None` for gateways that do not authenticate.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for any single response before timing out.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted transcription endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Model identifier sent with the upload (e.g. `"whisper-1"`).
    pub model: String,
    /// Speech language as an ISO-639-1 code.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "whisper-1".into(),
            language: "en".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// GrammarConfig
// ---------------------------------------------------------------------------

/// Sampling settings for the grammar-correction call.
///
/// Correction wants a deterministic, single-sentence answer, so the budget
/// is small and the temperature moderate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Model identifier (a light model is enough for single-sentence edits).
    pub model: String,
    /// Maximum tokens generated for the corrected sentence.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            max_tokens: 100,
            temperature: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// ConversationConfig
// ---------------------------------------------------------------------------

/// Sampling settings for the conversational reply call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Model identifier for replies and memory summarization.
    pub model: String,
    /// Maximum tokens generated per reply.
    pub max_tokens: u32,
    /// Sampling temperature — low, so replies stay focused on the learner.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Stop sequences cutting the model off before it role-plays the user.
    pub stop: Vec<String>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            max_tokens: 300,
            temperature: 0.1,
            top_p: 0.9,
            stop: vec!["\n\nHuman:".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// TopicConfig
// ---------------------------------------------------------------------------

/// Sampling settings for the topic-suggestion call.  Higher temperature than
/// grammar correction so consecutive suggestions vary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Model identifier (shares the grammar model by default).
    pub model: String,
    /// Maximum tokens generated for the suggestion.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            max_tokens: 50,
            temperature: 0.7,
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryConfig
// ---------------------------------------------------------------------------

/// Settings for the summarizing conversation memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Estimated-token budget for the recent-exchange buffer.  Exchanges
    /// beyond the budget are folded into the running summary.
    pub token_budget: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { token_budget: 300 }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted speech-synthesis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Model identifier (e.g. `"tts-1"`).
    pub model: String,
    /// Voice preset name.
    pub voice: String,
    /// Spoken language as an ISO-639-1 code.
    pub language: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            model: "tts-1".into(),
            voice: "alloy".into(),
            language: "en".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Target sample rate in Hz sent to the transcription endpoint
    /// (must be 16 000).
    pub sample_rate: u32,
    /// Minimum recording length in seconds before transcription is attempted.
    pub min_recording_secs: f32,
    /// Maximum recording length in seconds accepted for one upload.
    pub max_recording_secs: f32,
    /// Audio input device name — `None` means the system default.
    pub input_device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            min_recording_secs: 0.5,
            max_recording_secs: 60.0,
            input_device: None,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui chat-window appearance and behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
    /// Play each synthesized reply as soon as it arrives.
    pub autoplay_replies: bool,
    /// Show the corrected version of the learner's sentence above the reply.
    pub show_corrections: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
            autoplay_replies: true,
            show_corrections: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use speak_coach::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared hosted-endpoint connection settings.
    pub api: ApiConfig,
    /// Transcription settings.
    pub stt: SttConfig,
    /// Grammar-correction sampling settings.
    pub grammar: GrammarConfig,
    /// Conversational-reply sampling settings.
    pub conversation: ConversationConfig,
    /// Topic-suggestion sampling settings.
    pub topics: TopicConfig,
    /// Conversation-memory settings.
    pub memory: MemoryConfig,
    /// Speech-synthesis settings.
    pub tts: TtsConfig,
    /// Microphone capture settings.
    pub audio: AudioConfig,
    /// Chat-window settings.
    pub ui: UiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            stt: SttConfig::default(),
            grammar: GrammarConfig::default(),
            conversation: ConversationConfig::default(),
            topics: TopicConfig::default(),
            memory: MemoryConfig::default(),
            tts: TtsConfig::default(),
            audio: AudioConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`,
    /// then apply environment overrides.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&AppPaths::new().settings_file)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment overrides on top of file-loaded values.  Currently
    /// just the API key.
    fn apply_env_overrides(&mut self) {
        if let Some(key) = env_api_key() {
            self.api.api_key = Some(key);
        }
    }

    /// Load from an explicit path (useful for tests).  Does not consult the
    /// environment.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Reads the API key override from the environment.  Blank values count as
/// unset so `SPEAK_COACH_API_KEY=""` cannot clobber a configured key.
pub fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        // ApiConfig
        assert_eq!(original.api.base_url, loaded.api.base_url);
        assert_eq!(original.api.api_key, loaded.api.api_key);
        assert_eq!(original.api.timeout_secs, loaded.api.timeout_secs);

        // SttConfig
        assert_eq!(original.stt.model, loaded.stt.model);
        assert_eq!(original.stt.language, loaded.stt.language);

        // GrammarConfig / TopicConfig
        assert_eq!(original.grammar.model, loaded.grammar.model);
        assert_eq!(original.grammar.max_tokens, loaded.grammar.max_tokens);
        assert_eq!(original.grammar.temperature, loaded.grammar.temperature);
        assert_eq!(original.topics.temperature, loaded.topics.temperature);

        // ConversationConfig
        assert_eq!(original.conversation.model, loaded.conversation.model);
        assert_eq!(
            original.conversation.max_tokens,
            loaded.conversation.max_tokens
        );
        assert_eq!(original.conversation.top_p, loaded.conversation.top_p);
        assert_eq!(original.conversation.stop, loaded.conversation.stop);

        // MemoryConfig / TtsConfig
        assert_eq!(original.memory.token_budget, loaded.memory.token_budget);
        assert_eq!(original.tts.voice, loaded.tts.voice);

        // AudioConfig
        assert_eq!(original.audio.sample_rate, loaded.audio.sample_rate);
        assert_eq!(
            original.audio.min_recording_secs,
            loaded.audio.min_recording_secs
        );
        assert_eq!(
            original.audio.max_recording_secs,
            loaded.audio.max_recording_secs
        );

        // UiConfig
        assert_eq!(original.ui.autoplay_replies, loaded.ui.autoplay_replies);
        assert_eq!(original.ui.show_corrections, loaded.ui.show_corrections);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.api.base_url, default.api.base_url);
        assert_eq!(config.stt.model, default.stt.model);
        assert_eq!(config.conversation.model, default.conversation.model);
        assert_eq!(config.memory.token_budget, default.memory.token_budget);
        assert_eq!(config.audio.sample_rate, default.audio.sample_rate);
    }

    /// Verify the reference sampling setup the clients are tuned for.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.api.base_url, "https://api.openai.com");
        assert!(cfg.api.api_key.is_none());
        assert_eq!(cfg.api.timeout_secs, 30);

        assert_eq!(cfg.stt.model, "whisper-1");
        assert_eq!(cfg.stt.language, "en");

        assert_eq!(cfg.grammar.max_tokens, 100);
        assert_eq!(cfg.grammar.temperature, 0.5);

        assert_eq!(cfg.conversation.max_tokens, 300);
        assert_eq!(cfg.conversation.temperature, 0.1);
        assert_eq!(cfg.conversation.top_p, 0.9);
        assert_eq!(cfg.conversation.stop, vec!["\n\nHuman:".to_string()]);

        assert_eq!(cfg.topics.max_tokens, 50);
        assert_eq!(cfg.topics.temperature, 0.7);

        assert_eq!(cfg.memory.token_budget, 300);

        assert_eq!(cfg.tts.model, "tts-1");
        assert_eq!(cfg.tts.language, "en");

        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.audio.min_recording_secs, 0.5);
        assert_eq!(cfg.audio.max_recording_secs, 60.0);

        assert!(cfg.ui.autoplay_replies);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.api.base_url = "http://localhost:1234".into();
        cfg.api.api_key = Some("sk-test".into());
        cfg.api.timeout_secs = 60;
        cfg.stt.language = "en-GB".into();
        cfg.grammar.model = "gpt-4o".into();
        cfg.conversation.temperature = 0.3;
        cfg.conversation.stop = vec!["\n\nHuman:".into(), "\n\nUser:".into()];
        cfg.memory.token_budget = 600;
        cfg.tts.voice = "nova".into();
        cfg.ui.window_position = Some((100.0, 200.0));
        cfg.ui.autoplay_replies = false;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.api.base_url, "http://localhost:1234");
        assert_eq!(loaded.api.api_key, Some("sk-test".into()));
        assert_eq!(loaded.api.timeout_secs, 60);
        assert_eq!(loaded.stt.language, "en-GB");
        assert_eq!(loaded.grammar.model, "gpt-4o");
        assert_eq!(loaded.conversation.temperature, 0.3);
        assert_eq!(loaded.conversation.stop.len(), 2);
        assert_eq!(loaded.memory.token_budget, 600);
        assert_eq!(loaded.tts.voice, "nova");
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
        assert!(!loaded.ui.autoplay_replies);
    }

    /// A real environment key beats the file-loaded one; blank values must
    /// not count as an override.  Kept as one test because parallel tests
    /// mutating the same variable would race.
    #[test]
    fn env_api_key_override() {
        std::env::set_var(API_KEY_ENV, "   ");
        assert_eq!(env_api_key(), None);

        std::env::set_var(API_KEY_ENV, "sk-live");
        assert_eq!(env_api_key(), Some("sk-live".into()));

        let mut config = AppConfig::default();
        config.api.api_key = Some("sk-from-file".into());
        config.apply_env_overrides();
        assert_eq!(config.api.api_key, Some("sk-live".into()));

        std::env::remove_var(API_KEY_ENV);
        assert_eq!(env_api_key(), None);

        let mut config = AppConfig::default();
        config.api.api_key = Some("sk-from-file".into());
        config.apply_env_overrides();
        assert_eq!(config.api.api_key, Some("sk-from-file".into()));
    }
}
