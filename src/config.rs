//! Configuration for the chat pane
//!
//! Every field has a default, so an absent or partial `config.toml` is
//! valid. See [`ChatConfig::load`] for the lookup order.

use crate::{ChatError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "CHATPANE_CONFIG";

pub const DEFAULT_GREETING: &str =
    "Hello! I'm ChatGPT, your AI assistant. How can I help you today?";

pub const DEFAULT_PLACEHOLDER_REPLY: &str =
    "I understand your message. This is a placeholder response from the AI assistant.";

pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub session: SessionConfig,
    pub reply: ReplyConfig,
    pub composer: ComposerConfig,
    pub speech: SpeechConfig,
    pub ui: UiConfig,
    pub nav: Vec<NavItem>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Assistant message shown when a session opens (empty disables it)
    pub greeting: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    pub delay_ms: u64,
    pub placeholder: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_REPLY_DELAY_MS,
            placeholder: DEFAULT_PLACEHOLDER_REPLY.to_string(),
        }
    }
}

impl ReplyConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Upper bound on the height of the input box, in text rows
    pub max_rows: usize,
    /// Hint shown in the empty input box
    pub hint: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_rows: 6,
            hint: "Type your message here...".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Allow dictation at all
    pub enabled: bool,
    /// Keep listening across pauses until stopped explicitly
    pub continuous: bool,
    /// Path to the Whisper model file
    pub model_path: PathBuf,
    /// Language to transcribe (None for auto-detection)
    pub language: Option<String>,
    /// Number of threads to use for transcription
    pub n_threads: i32,
    /// How often the captured utterance is re-transcribed
    pub transcribe_interval_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            continuous: true,
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: Some("en".to_string()),
            n_threads: 4,
            transcribe_interval_ms: 1500,
        }
    }
}

impl SpeechConfig {
    pub fn transcribe_interval(&self) -> Duration {
        Duration::from_millis(self.transcribe_interval_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub subtitle: String,
    /// Name shown at the top of the sidebar
    pub brand: String,
    /// Window width at or above which the sidebar stays docked
    pub wide_layout_width: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Chat with GPT-4".to_string(),
            subtitle: "AI Assistant".to_string(),
            brand: "ChatGPT".to_string(),
            wide_layout_width: 1024.0,
        }
    }
}

/// One sidebar navigation entry
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub route: String,
}

impl NavItem {
    pub fn new(label: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            route: route.into(),
        }
    }

    pub fn defaults() -> Vec<NavItem> {
        vec![
            NavItem::new("Home", "/"),
            NavItem::new("New Chat", "/chat"),
            NavItem::new("Settings", "/settings"),
            NavItem::new("Profile", "/profile"),
        ]
    }
}

impl ChatConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: ChatConfig = toml::from_str(content)?;
        if config.nav.is_empty() {
            config.nav = NavItem::defaults();
        }
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| ChatError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the configuration: the explicit path if given, then
    /// `$CHATPANE_CONFIG`, then `<config dir>/chatpane/config.toml`.
    /// A missing default file yields the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading configuration from {}", path.display());
            return Self::load_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            info!("Loading configuration from ${} = {}", CONFIG_ENV_VAR, path);
            return Self::load_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                Self::load_file(path)
            }
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::with_defaults())
            }
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chatpane").join("config.toml"))
    }

    /// Built-in defaults including the standard navigation entries
    pub fn with_defaults() -> Self {
        Self {
            nav: NavItem::defaults(),
            ..Self::default()
        }
    }

    /// Set the reply delay
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply.delay_ms = delay.as_millis() as u64;
        self
    }

    /// Disable dictation (text-only mode)
    pub fn without_speech(mut self) -> Self {
        self.speech.enabled = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.reply.placeholder.trim().is_empty() {
            return Err(ChatError::Config(
                "reply.placeholder must not be empty".to_string(),
            ));
        }

        if self.composer.max_rows == 0 {
            return Err(ChatError::Config(
                "composer.max_rows must be at least 1".to_string(),
            ));
        }

        if self.speech.enabled && self.speech.transcribe_interval_ms == 0 {
            return Err(ChatError::Config(
                "speech.transcribe_interval_ms must be greater than 0".to_string(),
            ));
        }

        for item in &self.nav {
            if item.label.trim().is_empty() {
                return Err(ChatError::Config(
                    "nav entries need a label".to_string(),
                ));
            }
            if !item.route.starts_with('/') {
                return Err(ChatError::Config(format!(
                    "nav route for {:?} must start with '/': {:?}",
                    item.label, item.route
                )));
            }
        }

        Ok(())
    }
}
