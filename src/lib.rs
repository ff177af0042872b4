//! Chatpane - a desktop chat pane with dictation and a simulated assistant
//!
//! The stateful core ([`session::ChatSession`]) is independent of the
//! egui shell in [`ui`] and can be driven directly from tests.

#[cfg(feature = "audio-io")]
pub mod audio;
pub mod config;
pub mod messages;
pub mod session;
pub mod speech;
pub mod ui;
pub mod utils;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Speech recognition unavailable: {0}")]
    SpeechUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

impl From<std::io::Error> for ChatError {
    fn from(e: std::io::Error) -> Self {
        ChatError::Io(e.to_string())
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(e: toml::de::Error) -> Self {
        ChatError::Config(e.to_string())
    }
}

impl ChatError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            ChatError::AudioDevice(_) => false,
            ChatError::ModelLoad(_) => false,
            ChatError::Transcription(_) => true,
            ChatError::SpeechUnavailable(_) => false,
            ChatError::Config(_) => false,
            ChatError::Io(_) => false,
            ChatError::Channel(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ChatError::AudioDevice(_) => {
                "Microphone unavailable. Please check your input device.".to_string()
            }
            ChatError::ModelLoad(_) => {
                "Failed to load the speech model. Dictation is disabled.".to_string()
            }
            ChatError::Transcription(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            ChatError::SpeechUnavailable(_) => {
                "Dictation is not supported on this system.".to_string()
            }
            ChatError::Config(_) => "Configuration error. Please check settings.".to_string(),
            ChatError::Io(_) => "File system error occurred.".to_string(),
            ChatError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
