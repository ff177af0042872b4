//! Dictation: speech-to-text providers and the capture state machine
//!
//! This module provides:
//! - [`SpeechProvider`], the seam to a platform recognizer
//! - [`SpeechCapture`], the idle/listening state machine driving the draft
//! - [`FakeSpeechProvider`] for tests and demos
//! - `WhisperSpeechProvider` (feature `audio-io`) using the microphone

pub mod capture;
pub mod fake;
#[cfg(feature = "audio-io")]
pub mod whisper;

pub use capture::{DictationState, SpeechCapture, SpeechProvider, UnsupportedSpeech};
pub use fake::{FakePass, FakeSpeechHandle, FakeSpeechProvider};
#[cfg(feature = "audio-io")]
pub use whisper::WhisperSpeechProvider;
