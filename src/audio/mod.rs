//! Microphone capture and resampling for the Whisper dictation provider

pub mod input;
pub mod resampler;

pub use input::Microphone;
pub use resampler::{resample_mono, WHISPER_SAMPLE_RATE};
