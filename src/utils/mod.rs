pub mod channels;

pub use channels::{notify, Notifier, ReplyChannels, TranscriptChannels};
