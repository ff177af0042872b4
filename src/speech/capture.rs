use crate::utils::TranscriptChannels;
use crate::{ChatError, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::fmt;
use tracing::{debug, info, warn};

/// Transcripts that may queue up between two polls
const TRANSCRIPT_BUFFER: usize = 64;

/// A platform speech-to-text recognizer.
///
/// While started, every recognized transcript is sent in full on
/// `transcripts`; each one supersedes the previous.
pub trait SpeechProvider: Send {
    /// Whether recognition can work here at all. Queried once.
    fn is_supported(&self) -> bool;

    /// Begin recognition, acquiring the microphone
    fn start(&mut self, continuous: bool, transcripts: Sender<String>) -> Result<()>;

    /// End recognition and release the microphone
    fn stop(&mut self) -> Result<()>;

    /// Forget everything recognized so far without stopping and deliver
    /// from now on to `transcripts`. Whatever is still sent on the old
    /// sender is dropped with its receiver.
    fn reset(&mut self, transcripts: Sender<String>);

    fn name(&self) -> &str {
        "speech"
    }
}

/// Provider for platforms without speech recognition
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSpeech;

impl SpeechProvider for UnsupportedSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&mut self, _continuous: bool, _transcripts: Sender<String>) -> Result<()> {
        Err(ChatError::SpeechUnavailable(
            "no speech recognizer on this platform".to_string(),
        ))
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn reset(&mut self, _transcripts: Sender<String>) {}

    fn name(&self) -> &str {
        "unsupported"
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DictationState {
    #[default]
    Idle,
    Listening,
}

impl DictationState {
    pub fn is_listening(&self) -> bool {
        matches!(self, DictationState::Listening)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DictationState::Idle)
    }
}

impl fmt::Display for DictationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictationState::Idle => write!(f, "Idle"),
            DictationState::Listening => write!(f, "Listening"),
        }
    }
}

/// Idle/listening state machine over a [`SpeechProvider`].
///
/// Each start opens a fresh transcript channel and stop drops it, so no
/// transcript can be observed after [`SpeechCapture::stop`] returns.
pub struct SpeechCapture {
    provider: Box<dyn SpeechProvider>,
    supported: bool,
    continuous: bool,
    state: DictationState,
    transcript_rx: Option<Receiver<String>>,
    transcript: String,
}

impl SpeechCapture {
    pub fn new(provider: Box<dyn SpeechProvider>, continuous: bool) -> Self {
        let supported = provider.is_supported();
        info!(
            provider = provider.name(),
            supported, continuous, "Speech capture ready"
        );

        Self {
            provider,
            supported,
            continuous,
            state: DictationState::Idle,
            transcript_rx: None,
            transcript: String::new(),
        }
    }

    pub fn unsupported() -> Self {
        Self::new(Box::new(UnsupportedSpeech), true)
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn state(&self) -> DictationState {
        self.state
    }

    /// Latest transcript of the current dictation run
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Start listening. A no-op when unsupported or already listening.
    /// If the provider fails to start, the capture stays idle.
    pub fn start(&mut self) -> Result<DictationState> {
        if !self.supported {
            debug!("Dictation requested but speech is unsupported");
            return Ok(self.state);
        }
        if self.state.is_listening() {
            return Ok(self.state);
        }

        self.transcript.clear();
        let channels = TranscriptChannels::new(TRANSCRIPT_BUFFER);
        self.provider.start(self.continuous, channels.transcript_tx)?;

        self.transcript_rx = Some(channels.transcript_rx);
        self.state = DictationState::Listening;
        info!(provider = self.provider.name(), "Dictation started");
        Ok(self.state)
    }

    /// Stop listening. A no-op when idle.
    pub fn stop(&mut self) -> Result<DictationState> {
        if self.state.is_idle() {
            return Ok(self.state);
        }

        self.state = DictationState::Idle;
        self.transcript_rx = None;
        self.provider.stop()?;
        info!(provider = self.provider.name(), "Dictation stopped");
        Ok(self.state)
    }

    pub fn toggle(&mut self) -> Result<DictationState> {
        match self.state {
            DictationState::Idle => self.start(),
            DictationState::Listening => self.stop(),
        }
    }

    /// Drop the accumulated transcript, including anything queued but not
    /// yet polled, and ask the provider to start over on a fresh channel.
    /// A recognition pass still in flight lands on the old channel and is
    /// never observed.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        if !self.state.is_listening() {
            return;
        }

        let channels = TranscriptChannels::new(TRANSCRIPT_BUFFER);
        self.provider.reset(channels.transcript_tx);
        self.transcript_rx = Some(channels.transcript_rx);
        debug!(provider = self.provider.name(), "Dictation transcript reset");
    }

    /// Transcripts recognized since the last poll, oldest first. If the
    /// provider ended on its own the capture returns to idle.
    pub fn poll(&mut self) -> Vec<String> {
        let mut updates = Vec::new();
        let mut ended = false;

        if let Some(rx) = &self.transcript_rx {
            loop {
                match rx.try_recv() {
                    Ok(text) => updates.push(text),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        ended = true;
                        break;
                    }
                }
            }
        }

        if let Some(last) = updates.last() {
            self.transcript.clone_from(last);
        }

        if ended {
            info!(provider = self.provider.name(), "Speech provider ended recognition");
            self.state = DictationState::Idle;
            self.transcript_rx = None;
            if let Err(e) = self.provider.stop() {
                warn!("Failed to release speech provider: {}", e);
            }
        }

        updates
    }
}

impl Drop for SpeechCapture {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Failed to stop dictation on teardown: {}", e);
        }
    }
}
