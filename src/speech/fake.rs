//! A speech provider with no platform dependency
//!
//! The provider half goes into a [`super::SpeechCapture`]; the
//! [`FakeSpeechHandle`] half stays with the caller to play the part of
//! the recognizer.

use super::SpeechProvider;
use crate::{ChatError, Result};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct FakeShared {
    sink: Option<Sender<String>>,
    starts: usize,
    stops: usize,
    resets: usize,
    last_continuous: Option<bool>,
    fail_next_start: bool,
}

pub struct FakeSpeechProvider {
    supported: bool,
    shared: Arc<Mutex<FakeShared>>,
}

#[derive(Clone)]
pub struct FakeSpeechHandle {
    shared: Arc<Mutex<FakeShared>>,
}

impl FakeSpeechProvider {
    pub fn new() -> (Self, FakeSpeechHandle) {
        Self::build(true)
    }

    /// A fake that reports speech as unavailable
    pub fn unsupported() -> (Self, FakeSpeechHandle) {
        Self::build(false)
    }

    fn build(supported: bool) -> (Self, FakeSpeechHandle) {
        let shared = Arc::new(Mutex::new(FakeShared::default()));
        let handle = FakeSpeechHandle {
            shared: Arc::clone(&shared),
        };
        (Self { supported, shared }, handle)
    }
}

impl SpeechProvider for FakeSpeechProvider {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start(&mut self, continuous: bool, transcripts: Sender<String>) -> Result<()> {
        let mut shared = self.shared.lock();
        if shared.fail_next_start {
            shared.fail_next_start = false;
            return Err(ChatError::AudioDevice("fake microphone busy".to_string()));
        }
        shared.sink = Some(transcripts);
        shared.starts += 1;
        shared.last_continuous = Some(continuous);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut shared = self.shared.lock();
        shared.sink = None;
        shared.stops += 1;
        Ok(())
    }

    fn reset(&mut self, transcripts: Sender<String>) {
        let mut shared = self.shared.lock();
        shared.sink = Some(transcripts);
        shared.resets += 1;
    }

    fn name(&self) -> &str {
        "fake"
    }
}

impl FakeSpeechHandle {
    /// Deliver a recognized transcript. Returns false when nobody is
    /// listening.
    pub fn emit(&self, text: impl Into<String>) -> bool {
        match &self.shared.lock().sink {
            Some(sink) => sink.try_send(text.into()).is_ok(),
            None => false,
        }
    }

    /// Begin a recognition pass against the current sink. Whatever the
    /// pass delivers goes where the sink pointed when it began, like a
    /// transcription that was already running.
    pub fn begin_pass(&self) -> FakePass {
        FakePass {
            sink: self.shared.lock().sink.clone(),
        }
    }

    /// End recognition from the provider side
    pub fn finish(&self) {
        self.shared.lock().sink = None;
    }

    /// Make the next `start` fail as if the microphone were busy
    pub fn fail_next_start(&self) {
        self.shared.lock().fail_next_start = true;
    }

    /// Whether the fake microphone is currently held
    pub fn is_listening(&self) -> bool {
        self.shared.lock().sink.is_some()
    }

    pub fn starts(&self) -> usize {
        self.shared.lock().starts
    }

    pub fn stops(&self) -> usize {
        self.shared.lock().stops
    }

    pub fn resets(&self) -> usize {
        self.shared.lock().resets
    }

    pub fn last_continuous(&self) -> Option<bool> {
        self.shared.lock().last_continuous
    }
}

/// A recognition pass started by [`FakeSpeechHandle::begin_pass`]
pub struct FakePass {
    sink: Option<Sender<String>>,
}

impl FakePass {
    /// Returns false when the transcript had nowhere to go
    pub fn deliver(&self, text: impl Into<String>) -> bool {
        match &self.sink {
            Some(sink) => sink.try_send(text.into()).is_ok(),
            None => false,
        }
    }
}
