//! Dictation backed by the default microphone and a local Whisper model
//!
//! A worker thread owns the microphone for the duration of one dictation
//! run. Every `transcribe_interval` it re-transcribes the whole utterance
//! captured so far and sends the full text, so each transcript
//! supersedes the one before it.

use super::SpeechProvider;
use crate::audio::{input::input_device_available, resample_mono, Microphone, WHISPER_SAMPLE_RATE};
use crate::config::SpeechConfig;
use crate::{ChatError, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Less new audio than this is not worth another transcription pass
const MIN_NEW_AUDIO_SECS: f32 = 0.5;

/// Single-utterance mode gives up after this much audio
const MAX_UTTERANCE_SECS: f32 = 30.0;

/// Loaded Whisper model, shared across dictation runs
struct WhisperEngine {
    context: WhisperContext,
    language: Option<String>,
    n_threads: i32,
}

impl WhisperEngine {
    fn load(config: &SpeechConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.model_path);

        let path = config
            .model_path
            .to_str()
            .ok_or_else(|| ChatError::ModelLoad("Invalid model path".to_string()))?;

        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| ChatError::ModelLoad(format!("Failed to load Whisper model: {:?}", e)))?;

        info!("Whisper model loaded");
        Ok(Self {
            context,
            language: config.language.clone(),
            n_threads: config.n_threads,
        })
    }

    /// Transcribe 16 kHz mono samples
    fn transcribe(&self, samples: &[f32]) -> Result<String> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.n_threads);
        params.set_translate(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_language(self.language.as_deref());

        let mut state = self
            .context
            .create_state()
            .map_err(|e| ChatError::Transcription(format!("Failed to create state: {:?}", e)))?;

        state
            .full(params, samples)
            .map_err(|e| ChatError::Transcription(format!("Transcription failed: {:?}", e)))?;

        let segments = state
            .full_n_segments()
            .map_err(|e| ChatError::Transcription(format!("Failed to get segments: {:?}", e)))?;

        let mut text = String::new();
        for i in 0..segments {
            let segment = state.full_get_segment_text(i).map_err(|e| {
                ChatError::Transcription(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment);
        }

        Ok(text.trim().to_string())
    }
}

struct Worker {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

pub struct WhisperSpeechProvider {
    config: SpeechConfig,
    engine: Option<Arc<WhisperEngine>>,
    reset: PendingReset,
    worker: Option<Worker>,
}

/// Replacement transcript sink handed to the worker by `reset`
type PendingReset = Arc<Mutex<Option<Sender<String>>>>;

impl WhisperSpeechProvider {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            config,
            engine: None,
            reset: Arc::new(Mutex::new(None)),
            worker: None,
        }
    }

    fn engine(&mut self) -> Result<Arc<WhisperEngine>> {
        if let Some(engine) = &self.engine {
            return Ok(Arc::clone(engine));
        }
        let engine = Arc::new(WhisperEngine::load(&self.config)?);
        self.engine = Some(Arc::clone(&engine));
        Ok(engine)
    }
}

impl SpeechProvider for WhisperSpeechProvider {
    fn is_supported(&self) -> bool {
        self.config.enabled && self.config.model_path.exists() && input_device_available()
    }

    fn start(&mut self, continuous: bool, transcripts: Sender<String>) -> Result<()> {
        if self.worker.is_some() {
            self.stop()?;
        }

        let engine = self.engine()?;
        let stop = Arc::new(AtomicBool::new(false));
        *self.reset.lock() = None;

        let run = DictationRun {
            engine,
            interval: self.config.transcribe_interval(),
            continuous,
            stop: Arc::clone(&stop),
            reset: Arc::clone(&self.reset),
            transcripts,
        };

        // The worker reports whether the microphone opened before we return
        let (ready_tx, ready_rx) = bounded(1);
        let thread = std::thread::Builder::new()
            .name("chatpane-dictation".to_string())
            .spawn(move || run.run(ready_tx))
            .map_err(|e| ChatError::AudioDevice(format!("Failed to spawn dictation worker: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.worker = Some(Worker { stop, thread });
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(ChatError::Channel("Dictation worker exited during startup".to_string()))
            }
        }
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::SeqCst);
            worker
                .thread
                .join()
                .map_err(|_| ChatError::Channel("Dictation worker panicked".to_string()))?;
        }
        Ok(())
    }

    fn reset(&mut self, transcripts: Sender<String>) {
        *self.reset.lock() = Some(transcripts);
    }

    fn name(&self) -> &str {
        "whisper"
    }
}

impl Drop for WhisperSpeechProvider {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Failed to stop dictation worker: {}", e);
        }
    }
}

/// Everything one dictation worker thread needs
struct DictationRun {
    engine: Arc<WhisperEngine>,
    interval: Duration,
    continuous: bool,
    stop: Arc<AtomicBool>,
    reset: PendingReset,
    transcripts: Sender<String>,
}

impl DictationRun {
    fn run(self, ready_tx: Sender<Result<()>>) {
        let (samples_tx, samples_rx) = bounded(256);

        let mut mic = match Microphone::new().and_then(|mut mic| {
            mic.start(samples_tx)?;
            Ok(mic)
        }) {
            Ok(mic) => mic,
            Err(e) => {
                error!("Failed to open microphone: {}", e);
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        let _ = ready_tx.send(Ok(()));

        let sample_rate = mic.sample_rate();
        self.capture_loop(&samples_rx, sample_rate);

        mic.stop();
        debug!("Dictation worker finished");
    }

    fn capture_loop(&self, samples_rx: &Receiver<Vec<f32>>, sample_rate: u32) {
        let mut utterance: Vec<f32> = Vec::new();
        let mut transcribed_len = 0usize;
        let mut last_text = String::new();
        let mut next_pass = Instant::now() + self.interval;
        let mut transcripts = self.transcripts.clone();

        while !self.stop.load(Ordering::SeqCst) {
            if let Some(fresh) = self.reset.lock().take() {
                transcripts = fresh;
                utterance.clear();
                transcribed_len = 0;
                last_text.clear();
            }

            let timeout = next_pass.saturating_duration_since(Instant::now());
            match samples_rx.recv_timeout(timeout) {
                Ok(chunk) => utterance.extend_from_slice(&chunk),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if Instant::now() < next_pass {
                continue;
            }
            next_pass = Instant::now() + self.interval;

            let new_secs = (utterance.len() - transcribed_len) as f32 / sample_rate as f32;
            if new_secs < MIN_NEW_AUDIO_SECS {
                // A pause after some words ends a single utterance
                if !self.continuous && !last_text.is_empty() {
                    break;
                }
                continue;
            }
            transcribed_len = utterance.len();

            let text = match resample_mono(&utterance, sample_rate, WHISPER_SAMPLE_RATE)
                .and_then(|samples| self.engine.transcribe(&samples))
            {
                Ok(text) => text,
                Err(e) => {
                    warn!("Dictation pass failed: {}", e);
                    continue;
                }
            };

            if text.is_empty() || text == last_text {
                continue;
            }
            debug!("Dictation transcript: '{}'", text);
            if transcripts.send(text.clone()).is_err() {
                // A reset mid-pass already swapped the sink in
                if self.reset.lock().is_some() {
                    continue;
                }
                // The capture went away
                break;
            }
            last_text = text;

            let total_secs = utterance.len() as f32 / sample_rate as f32;
            if !self.continuous && total_secs >= MAX_UTTERANCE_SECS {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_model_is_unsupported() {
        let config = SpeechConfig {
            model_path: PathBuf::from("/nonexistent/ggml-model.bin"),
            ..SpeechConfig::default()
        };
        let provider = WhisperSpeechProvider::new(config);
        assert!(!provider.is_supported());
    }

    #[test]
    fn test_disabled_is_unsupported() {
        let config = SpeechConfig {
            enabled: false,
            ..SpeechConfig::default()
        };
        assert!(!WhisperSpeechProvider::new(config).is_supported());
    }
}
