use crate::{ChatError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

/// Whether the default host exposes an input device at all
pub fn input_device_available() -> bool {
    cpal::default_host().default_input_device().is_some()
}

/// Default input device delivering mono `f32` chunks.
///
/// The underlying stream is not `Send` on every platform, so a
/// `Microphone` lives on the thread that created it.
pub struct Microphone {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl Microphone {
    /// Open the default input device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| ChatError::AudioDevice("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| ChatError::AudioDevice(format!("Failed to get input config: {}", e)))?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start streaming mono samples into `samples_tx`
    pub fn start(&mut self, samples_tx: Sender<Vec<f32>>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = samples_tx.try_send(samples) {
                        debug!("Dropping microphone chunk: {}", e);
                    }
                },
                |err| error!("Microphone stream error: {}", err),
                None,
            )
            .map_err(|e| ChatError::AudioDevice(format!("Failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| ChatError::AudioDevice(format!("Failed to start input stream: {}", e)))?;

        self.stream = Some(stream);
        info!("Microphone capture started");
        Ok(())
    }

    /// Stop streaming and release the device
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            info!("Microphone capture stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for Microphone {
    fn drop(&mut self) {
        self.stop();
    }
}
