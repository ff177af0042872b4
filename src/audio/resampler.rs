use crate::{ChatError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::trace;

/// Whisper expects 16 kHz mono input
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

const CHUNK_FRAMES: usize = 1024;

/// Resample a mono buffer from `input_rate` to `output_rate`
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == 0 || output_rate == 0 {
        return Err(ChatError::Config(
            "Sample rates must be greater than 0".into(),
        ));
    }
    if input.is_empty() || input_rate == output_rate {
        return Ok(input.to_vec());
    }

    let ratio = output_rate as f64 / input_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_FRAMES, 1)
        .map_err(|e| ChatError::Transcription(format!("Failed to create resampler: {}", e)))?;

    let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);

    for chunk in input.chunks(CHUNK_FRAMES) {
        // SincFixedIn wants exactly CHUNK_FRAMES frames per call
        let mut padded = vec![0.0f32; CHUNK_FRAMES];
        padded[..chunk.len()].copy_from_slice(chunk);

        let planar = resampler
            .process(&[padded], None)
            .map_err(|e| ChatError::Transcription(format!("Resampling failed: {}", e)))?;

        let produced = &planar[0];
        let take = if chunk.len() < CHUNK_FRAMES {
            ((chunk.len() as f64) * ratio).ceil() as usize
        } else {
            produced.len()
        };
        output.extend_from_slice(&produced[..take.min(produced.len())]);
    }

    trace!(
        "Resampled {} samples at {} Hz -> {} samples at {} Hz",
        input.len(),
        input_rate,
        output.len(),
        output_rate
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rates() {
        assert!(resample_mono(&[0.0], 0, 16000).is_err());
        assert!(resample_mono(&[0.0], 48000, 0).is_err());
    }

    #[test]
    fn test_same_rate_is_passthrough() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_mono(&input, 16000, 16000).unwrap(), input);
    }

    #[test]
    fn test_downsampling_shrinks() {
        let input: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_mono(&input, 48000, WHISPER_SAMPLE_RATE).unwrap();
        assert!(!output.is_empty());
        assert!(output.len() < input.len());
    }
}
