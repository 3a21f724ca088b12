use std::io::Cursor;
use std::path::Path;

use piper_rs::synth::PiperSpeechSynthesizer;
use serde::Deserialize;

use crate::bench::PIPER_SAMPLE_RATE;
use crate::voices::ModelArtifact;
use crate::{SynthesisEngine, SynthesisResult};

#[derive(thiserror::Error, Debug)]
pub enum PiperError {
    #[error("model not loaded. Call load_model() first.")]
    ModelNotLoaded,
    #[error("cannot synthesize empty text")]
    EmptyText,
    #[error("failed to load Piper voice: {0}")]
    ModelLoad(String),
    #[error("Piper synthesis failed: {0}")]
    Synthesis(String),
    #[error("invalid voice config '{path}': {reason}")]
    Config { path: String, reason: String },
    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Relevant subset of the Piper `.onnx.json` voice config.
#[derive(Debug, Deserialize)]
struct VoiceConfig {
    audio: AudioConfig,
}

#[derive(Debug, Deserialize)]
struct AudioConfig {
    sample_rate: u32,
}

/// Piper text-to-speech engine adapter.
///
/// Wraps a `piper-rs` synthesizer. Loading is done once per voice
/// configuration; the same handle is then reused for every sentence, so
/// model-load cost is paid (and measured) separately from synthesis.
pub struct PiperEngine {
    synth: Option<PiperSpeechSynthesizer>,
    sample_rate: u32,
}

impl Default for PiperEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PiperEngine {
    pub fn new() -> Self {
        Self {
            synth: None,
            sample_rate: PIPER_SAMPLE_RATE,
        }
    }

    /// Sample rate the loaded voice advertises in its config.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_sample_rate(config_path: &Path) -> Result<u32, PiperError> {
        let raw = std::fs::read_to_string(config_path)?;
        let config: VoiceConfig =
            serde_json::from_str(&raw).map_err(|e| PiperError::Config {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(config.audio.sample_rate)
    }
}

impl Drop for PiperEngine {
    fn drop(&mut self) {
        self.unload_model();
    }
}

impl SynthesisEngine for PiperEngine {
    fn load_model(&mut self, artifact: &ModelArtifact) -> Result<(), Box<dyn std::error::Error>> {
        let sample_rate = Self::read_sample_rate(&artifact.config_path)?;
        if sample_rate != PIPER_SAMPLE_RATE {
            // The duration/RTF math elsewhere assumes the conventional Piper
            // output format; a voice with a different rate still benchmarks
            // correctly because results carry their own rate.
            log::warn!(
                "voice advertises {sample_rate} Hz, not the conventional {PIPER_SAMPLE_RATE} Hz"
            );
        }

        log::info!("loading Piper voice from {}", artifact.config_path.display());
        let model = piper_rs::from_config_path(&artifact.config_path)
            .map_err(|e| PiperError::ModelLoad(e.to_string()))?;
        let synth = PiperSpeechSynthesizer::new(model)
            .map_err(|e| PiperError::ModelLoad(e.to_string()))?;

        self.synth = Some(synth);
        self.sample_rate = sample_rate;
        Ok(())
    }

    fn unload_model(&mut self) {
        self.synth = None;
        self.sample_rate = PIPER_SAMPLE_RATE;
    }

    fn synthesize(&mut self, text: &str) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        let synth = self.synth.as_ref().ok_or(PiperError::ModelNotLoaded)?;
        if text.trim().is_empty() {
            return Err(PiperError::EmptyText.into());
        }

        let chunks = synth
            .synthesize_parallel(text.to_string(), None)
            .map_err(|e| PiperError::Synthesis(e.to_string()))?;

        let mut samples: Vec<f32> = Vec::new();
        for chunk in chunks {
            let chunk = chunk.map_err(|e| PiperError::Synthesis(e.to_string()))?;
            samples.extend(chunk.into_vec());
        }

        let audio = encode_wav(&samples, self.sample_rate)?;
        Ok(SynthesisResult {
            audio,
            sample_rate: self.sample_rate,
        })
    }
}

/// Encode f32 samples as an in-memory WAV container (mono, 16-bit PCM).
fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, PiperError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        let amplitude = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(amplitude)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::WAV_HEADER_LEN;

    #[test]
    fn encode_wav_produces_standard_header_plus_payload() {
        let samples = vec![0.0f32; 100];
        let wav = encode_wav(&samples, 22050).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN + 100 * 2);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }

    #[test]
    fn encode_wav_clamps_out_of_range_samples() {
        let wav = encode_wav(&[2.0, -2.0], 22050).unwrap();
        let hi = i16::from_le_bytes([wav[WAV_HEADER_LEN], wav[WAV_HEADER_LEN + 1]]);
        let lo = i16::from_le_bytes([wav[WAV_HEADER_LEN + 2], wav[WAV_HEADER_LEN + 3]]);
        assert_eq!(hi, i16::MAX);
        assert_eq!(lo, -i16::MAX);
    }

    #[test]
    fn synthesize_without_model_is_an_error() {
        let mut engine = PiperEngine::new();
        let err = engine.synthesize("hello").unwrap_err();
        assert!(err.to_string().contains("not loaded"));
    }
}
