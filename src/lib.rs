//! # piper-bench
//!
//! A benchmark harness for Piper text-to-speech voices.
//!
//! ## Features
//!
//! - **Voice resolution**: Maps (voice, quality) pairs to model artifacts on
//!   the Hugging Face Hub, with local caching
//! - **Timed synthesis**: Per-sentence wall-clock timing and real-time-factor
//!   derivation over a fixed test corpus
//! - **Comparison tables**: Aggregated speed/size reports across multiple
//!   voice configurations
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! piper-bench = { version = "0.1", features = ["piper"] }
//! ```
//!
//! ```ignore
//! use piper_bench::engines::piper::PiperEngine;
//! use piper_bench::voices::{Quality, Voice, VoiceSpec};
//! use piper_bench::{bench, SynthesisEngine};
//!
//! let spec = VoiceSpec::new(Voice::Lessac, Quality::Medium);
//! let artifact = spec.resolve()?;
//!
//! let mut engine = PiperEngine::new();
//! let corpus = ["Hello, world!"];
//! let report = bench::run_configuration(
//!     spec,
//!     &artifact,
//!     &mut engine,
//!     &corpus,
//!     std::path::Path::new("piper_test_output"),
//! )?;
//! println!("avg RTF: {:.3}", report.avg_rtf());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bench;
pub mod engines;
pub mod voices;

use std::path::Path;

use crate::voices::ModelArtifact;

/// The result of a synthesis (text-to-speech) operation.
///
/// Contains the audio as a complete WAV container (44-byte header followed by
/// 16-bit mono PCM) and the sample rate of the output audio.
#[derive(Debug)]
pub struct SynthesisResult {
    /// WAV container bytes, written to disk verbatim.
    pub audio: Vec<u8>,
    /// Sample rate of the audio (22050 for Piper voices)
    pub sample_rate: u32,
}

impl SynthesisResult {
    /// Write the container bytes to a WAV file, unmodified.
    pub fn write_wav(&self, path: &Path) -> Result<(), std::io::Error> {
        std::fs::write(path, &self.audio)
    }
}

/// Common interface for text-to-speech synthesis engines.
///
/// The benchmark harness treats the engine as an opaque text-to-audio-bytes
/// collaborator: one model load per configuration, then one `synthesize` call
/// per sentence on the same handle. The adapter performs no text
/// preprocessing, batching, or caching of its own.
pub trait SynthesisEngine {
    /// Load a model from the resolved artifact paths.
    fn load_model(&mut self, artifact: &ModelArtifact) -> Result<(), Box<dyn std::error::Error>>;

    /// Unload the currently loaded model and free associated resources.
    fn unload_model(&mut self);

    /// Synthesize speech from the given non-empty text.
    fn synthesize(&mut self, text: &str) -> Result<SynthesisResult, Box<dyn std::error::Error>>;

    /// Synthesize speech from the given text and write to a WAV file.
    ///
    /// Default implementation calls `synthesize()` then `SynthesisResult::write_wav()`.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        wav_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.synthesize(text)?.write_wav(wav_path)?;
        Ok(())
    }
}
