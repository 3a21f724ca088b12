//! Piper text-to-speech engine adapter.
//!
//! This module wraps the `piper-rs` inference crate behind the harness's
//! [`SynthesisEngine`](crate::SynthesisEngine) trait. The engine itself is
//! opaque to the benchmark: it takes a voice model plus text and returns
//! audio samples, which the adapter packages as a WAV container.
//!
//! # Model Files
//!
//! Each voice configuration is two files, fetched by the
//! [voice resolver](crate::voices):
//!
//! ```text
//! en_US-lessac-medium.onnx        # ONNX voice model (~60 MB for medium)
//! en_US-lessac-medium.onnx.json   # voice config (phoneme map, sample rate)
//! ```
//!
//! Source: <https://huggingface.co/rhasspy/piper-voices>
//!
//! # Output Format
//!
//! Piper voices emit mono 16-bit PCM at 22050 Hz by convention. The adapter
//! reads the advertised rate from the voice config and warns when it differs,
//! since the harness's duration math assumes the conventional format.
//!
//! # Examples
//!
//! ```rust,no_run
//! use piper_bench::engines::piper::PiperEngine;
//! use piper_bench::voices::{Quality, Voice, VoiceSpec};
//! use piper_bench::SynthesisEngine;
//!
//! let artifact = VoiceSpec::new(Voice::Lessac, Quality::Medium).resolve()?;
//!
//! let mut engine = PiperEngine::new();
//! engine.load_model(&artifact)?;
//! let result = engine.synthesize("Hello, world!")?;
//! println!("{} container bytes at {}Hz", result.audio.len(), result.sample_rate);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;

pub use engine::{PiperEngine, PiperError};
