//! Speech synthesis engines.
//!
//! This module contains adapters over external text-to-speech engines.
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `piper` - Piper TTS (ONNX voices from the `rhasspy/piper-voices` Hub repo)

#[cfg(feature = "piper")]
pub mod piper;
