//! Voice resolution: mapping (voice, quality) pairs to model artifacts.
//!
//! Piper voices live on the Hugging Face Hub under `rhasspy/piper-voices`,
//! one `.onnx` model plus one `.onnx.json` config per (voice, quality)
//! combination. File names follow a fixed convention:
//!
//! ```text
//! {lang}/{locale}/{voice}/{quality}/{locale}-{voice}-{quality}.onnx
//! {lang}/{locale}/{voice}/{quality}/{locale}-{voice}-{quality}.onnx.json
//! ```
//!
//! e.g. `en/en_US/lessac/medium/en_US-lessac-medium.onnx`. The Hub client
//! caches downloads, so resolving the same spec twice hits the local cache
//! without a second network fetch.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use hf_hub::api::sync::Api;

/// Hub repository holding all Piper voice artifacts.
pub const HUB_REPO: &str = "rhasspy/piper-voices";

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("unknown voice '{0}'. Known voices: lessac, northern_english_male")]
    UnknownVoice(String),
    #[error("unknown quality '{0}'. Known tiers: x_low, low, medium, high")]
    UnknownQuality(String),
    #[error("failed to fetch '{file}' from rhasspy/piper-voices: {source}")]
    Fetch {
        file: String,
        #[source]
        source: hf_hub::api::sync::ApiError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Known Piper voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Voice {
    /// American English, female (`en_US`)
    Lessac,
    /// British English, male (`en_GB`)
    NorthernEnglishMale,
}

impl Voice {
    /// Voice identifier as used in Hub paths and output file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Lessac => "lessac",
            Voice::NorthernEnglishMale => "northern_english_male",
        }
    }

    /// Locale code, e.g. `en_US`.
    pub fn locale(&self) -> &'static str {
        match self {
            Voice::Lessac => "en_US",
            Voice::NorthernEnglishMale => "en_GB",
        }
    }

    /// Directory prefix inside the Hub repository, e.g. `en/en_US/lessac`.
    pub fn repo_subpath(&self) -> String {
        let lang = &self.locale()[..2];
        format!("{}/{}/{}", lang, self.locale(), self.as_str())
    }

    /// Canonical artifact name prefix, e.g. `en_US-lessac`.
    pub fn canonical_name(&self) -> String {
        format!("{}-{}", self.locale(), self.as_str())
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "lessac" => Ok(Voice::Lessac),
            "northern_english_male" => Ok(Voice::NorthernEnglishMale),
            _ => Err(ResolveError::UnknownVoice(s.to_string())),
        }
    }
}

/// Quality tiers published for Piper voices.
///
/// Not every voice publishes every tier; an unpublished combination surfaces
/// as [`ResolveError::Fetch`] when resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    XLow,
    Low,
    Medium,
    High,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::XLow => "x_low",
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "x_low" | "xlow" => Ok(Quality::XLow),
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            _ => Err(ResolveError::UnknownQuality(s.to_string())),
        }
    }
}

/// One benchmark configuration: a voice at a quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceSpec {
    pub voice: Voice,
    pub quality: Quality,
}

/// Locally cached model files for one voice configuration.
///
/// Produced by [`VoiceSpec::resolve`] and owned by the benchmark runner for
/// the lifetime of one configuration's run. Not mutated after creation.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    /// Local path of the `.onnx` model file.
    pub model_path: PathBuf,
    /// Local path of the companion `.onnx.json` voice config.
    pub config_path: PathBuf,
    pub model_size_bytes: u64,
    pub config_size_bytes: u64,
}

impl VoiceSpec {
    pub fn new(voice: Voice, quality: Quality) -> Self {
        Self { voice, quality }
    }

    /// Hub-relative path of the model file, per the naming convention.
    pub fn model_filename(&self) -> String {
        format!(
            "{}/{}/{}-{}.onnx",
            self.voice.repo_subpath(),
            self.quality,
            self.voice.canonical_name(),
            self.quality
        )
    }

    /// Hub-relative path of the companion voice config.
    pub fn config_filename(&self) -> String {
        format!("{}.json", self.model_filename())
    }

    /// Filesystem-safe identifier, e.g. `lessac_medium`. Used for output
    /// directory and sample file names.
    pub fn slug(&self) -> String {
        format!("{}_{}", self.voice, self.quality)
    }

    /// Fetch the model and its config from the Hub, returning local paths.
    ///
    /// Downloads go through the Hub client's cache, so repeated resolution of
    /// the same spec in one process (or across processes) re-uses the cached
    /// files. Transient network failures and missing artifacts both surface
    /// as [`ResolveError::Fetch`]; there is no automatic retry.
    pub fn resolve(&self) -> Result<ModelArtifact, ResolveError> {
        let api = Api::new().map_err(|source| ResolveError::Fetch {
            file: self.model_filename(),
            source,
        })?;
        let repo = api.model(HUB_REPO.to_string());

        log::info!("resolving {} from {}", self.model_filename(), HUB_REPO);
        let model_path = repo
            .get(&self.model_filename())
            .map_err(|source| ResolveError::Fetch {
                file: self.model_filename(),
                source,
            })?;
        let config_path = repo
            .get(&self.config_filename())
            .map_err(|source| ResolveError::Fetch {
                file: self.config_filename(),
                source,
            })?;

        let model_size_bytes = std::fs::metadata(&model_path)?.len();
        let config_size_bytes = std::fs::metadata(&config_path)?.len();
        log::info!(
            "resolved {} ({} bytes) and config ({} bytes)",
            model_path.display(),
            model_size_bytes,
            config_size_bytes
        );

        Ok(ModelArtifact {
            model_path,
            config_path,
            model_size_bytes,
            config_size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lessac_model_filename_follows_hub_convention() {
        let spec = VoiceSpec::new(Voice::Lessac, Quality::Medium);
        assert_eq!(
            spec.model_filename(),
            "en/en_US/lessac/medium/en_US-lessac-medium.onnx"
        );
        assert_eq!(
            spec.config_filename(),
            "en/en_US/lessac/medium/en_US-lessac-medium.onnx.json"
        );
    }

    #[test]
    fn northern_english_male_uses_gb_locale() {
        let spec = VoiceSpec::new(Voice::NorthernEnglishMale, Quality::High);
        assert_eq!(
            spec.model_filename(),
            "en/en_GB/northern_english_male/high/en_GB-northern_english_male-high.onnx"
        );
    }

    #[test]
    fn unknown_voice_fails_to_parse() {
        let err = "narrator".parse::<Voice>().unwrap_err();
        assert!(matches!(err, ResolveError::UnknownVoice(v) if v == "narrator"));
    }

    #[test]
    fn unknown_quality_fails_to_parse() {
        let err = "ultra".parse::<Quality>().unwrap_err();
        assert!(matches!(err, ResolveError::UnknownQuality(q) if q == "ultra"));
    }

    #[test]
    fn voice_and_quality_round_trip_through_strings() {
        for voice in [Voice::Lessac, Voice::NorthernEnglishMale] {
            assert_eq!(voice.as_str().parse::<Voice>().unwrap(), voice);
        }
        for quality in [Quality::XLow, Quality::Low, Quality::Medium, Quality::High] {
            assert_eq!(quality.as_str().parse::<Quality>().unwrap(), quality);
        }
    }

    #[test]
    fn dashed_cli_spellings_parse() {
        assert_eq!(
            "northern-english-male".parse::<Voice>().unwrap(),
            Voice::NorthernEnglishMale
        );
        assert_eq!("x-low".parse::<Quality>().unwrap(), Quality::XLow);
    }

    #[test]
    fn slug_is_filesystem_safe() {
        let spec = VoiceSpec::new(Voice::NorthernEnglishMale, Quality::Medium);
        assert_eq!(spec.slug(), "northern_english_male_medium");
    }
}
