//! Benchmark runner: timed synthesis over a sentence corpus.
//!
//! Drives a [`SynthesisEngine`] through an ordered corpus, one configuration
//! at a time, bracketing the blocking model-load and synthesize calls with
//! wall-clock timers. Per-sentence audio is persisted verbatim; duration and
//! real-time factor are derived from the returned container byte length.
//!
//! Everything here is synchronous and sequential. Configurations are
//! independent, so a failure in one only skips that configuration's report
//! when running a multi-configuration comparison.

use std::path::Path;
use std::time::Instant;

use crate::voices::{ModelArtifact, ResolveError, VoiceSpec};
use crate::SynthesisEngine;

/// Fixed WAV container header length, in bytes.
pub const WAV_HEADER_LEN: usize = 44;

/// Bytes per sample for 16-bit PCM.
pub const BYTES_PER_SAMPLE: u32 = 2;

/// Default Piper output sample rate, used when an engine reports nothing
/// better. Individual results carry their own rate.
pub const PIPER_SAMPLE_RATE: u32 = 22050;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error("failed to resolve voice model: {0}")]
    Resolve(#[from] ResolveError),
    #[error("engine initialization failed: {0}")]
    Init(String),
    #[error("synthesis aborted after {completed} of {total} sentences: {reason}")]
    Synthesis {
        completed: usize,
        total: usize,
        reason: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Derived timing metrics for one synthesized sentence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub audio_duration_secs: f64,
    pub generation_secs: f64,
    /// Real-time factor: generation time over audio duration. Below 1.0 means
    /// faster than real-time playback.
    pub rtf: f64,
}

impl Metrics {
    /// Derive duration and RTF from the container byte length.
    ///
    /// Audio duration is `(container_len - 44) / (sample_rate * 2)` for the
    /// mono 16-bit PCM format Piper emits. A header-only (or truncated)
    /// container yields zero duration, and the RTF is reported as 0 rather
    /// than dividing by zero.
    pub fn derive(container_len: usize, generation_secs: f64, sample_rate: u32) -> Self {
        let payload = container_len.saturating_sub(WAV_HEADER_LEN);
        let audio_duration_secs = payload as f64 / (sample_rate * BYTES_PER_SAMPLE) as f64;
        let rtf = if audio_duration_secs > 0.0 {
            generation_secs / audio_duration_secs
        } else {
            0.0
        };
        Self {
            audio_duration_secs,
            generation_secs,
            rtf,
        }
    }
}

/// Aggregated results for one voice configuration.
///
/// Accumulated incrementally while the corpus runs, finalized at the end of
/// the configuration, then appended to the session's ordered report list.
#[derive(Debug, Clone)]
pub struct ConfigurationReport {
    pub spec: VoiceSpec,
    pub model_size_mb: f64,
    pub config_size_mb: f64,
    pub init_secs: f64,
    /// Number of sentences actually synthesized. Smaller than the corpus when
    /// a synthesis error aborted the loop early.
    pub sentences: usize,
    pub total_audio_secs: f64,
    pub total_generation_secs: f64,
    /// Error message of the synthesis failure that cut the run short, if any.
    /// The totals above still cover the sentences completed before it.
    pub failure: Option<String>,
}

impl ConfigurationReport {
    /// Average real-time factor across the whole run. Reported as 0 when no
    /// audio was produced.
    pub fn avg_rtf(&self) -> f64 {
        if self.total_audio_secs > 0.0 {
            self.total_generation_secs / self.total_audio_secs
        } else {
            0.0
        }
    }

    /// Average generation time per synthesized sentence.
    pub fn avg_secs_per_sentence(&self) -> f64 {
        if self.sentences > 0 {
            self.total_generation_secs / self.sentences as f64
        } else {
            0.0
        }
    }
}

/// Run one voice configuration over the corpus.
///
/// Creates `<output_root>/<voice>_<quality>/` (idempotent), loads the model
/// with timing, then synthesizes each sentence in corpus order, persisting
/// `piper_<voice>_<quality>_sample_<n>.wav` with 1-based numbering.
///
/// A synthesis failure mid-corpus stops the loop but still returns the
/// report for the sentences completed so far, with
/// [`ConfigurationReport::failure`] set. Initialization and I/O failures are
/// returned as errors.
pub fn run_configuration<E: SynthesisEngine>(
    spec: VoiceSpec,
    artifact: &ModelArtifact,
    engine: &mut E,
    corpus: &[&str],
    output_root: &Path,
) -> Result<ConfigurationReport, BenchError> {
    let out_dir = output_root.join(spec.slug());
    std::fs::create_dir_all(&out_dir)?;

    println!("\n{}", "=".repeat(60));
    println!(
        "Testing Piper TTS (Voice: {}, Quality: {})",
        spec.voice, spec.quality
    );
    println!("{}\n", "=".repeat(60));

    println!("Initializing Piper TTS...");
    let init_start = Instant::now();
    engine
        .load_model(artifact)
        .map_err(|e| BenchError::Init(e.to_string()))?;
    let init_secs = init_start.elapsed().as_secs_f64();
    println!("✓ Initialization took: {init_secs:.3}s");

    let model_size_mb = artifact.model_size_bytes as f64 / BYTES_PER_MB;
    let config_size_mb = artifact.config_size_bytes as f64 / BYTES_PER_MB;
    println!("\nModel size: {model_size_mb:.2} MB");
    println!("Config size: {config_size_mb:.2} MB");
    println!("Total size: {:.2} MB", model_size_mb + config_size_mb);

    println!("\n{}", "=".repeat(60));
    println!("Generating audio samples...");
    println!("{}\n", "=".repeat(60));

    let mut report = ConfigurationReport {
        spec,
        model_size_mb,
        config_size_mb,
        init_secs,
        sentences: 0,
        total_audio_secs: 0.0,
        total_generation_secs: 0.0,
        failure: None,
    };

    for (i, text) in corpus.iter().enumerate() {
        let n = i + 1;
        println!("\n[{n}/{}] \"{text}\"", corpus.len());

        let start = Instant::now();
        let result = match engine.synthesize(text) {
            Ok(result) => result,
            Err(e) => {
                log::error!("synthesis failed on sentence {n}: {e}");
                report.failure = Some(e.to_string());
                break;
            }
        };
        let generation_secs = start.elapsed().as_secs_f64();

        let out_file = out_dir.join(format!("piper_{}_sample_{n}.wav", spec.slug()));
        result.write_wav(&out_file)?;

        let metrics = Metrics::derive(result.audio.len(), generation_secs, result.sample_rate);
        if metrics.audio_duration_secs == 0.0 {
            log::warn!("sentence {n} produced a header-only container; RTF reported as 0");
        }
        report.sentences += 1;
        report.total_audio_secs += metrics.audio_duration_secs;
        report.total_generation_secs += metrics.generation_secs;

        println!("  ✓ Generated in: {:.3}s", metrics.generation_secs);
        println!("  ✓ Audio duration: {:.2}s", metrics.audio_duration_secs);
        println!(
            "  ✓ RTF: {:.3} ({} than real-time)",
            metrics.rtf,
            if metrics.rtf < 1.0 { "faster" } else { "slower" }
        );
        println!("  ✓ Saved to: {}", out_file.display());
    }

    print_summary(&report, &out_dir);
    Ok(report)
}

fn print_summary(report: &ConfigurationReport, out_dir: &Path) {
    println!("\n{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Voice: {}", report.spec.voice);
    println!("Quality level: {}", report.spec.quality);
    println!("Total sentences: {}", report.sentences);
    if let Some(failure) = &report.failure {
        println!("Aborted early by synthesis failure: {failure}");
    }
    println!("Total audio duration: {:.2}s", report.total_audio_secs);
    println!("Total generation time: {:.3}s", report.total_generation_secs);
    println!("Average RTF: {:.3}", report.avg_rtf());
    println!(
        "Average generation time per sentence: {:.3}s",
        report.avg_secs_per_sentence()
    );
    println!("\nAll samples saved to: {}", out_dir.display());
    println!("{}\n", "=".repeat(60));
}

/// Run several configurations back to back, collecting reports in the order
/// the configurations were given.
///
/// A configuration whose resolution or initialization fails is logged and
/// skipped; the remaining configurations still run. Sentence-level failures
/// produce partial reports, which are kept.
///
/// `resolve` and `make_engine` are injected so tests can substitute a fake
/// artifact store and engine.
pub fn run_comparison<E, R, F>(
    specs: &[VoiceSpec],
    corpus: &[&str],
    output_root: &Path,
    mut resolve: R,
    mut make_engine: F,
) -> Vec<ConfigurationReport>
where
    E: SynthesisEngine,
    R: FnMut(&VoiceSpec) -> Result<ModelArtifact, ResolveError>,
    F: FnMut() -> E,
{
    let mut reports = Vec::new();
    for spec in specs {
        let artifact = match resolve(spec) {
            Ok(artifact) => artifact,
            Err(e) => {
                log::error!("skipping configuration {}: {e}", spec.slug());
                continue;
            }
        };
        let mut engine = make_engine();
        match run_configuration(*spec, &artifact, &mut engine, corpus, output_root) {
            Ok(report) => reports.push(report),
            Err(e) => log::error!("configuration {} failed: {e}", spec.slug()),
        }
    }
    reports
}

/// Print the fixed-width comparison table, one row per report, preserving
/// the order reports were collected in.
pub fn print_comparison_table(reports: &[ConfigurationReport]) {
    println!("\n{}", "=".repeat(80));
    println!("COMPARISON TABLE");
    println!("{}", "=".repeat(80));
    println!(
        "{:<25} {:<10} {:<12} {:<10} {:<15}",
        "Voice", "Quality", "Size (MB)", "Avg RTF", "Avg Time/Sent"
    );
    println!("{}", "-".repeat(80));
    for report in reports {
        println!(
            "{:<25} {:<10} {:<12.2} {:<10.3} {:<15.3}",
            report.spec.voice.as_str(),
            report.spec.quality.as_str(),
            report.model_size_mb,
            report.avg_rtf(),
            report.avg_secs_per_sentence()
        );
    }
    println!("{}", "=".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rtf_derivation_matches_worked_example() {
        // 88244 bytes - 44 header = 88200 payload = 2.0s at 22050 Hz, 16-bit
        let m = Metrics::derive(88244, 0.5, 22050);
        assert!((m.audio_duration_secs - 2.0).abs() < 1e-9);
        assert!((m.rtf - 0.25).abs() < 1e-9);
    }

    #[test]
    fn header_only_container_reports_zero_rtf() {
        let m = Metrics::derive(WAV_HEADER_LEN, 0.5, 22050);
        assert_eq!(m.audio_duration_secs, 0.0);
        assert_eq!(m.rtf, 0.0);
    }

    #[test]
    fn truncated_container_saturates_instead_of_underflowing() {
        let m = Metrics::derive(10, 0.5, 22050);
        assert_eq!(m.audio_duration_secs, 0.0);
        assert_eq!(m.rtf, 0.0);
    }

    #[test]
    fn avg_rtf_is_total_generation_over_total_audio() {
        let report = ConfigurationReport {
            spec: VoiceSpec::new(crate::voices::Voice::Lessac, crate::voices::Quality::Medium),
            model_size_mb: 60.0,
            config_size_mb: 0.01,
            init_secs: 1.0,
            sentences: 4,
            total_audio_secs: 8.0,
            total_generation_secs: 2.0,
            failure: None,
        };
        assert!((report.avg_rtf() - 0.25).abs() < 1e-9);
        assert!((report.avg_secs_per_sentence() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_report_averages_are_zero_guarded() {
        let report = ConfigurationReport {
            spec: VoiceSpec::new(crate::voices::Voice::Lessac, crate::voices::Quality::Low),
            model_size_mb: 0.0,
            config_size_mb: 0.0,
            init_secs: 0.0,
            sentences: 0,
            total_audio_secs: 0.0,
            total_generation_secs: 0.0,
            failure: Some("engine exploded".into()),
        };
        assert_eq!(report.avg_rtf(), 0.0);
        assert_eq!(report.avg_secs_per_sentence(), 0.0);
    }
}
