use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use piper_bench::bench::{self, BenchError};
use piper_bench::engines::piper::PiperEngine;
use piper_bench::voices::{Quality, Voice, VoiceSpec};

/// Sentences synthesized for every configuration.
const TEST_SENTENCES: &[&str] = &[
    "Hello, world! This is a test of the Piper text to speech system.",
    "The quick brown fox jumps over the lazy dog.",
    "Artificial intelligence is transforming how we interact with technology.",
    "Natural sounding speech synthesis requires careful attention to prosody and intonation.",
];

/// Configurations exercised by `--compare-all`, in table order.
const COMPARISON_MATRIX: &[VoiceSpec] = &[
    VoiceSpec {
        voice: Voice::Lessac,
        quality: Quality::Medium,
    },
    VoiceSpec {
        voice: Voice::NorthernEnglishMale,
        quality: Quality::Medium,
    },
    VoiceSpec {
        voice: Voice::Lessac,
        quality: Quality::High,
    },
];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VoiceArg {
    Lessac,
    NorthernEnglishMale,
}

impl From<VoiceArg> for Voice {
    fn from(arg: VoiceArg) -> Self {
        match arg {
            VoiceArg::Lessac => Voice::Lessac,
            VoiceArg::NorthernEnglishMale => Voice::NorthernEnglishMale,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => Quality::Low,
            QualityArg::Medium => Quality::Medium,
            QualityArg::High => Quality::High,
        }
    }
}

/// Benchmark Piper TTS voices: timing, size and RTF comparison.
#[derive(Debug, Parser)]
#[command(name = "piper-bench", version)]
struct Cli {
    /// Voice to benchmark
    #[arg(long, value_enum, default_value = "lessac")]
    voice: VoiceArg,

    /// Voice quality level
    #[arg(long, value_enum, default_value = "medium")]
    quality: QualityArg,

    /// Benchmark the fixed voice/quality comparison matrix instead of a
    /// single configuration, and print the comparison table.
    /// Ignores --voice and --quality.
    #[arg(long)]
    compare_all: bool,

    /// Root directory for generated WAV files
    #[arg(long, default_value = "piper_test_output")]
    output_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.compare_all {
        run_comparison(&cli.output_dir);
        ExitCode::SUCCESS
    } else {
        let spec = VoiceSpec::new(cli.voice.into(), cli.quality.into());
        match run_single(spec, &cli.output_dir) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

fn run_single(spec: VoiceSpec, output_dir: &Path) -> Result<(), BenchError> {
    println!(
        "Downloading Piper voice model (voice: {}, quality: {})...",
        spec.voice, spec.quality
    );
    let artifact = spec.resolve()?;

    let mut engine = PiperEngine::new();
    let report = bench::run_configuration(spec, &artifact, &mut engine, TEST_SENTENCES, output_dir)?;

    // In single-configuration mode a synthesis failure is terminal.
    if let Some(reason) = report.failure {
        return Err(BenchError::Synthesis {
            completed: report.sentences,
            total: TEST_SENTENCES.len(),
            reason,
        });
    }
    Ok(())
}

fn run_comparison(output_dir: &Path) {
    println!("\n{}", "=".repeat(60));
    println!("PIPER TTS QUALITY & VOICE COMPARISON");
    println!("{}\n", "=".repeat(60));

    let reports = bench::run_comparison(
        COMPARISON_MATRIX,
        TEST_SENTENCES,
        output_dir,
        |spec| {
            println!(
                "Downloading Piper voice model (voice: {}, quality: {})...",
                spec.voice, spec.quality
            );
            spec.resolve()
        },
        PiperEngine::new,
    );

    bench::print_comparison_table(&reports);
    println!("\n🔊 Listen to the WAV files in {} to compare quality", output_dir.display());
}
