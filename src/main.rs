use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tenbaset_rs::capture::{self, LoadOptions};
use tenbaset_rs::config::{DecoderConfig, ResyncConfig};
use tenbaset_rs::phy::{SynthOptions, synthesize};
use tenbaset_rs::ui::{self, progress};
use tenbaset_rs::utils::consts::*;
use tenbaset_rs::utils::logging::init_logging;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a scope capture (CSV or WAV) into bytes
    Decode(DecodeArgs),
    /// Generate a synthetic 10BASE-T capture for a payload
    Synth(SynthArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    FixedWindow,
    IdealPosition,
    DriftTracking,
}

impl Strategy {
    fn default_config(self) -> ResyncConfig {
        match self {
            Strategy::FixedWindow => ResyncConfig::default_fixed_window(),
            Strategy::IdealPosition => ResyncConfig::default_ideal_position(),
            Strategy::DriftTracking => ResyncConfig::default_drift_tracking(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct DecodeArgs {
    /// Capture file; `.wav` is read as audio, anything else as CSV
    capture: PathBuf,

    /// JSON decoder configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start-of-signal voltage (negative)
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f32>,

    /// Sample rate in MSa/s
    #[arg(short, long)]
    sample_rate: Option<f32>,

    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Fixed-window tolerance in samples
    #[arg(short, long)]
    window: Option<usize>,

    /// Ideal-position lower bound (fraction of a bit)
    #[arg(long)]
    min_spacing: Option<f32>,

    /// Ideal-position upper bound (fraction of a bit)
    #[arg(long)]
    max_spacing: Option<f32>,

    /// Drift-tracking resync walk limit in samples
    #[arg(long)]
    max_walk: Option<usize>,

    /// CSV column holding the voltage
    #[arg(long, default_value_t = DEFAULT_VALUE_COLUMN)]
    column: usize,

    /// Multiplier for normalized WAV samples
    #[arg(long, default_value_t = DEFAULT_WAV_SCALE)]
    wav_scale: f32,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also print the raw decoded bits
    #[arg(long)]
    bits: bool,
}

impl DecodeArgs {
    fn decoder_config(&self) -> Result<DecoderConfig> {
        let mut config = match &self.config {
            Some(path) => DecoderConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => DecoderConfig::default(),
        };
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate_mhz = sample_rate;
        }

        let mut resync = match self.strategy {
            Some(kind) if kind.default_config().name() != config.resync.name() => {
                kind.default_config()
            }
            _ => config.resync,
        };
        for flag in self.ignored_flags(&resync) {
            warn!("{} does not apply to {}, ignoring it", flag, resync.name());
        }
        match &mut resync {
            ResyncConfig::FixedWindow { window } => {
                if let Some(w) = self.window {
                    *window = w;
                }
            }
            ResyncConfig::IdealPosition {
                min_spacing,
                max_spacing,
            } => {
                if let Some(min) = self.min_spacing {
                    *min_spacing = min;
                }
                if let Some(max) = self.max_spacing {
                    *max_spacing = max;
                }
            }
            ResyncConfig::DriftTracking { max_walk } => {
                if self.max_walk.is_some() {
                    *max_walk = self.max_walk;
                }
            }
        }
        Ok(config.with_resync(resync))
    }

    /// Tolerance flags given for a strategy other than the selected one
    fn ignored_flags(&self, resync: &ResyncConfig) -> Vec<&'static str> {
        let given = [
            ("--window", self.window.is_some(), "fixed-window"),
            ("--min-spacing", self.min_spacing.is_some(), "ideal-position"),
            ("--max-spacing", self.max_spacing.is_some(), "ideal-position"),
            ("--max-walk", self.max_walk.is_some(), "drift-tracking"),
        ];
        given
            .into_iter()
            .filter(|&(_, set, owner)| set && owner != resync.name())
            .map(|(flag, _, _)| flag)
            .collect()
    }
}

#[derive(Args)]
struct SynthArgs {
    /// Output file; `.wav` writes 16-bit PCM, anything else CSV
    #[arg(short, long)]
    output: PathBuf,

    /// Payload as hex, e.g. 48656c6c6f
    #[arg(long, conflicts_with = "text")]
    hex: Option<String>,

    /// Payload as UTF-8 text
    #[arg(long)]
    text: Option<String>,

    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_RATE_MHZ)]
    sample_rate: f32,

    #[arg(long, default_value_t = DEFAULT_AMPLITUDE)]
    amplitude: f32,

    /// Quiet samples before and after the frame
    #[arg(long, default_value_t = DEFAULT_IDLE_SAMPLES)]
    idle: usize,

    /// Uniform noise amplitude
    #[arg(long, default_value_t = 0.0)]
    noise: f32,

    /// Relative bit period error (0.01 = 1% slow)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    drift: f32,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Full-scale voltage for WAV output
    #[arg(long, default_value_t = DEFAULT_WAV_SCALE)]
    wav_scale: f32,
}

fn decode(args: DecodeArgs) -> Result<()> {
    let config = args.decoder_config()?;
    let text = args.format == OutputFormat::Text;

    let spinner = progress::spinner(
        progress::templates::LOADING,
        &args.capture.display().to_string(),
        text,
    );
    let options = LoadOptions {
        column: args.column,
        wav_scale: args.wav_scale,
    };
    let loaded = capture::load_capture(&args.capture, &options);
    spinner.finish_and_clear();
    let waveform = loaded.with_context(|| format!("loading {}", args.capture.display()))?;

    let report = match tenbaset_rs::run(&waveform, &config) {
        Ok(report) => report,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    if text {
        if args.bits {
            for line in ui::bit_lines(&report.bits) {
                println!("{}", line);
            }
        }
        for line in ui::octet_lines(&report) {
            println!("{}", line);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!(
        "{} bytes decoded, {} trailing bits dropped",
        report.octets.len(),
        report.dropped_bits
    );
    Ok(())
}

fn synth(args: SynthArgs) -> Result<()> {
    let payload = match (&args.hex, &args.text) {
        (Some(h), _) => hex::decode(h.trim()).context("payload is not valid hex")?,
        (None, Some(t)) => t.as_bytes().to_vec(),
        (None, None) => bail!("give a payload with --hex or --text"),
    };

    let options = SynthOptions {
        sample_rate_mhz: args.sample_rate,
        amplitude: args.amplitude,
        idle_samples: args.idle,
        noise: args.noise,
        drift: args.drift,
        seed: args.seed,
        ..SynthOptions::default()
    };
    let voltages = synthesize(&payload, &options)?;

    let spinner = progress::spinner(
        progress::templates::WRITING,
        &args.output.display().to_string(),
        true,
    );
    let written = if capture::is_wav(&args.output) {
        let sample_rate = (args.sample_rate * 1e6) as u32;
        capture::write_wav(&args.output, &voltages, sample_rate, args.wav_scale)
    } else {
        capture::write_csv(&args.output, &voltages, args.sample_rate)
    };
    spinner.finish_and_clear();
    written.with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        "Wrote {} samples ({} payload bytes) to {}",
        voltages.len(),
        payload.len(),
        args.output.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match &cli.command {
        Commands::Decode(args) if args.format == OutputFormat::Json => "warn",
        _ => LOG_LEVEL,
    };
    init_logging(level);

    match cli.command {
        Commands::Decode(args) => {
            if args.format == OutputFormat::Text {
                ui::print_banner();
            }
            decode(args)
        }
        Commands::Synth(args) => synth(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_args(args: &[&str]) -> DecodeArgs {
        let argv = ["tenbaset-rs", "decode", "capture.csv"].iter().chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Decode(args) => args,
            Commands::Synth(_) => panic!("parsed as synth"),
        }
    }

    #[test]
    fn test_flags_for_other_strategies_are_reported() {
        let args = decode_args(&[
            "--strategy",
            "drift-tracking",
            "--window",
            "4",
            "--max-walk",
            "5",
        ]);
        let config = args.decoder_config().unwrap();
        assert_eq!(config.resync, ResyncConfig::DriftTracking { max_walk: Some(5) });
        assert_eq!(args.ignored_flags(&config.resync), vec!["--window"]);
    }

    #[test]
    fn test_matching_flags_override_defaults() {
        let args = decode_args(&["--strategy", "ideal-position", "--max-spacing", "1.5"]);
        let config = args.decoder_config().unwrap();
        assert_eq!(
            config.resync,
            ResyncConfig::IdealPosition {
                min_spacing: DEFAULT_MIN_SPACING,
                max_spacing: 1.5
            }
        );
        assert!(args.ignored_flags(&config.resync).is_empty());
    }
}
