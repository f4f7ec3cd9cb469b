// Command-line host
// Reads an event file, strums it with the configured chord and writes it back

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::chords::{self, CATALOG};
use crate::config::{self, ConfigError, StrumConfig};
use crate::events;
use crate::export::{self, ExportError, MidiExportOptions};
use crate::pipeline::{self, TraceError};
use crate::strum::{Arpeggiator, NoteShaping};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Trace failed: {0}")]
    Trace(#[from] TraceError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Parser)]
#[command(name = "chordstrum")]
#[command(about = "Transforms notes into strummed chords", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Strum every NOTE line of an event file
    Apply(ApplyArgs),

    /// List the built-in chord templates
    Templates,

    /// Write the default configuration as JSON
    InitConfig {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Event file to transform (rewritten in place unless --output is given)
    pub input: PathBuf,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to the user config if it exists)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Chord template name, overrides the config
    #[arg(short, long)]
    pub template: Option<String>,

    /// How voice lengths are shaped, overrides the config
    #[arg(short, long, value_enum)]
    pub shaping: Option<ShapingArg>,

    /// Tick gap for every voice
    #[arg(long, allow_negative_numbers = true)]
    pub tick_gap: Option<i64>,

    /// Tick-gap length rate for every voice
    #[arg(long, allow_negative_numbers = true)]
    pub tick_gap_length_rate: Option<f64>,

    /// Velocity gap for every voice
    #[arg(long, allow_negative_numbers = true)]
    pub velocity_gap: Option<i32>,

    /// Length rate for every voice
    #[arg(long)]
    pub length_rate: Option<f64>,

    /// Append per-note decisions to a JSONL trace file
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Also export the strummed notes as a MIDI file
    #[arg(long)]
    pub midi: Option<PathBuf>,

    /// PPQ written to the MIDI file
    #[arg(long, default_value = "480")]
    pub ppq: u16,

    /// Print the result instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapingArg {
    /// Each voice sounds for its length rate times the source length
    Free,

    /// Stretch notes shorter than a beat so the whole chord rings
    Complete,

    /// Never let a voice outlast the source note
    Limited,
}

impl From<ShapingArg> for NoteShaping {
    fn from(arg: ShapingArg) -> Self {
        match arg {
            ShapingArg::Free => NoteShaping::Free,
            ShapingArg::Complete => NoteShaping::Complete,
            ShapingArg::Limited => NoteShaping::Limited,
        }
    }
}

/// Log level implied by the `-v` count, unless RUST_LOG is set
pub fn log_filter(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    }
}

pub fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Apply(args) => apply(&args),
        Command::Templates => {
            print!("{}", format_catalog());
            Ok(())
        }
        Command::InitConfig { path } => {
            let path = match path {
                Some(path) => path,
                None => config::default_config_path()?,
            };
            config::save_config(&path, &StrumConfig::default())?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Config from --config, else the user config if present, else defaults,
/// with command-line overrides applied on top
fn resolve_config(args: &ApplyArgs) -> CliResult<StrumConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => match config::default_config_path() {
            Ok(path) if path.exists() => config::load_config(&path)?,
            _ => StrumConfig::default(),
        },
    };

    if let Some(template) = &args.template {
        config.template = template.clone();
        // A freshly selected template brings its own pitches and mutes
        config.relative_pitches = None;
        config.mutes = None;
    }
    if let Some(shaping) = args.shaping {
        config.shaping = shaping.into();
    }
    if let Some(tick_gap) = args.tick_gap {
        config.tick_gaps = [tick_gap; chords::GAP_COUNT];
    }
    if let Some(rate) = args.tick_gap_length_rate {
        config.tick_gap_length_rates = [rate; chords::GAP_COUNT];
    }
    if let Some(velocity_gap) = args.velocity_gap {
        config.velocity_gaps = [velocity_gap; chords::GAP_COUNT];
    }
    if let Some(rate) = args.length_rate {
        config.length_rates = [rate; chords::VOICE_COUNT];
    }

    Ok(config)
}

fn apply(args: &ApplyArgs) -> CliResult<()> {
    let config = resolve_config(args)?;
    let voices = config.voice_set()?;

    let input = read_file(&args.input)?;
    let parsed = events::parse_stream(&input);
    let output = Arpeggiator::new(&voices, config.shaping).run(&parsed);
    let text = events::write_stream(&output.events);

    if let Some(trace_path) = &args.trace {
        pipeline::append_trace(trace_path, &output)?;
    }

    if let Some(midi_path) = &args.midi {
        let notes: Vec<_> = output.notes().copied().collect();
        let options = MidiExportOptions {
            ppq: args.ppq,
            ..Default::default()
        };
        let bytes = export::export_midi(&notes, &options)?;
        write_file(midi_path, &bytes)?;
    }

    if args.dry_run {
        print!("{}", text);
        return Ok(());
    }

    let destination = args.output.as_deref().unwrap_or(&args.input);
    write_file(destination, text.as_bytes())?;
    log::info!("Wrote {} events to {}", output.events.len(), destination.display());

    Ok(())
}

fn read_file(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, data: &[u8]) -> CliResult<()> {
    fs::write(path, data).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// One line per template: name, relative pitches, muted voices
pub fn format_catalog() -> String {
    CATALOG
        .iter()
        .map(|t| {
            let pitches: Vec<String> = t.relative_pitches.iter().map(|p| p.to_string()).collect();
            let muted: Vec<String> = t
                .mutes
                .iter()
                .enumerate()
                .filter(|(_, m)| **m)
                .map(|(i, _)| format!("H{}", i + 1))
                .collect();
            format!(
                "{:<6} [{}]{}\n",
                t.name,
                pitches.join(", "),
                if muted.is_empty() {
                    String::new()
                } else {
                    format!(" muted: {}", muted.join(" "))
                }
            )
        })
        .collect()
}
