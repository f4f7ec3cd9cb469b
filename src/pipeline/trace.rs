// Strum trace - JSONL record of how each pass strummed its notes
// One summary line per pass followed by one line per source note

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::strum::{NoteShaping, StrokeDecision, StrumOutput};

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid trace line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Where a pass got its beat length from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeatLengthSource {
    /// A `BEATLEN` line in the stream
    Beatlen,

    /// Twice the summed down-stroke gaps
    Derived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum TraceRecord {
    /// Summary of a whole pass
    Pass {
        beat_length: f64,
        beat_length_source: BeatLengthSource,
        shaping: NoteShaping,
        source_notes: usize,
        emitted_notes: usize,
    },

    /// Direction and output count for one source note
    Stroke(StrokeDecision),
}

/// A record as written to the trace file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceLine {
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub record: TraceRecord,
}

impl TraceLine {
    pub fn as_stroke(&self) -> Option<&StrokeDecision> {
        match &self.record {
            TraceRecord::Stroke(decision) => Some(decision),
            TraceRecord::Pass { .. } => None,
        }
    }
}

/// Records for a finished pass, summary first
pub fn trace_records(output: &StrumOutput) -> Vec<TraceRecord> {
    let summary = TraceRecord::Pass {
        beat_length: output.beat_length,
        beat_length_source: if output.explicit_beat_length {
            BeatLengthSource::Beatlen
        } else {
            BeatLengthSource::Derived
        },
        shaping: output.shaping,
        source_notes: output.decisions.len(),
        emitted_notes: output.note_count(),
    };

    std::iter::once(summary)
        .chain(output.decisions.iter().cloned().map(TraceRecord::Stroke))
        .collect()
}

/// Append a pass to a JSONL trace file, creating it if needed.
/// Every line of one pass shares a timestamp. Returns the number of lines written.
pub fn append_trace(path: &Path, output: &StrumOutput) -> TraceResult<usize> {
    let timestamp = Utc::now();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);

    let records = trace_records(output);
    for record in &records {
        let line = TraceLine {
            timestamp,
            record: record.clone(),
        };
        serde_json::to_writer(&mut writer, &line)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    log::debug!("Traced {} records to {}", records.len(), path.display());
    Ok(records.len())
}

/// Read every line of a trace file, skipping blank lines
pub fn read_trace(path: &Path) -> TraceResult<Vec<TraceLine>> {
    let contents = fs::read_to_string(path)?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| TraceError::Parse { line: i + 1, source })
        })
        .collect()
}
