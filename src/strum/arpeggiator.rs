// Arpeggiator - Full pass over an event stream
// Resolves the beat length, then strums every note in stream order

use serde::{Deserialize, Serialize};

use super::direction::DirectionOracle;
use super::expander::{Expander, NoteShaping};
use super::stroke::{Stroke, StrokePlan};
use crate::chords::VoiceSet;
use crate::events::{self, NoteEvent, StreamEvent};

/// What happened to one source note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeDecision {
    /// Position of the note line in the input stream
    pub line_index: usize,

    pub source: NoteEvent,

    /// Ticks since the previous note (or the virtual start)
    pub delta_ticks: f64,

    pub stroke: Stroke,

    /// Number of notes written in place of the source
    pub emitted: usize,
}

/// Result of a pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrumOutput {
    pub events: Vec<StreamEvent>,

    /// Beat length the pass ran with; fractional when derived from
    /// fractional tick-gap length rates
    pub beat_length: f64,

    /// True when the beat length came from a `BEATLEN` line
    pub explicit_beat_length: bool,

    pub shaping: NoteShaping,

    pub decisions: Vec<StrokeDecision>,
}

impl StrumOutput {
    /// Number of note events in the output
    pub fn note_count(&self) -> usize {
        self.events.iter().filter(|e| e.as_note().is_some()).count()
    }

    /// Output notes only, in stream order
    pub fn notes(&self) -> impl Iterator<Item = &NoteEvent> {
        self.events.iter().filter_map(StreamEvent::as_note)
    }
}

/// Strums note streams with a fixed voice configuration
#[derive(Debug, Clone)]
pub struct Arpeggiator {
    plan: StrokePlan,
    shaping: NoteShaping,
}

impl Arpeggiator {
    pub fn new(voices: &VoiceSet, shaping: NoteShaping) -> Self {
        Arpeggiator {
            plan: StrokePlan::build(voices),
            shaping,
        }
    }

    /// Transform a parsed stream. Non-note events keep their position;
    /// each note is replaced by zero or more strummed notes.
    pub fn run(&self, input: &[StreamEvent]) -> StrumOutput {
        let explicit = events::explicit_beat_length(input);
        let beat_length = match explicit {
            Some(tick) => tick as f64,
            None => self.plan.derived_beat_length(),
        };

        let expander = Expander::new(&self.plan, self.shaping, beat_length);
        let mut oracle = DirectionOracle::new(beat_length);

        let mut output = Vec::with_capacity(input.len());
        let mut decisions = Vec::new();

        for (line_index, event) in input.iter().enumerate() {
            match event {
                StreamEvent::Note(note) => {
                    let (stroke, delta_ticks) = oracle.next(note.tick);
                    let chord = expander.expand(note, stroke);

                    log::debug!(
                        "Note at tick {} pitch {}: {} stroke, dt {}, {} notes",
                        note.tick,
                        note.pitch,
                        stroke.to_string(),
                        delta_ticks,
                        chord.len()
                    );

                    decisions.push(StrokeDecision {
                        line_index,
                        source: *note,
                        delta_ticks,
                        stroke,
                        emitted: chord.len(),
                    });
                    output.extend(chord.into_iter().map(StreamEvent::Note));
                }
                other => output.push(other.clone()),
            }
        }

        log::info!(
            "Strummed {} notes into {} ({} mode, beat length {}{})",
            decisions.len(),
            decisions.iter().map(|d| d.emitted).sum::<usize>(),
            self.shaping.to_string(),
            beat_length,
            if explicit.is_some() { ", from BEATLEN" } else { "" }
        );

        StrumOutput {
            events: output,
            beat_length,
            explicit_beat_length: explicit.is_some(),
            shaping: self.shaping,
            decisions,
        }
    }
}

/// Text-in, text-out convenience over [`Arpeggiator::run`]
pub fn arpeggiate_text(voices: &VoiceSet, shaping: NoteShaping, input: &str) -> String {
    let parsed = events::parse_stream(input);
    let output = Arpeggiator::new(voices, shaping).run(&parsed);
    events::write_stream(&output.events)
}
