// Event Expander - Turns one source note into a strummed chord
// Walks a voice list, advancing the start tick and velocity voice by voice

use serde::{Deserialize, Serialize};

use super::stroke::{Stroke, StrokePlan};
use crate::events::NoteEvent;

/// How emitted note lengths are shaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteShaping {
    /// Each voice sounds for `length * length_rate`
    #[default]
    Free,

    /// Notes shorter than a beat are stretched so the whole chord rings
    /// together; later voices shrink by twice the gap they started after
    Complete,

    /// No voice outlasts the end of the source note
    Limited,
}

impl NoteShaping {
    pub fn to_string(&self) -> &'static str {
        match self {
            NoteShaping::Free => "free",
            NoteShaping::Complete => "complete",
            NoteShaping::Limited => "limited",
        }
    }
}

/// Expands notes against a fixed stroke plan and beat length
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    plan: &'a StrokePlan,
    shaping: NoteShaping,
    beat_length: f64,
}

impl<'a> Expander<'a> {
    pub fn new(plan: &'a StrokePlan, shaping: NoteShaping, beat_length: f64) -> Self {
        Expander {
            plan,
            shaping,
            beat_length,
        }
    }

    /// Emit the chord for `note` in the given direction.
    ///
    /// Muted voices and voices whose computed length is not positive are
    /// skipped, but still advance the tick cursor and velocity.
    pub fn expand(&self, note: &NoteEvent, stroke: Stroke) -> Vec<NoteEvent> {
        let source_length = note.length;
        let mut tick = note.tick;
        let mut velocity = note.velocity;

        let decrease_length =
            self.shaping == NoteShaping::Complete && (source_length as f64) < self.beat_length;
        let mut length = if decrease_length {
            source_length
                + self.plan.total_tick_gap
                + (self.plan.total_tick_gap_length_rate * source_length as f64) as i64
        } else {
            source_length
        };

        let voices = self.plan.voices(stroke);
        let mut emitted = Vec::with_capacity(voices.len());
        let mut last_tick_gap = 0i64;

        for voice in voices {
            if decrease_length {
                length -= 2 * last_tick_gap;
            } else {
                length = (source_length as f64 * voice.length_rate) as i64;
            }

            if self.shaping == NoteShaping::Limited {
                length = length.min(note.end_tick() - tick);
            }

            if !voice.mute && length > 0 {
                emitted.push(NoteEvent::new(
                    tick,
                    note.pitch + voice.relative_pitch,
                    length,
                    velocity,
                ));
            }

            last_tick_gap =
                (voice.tick_gap as f64 + source_length as f64 * voice.tick_gap_length_rate) as i64;
            tick += last_tick_gap;
            velocity += voice.velocity_gap;
        }

        emitted
    }
}
