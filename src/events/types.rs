// Event stream types
// Note events and the opaque lines that travel alongside them

use serde::{Deserialize, Serialize};

/// Tag that introduces a note line
pub const NOTE_TAG: &str = "NOTE";

/// Tag that introduces a beat length line
pub const BEATLEN_TAG: &str = "BEATLEN";

/// A timed note: `NOTE <tick> <pitch> <length> <velocity>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Absolute start time in ticks
    pub tick: i64,

    /// MIDI note number
    pub pitch: i32,

    /// Duration in ticks
    pub length: i64,

    /// MIDI velocity
    pub velocity: i32,
}

impl NoteEvent {
    pub fn new(tick: i64, pitch: i32, length: i64, velocity: i32) -> Self {
        NoteEvent {
            tick,
            pitch,
            length,
            velocity,
        }
    }

    /// Tick at which the note stops sounding
    pub fn end_tick(&self) -> i64 {
        self.tick + self.length
    }

    /// Serialize to a protocol line (with newline)
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {}\n",
            NOTE_TAG, self.tick, self.pitch, self.length, self.velocity
        )
    }
}

/// One line of the event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A recognised note line
    Note(NoteEvent),

    /// A `BEATLEN <tick>` line, kept verbatim for pass-through
    BeatLength { tick: i64, raw: String },

    /// Any other line, including malformed ones
    Opaque { raw: String },
}

impl StreamEvent {
    pub fn opaque(raw: impl Into<String>) -> Self {
        StreamEvent::Opaque { raw: raw.into() }
    }

    pub fn as_note(&self) -> Option<&NoteEvent> {
        match self {
            StreamEvent::Note(note) => Some(note),
            _ => None,
        }
    }

    /// Text written back to the stream for this event
    pub fn to_line(&self) -> String {
        match self {
            StreamEvent::Note(note) => note.to_line(),
            StreamEvent::BeatLength { raw, .. } | StreamEvent::Opaque { raw } => raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_line_format() {
        let note = NoteEvent::new(960, 64, 240, 90);
        assert_eq!(note.to_line(), "NOTE 960 64 240 90\n");
        assert_eq!(note.end_tick(), 1200);
    }

    #[test]
    fn test_passthrough_lines_are_verbatim() {
        let beat = StreamEvent::BeatLength {
            tick: 480,
            raw: "BEATLEN 480\n".to_string(),
        };
        assert_eq!(beat.to_line(), "BEATLEN 480\n");

        let other = StreamEvent::opaque("CONTROL 0 7 100");
        assert_eq!(other.to_line(), "CONTROL 0 7 100");
        assert!(other.as_note().is_none());
    }

    #[test]
    fn test_stream_event_json_shape() {
        let event = StreamEvent::Note(NoteEvent::new(0, 60, 480, 100));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "note");
        assert_eq!(json["pitch"], 60);
    }
}
