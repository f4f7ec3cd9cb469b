// Event Stream Codec - Line-oriented parsing and serialization
// Unrecognised or malformed lines are carried through untouched

use super::types::{NoteEvent, StreamEvent, BEATLEN_TAG, NOTE_TAG};

/// Parse a single line (with or without its trailing newline).
/// Tags are only recognised at the start of the line; indented lines are opaque.
pub fn parse_line(line: &str) -> StreamEvent {
    if line.starts_with(char::is_whitespace) {
        return StreamEvent::opaque(line);
    }

    let mut tokens = line.split_whitespace();

    match tokens.next() {
        Some(NOTE_TAG) => {
            let fields: Vec<&str> = tokens.collect();
            parse_note_fields(&fields)
                .map(StreamEvent::Note)
                .unwrap_or_else(|| StreamEvent::opaque(line))
        }
        Some(BEATLEN_TAG) => {
            let fields: Vec<&str> = tokens.collect();
            match fields.as_slice() {
                [tick] => match tick.parse::<i64>() {
                    Ok(tick) => StreamEvent::BeatLength {
                        tick,
                        raw: line.to_string(),
                    },
                    Err(_) => StreamEvent::opaque(line),
                },
                _ => StreamEvent::opaque(line),
            }
        }
        _ => StreamEvent::opaque(line),
    }
}

fn parse_note_fields(fields: &[&str]) -> Option<NoteEvent> {
    match fields {
        [tick, pitch, length, velocity] => Some(NoteEvent::new(
            tick.parse().ok()?,
            pitch.parse().ok()?,
            length.parse().ok()?,
            velocity.parse().ok()?,
        )),
        _ => None,
    }
}

/// Parse a whole stream, keeping each line's terminator so that
/// pass-through lines are written back byte for byte
pub fn parse_stream(input: &str) -> Vec<StreamEvent> {
    input.split_inclusive('\n').map(parse_line).collect()
}

/// Serialize events back into protocol text
pub fn write_stream(events: &[StreamEvent]) -> String {
    events.iter().map(StreamEvent::to_line).collect()
}

/// The last `BEATLEN` value in the stream, if any
pub fn explicit_beat_length(events: &[StreamEvent]) -> Option<i64> {
    events.iter().rev().find_map(|event| match event {
        StreamEvent::BeatLength { tick, .. } => Some(*tick),
        _ => None,
    })
}
