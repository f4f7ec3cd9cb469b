// Event stream module
// Note and pass-through line types plus the line codec

pub mod codec;
pub mod types;

pub use codec::{explicit_beat_length, parse_line, parse_stream, write_stream};
pub use types::{NoteEvent, StreamEvent, BEATLEN_TAG, NOTE_TAG};
