// Chordstrum - Transforms single notes into strummed chords
// Module declarations

pub mod chords;
pub mod cli;
pub mod config;
pub mod events;
pub mod export;
pub mod pipeline;
pub mod strum;

pub use chords::{resolve, ChordTemplate, VoiceGap, VoiceParameters, VoiceSet};
pub use events::{NoteEvent, StreamEvent};
pub use strum::{arpeggiate_text, Arpeggiator, NoteShaping, StrumOutput};
