// Chords - Template catalog and per-voice parameters
// Resolves a named chord shape into an editable six-voice configuration

pub mod templates;
pub mod voices;

pub use templates::{
    resolve, ChordError, ChordResult, ChordTemplate, CATALOG, GAP_COUNT, VOICE_COUNT,
};
pub use voices::{VoiceGap, VoiceParameters, VoiceSet};
