// Strum engine - Stroke lists, direction choice and note expansion
// Turns each note of a stream into an alternating down/up strummed chord

pub mod arpeggiator;
pub mod direction;
pub mod expander;
pub mod stroke;

pub use arpeggiator::{arpeggiate_text, Arpeggiator, StrokeDecision, StrumOutput};
pub use direction::DirectionOracle;
pub use expander::{Expander, NoteShaping};
pub use stroke::{Stroke, StrokePlan, StrokeVoice};
