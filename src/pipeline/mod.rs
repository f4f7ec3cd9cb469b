// Pipeline monitoring module
// Records how a strum pass treated each note

pub mod trace;

pub use trace::{
    append_trace, read_trace, trace_records, BeatLengthSource, TraceError, TraceLine, TraceRecord,
    TraceResult,
};
