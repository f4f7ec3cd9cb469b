// Export - Render strummed notes into other formats

pub mod midi;

pub use midi::{export_midi, ExportError, ExportResult, MidiExportOptions};
