// MIDI Export - Write strummed notes to a Standard MIDI File using midly
// Event ticks are used as-is, so the PPQ should match the source stream

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::NoteEvent;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write MIDI: {0}")]
    Write(#[from] std::io::Error),
    #[error("MIDI channel must be 0-15, got {0}")]
    InvalidChannel(u8),
    #[error("PPQ must be 1-32767, got {0}")]
    InvalidPpq(u16),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// MIDI export options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidiExportOptions {
    /// Pulses per quarter note
    pub ppq: u16,

    pub bpm: f64,

    /// Zero-based MIDI channel
    pub channel: u8,

    pub include_tempo: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
}

impl Default for MidiExportOptions {
    fn default() -> Self {
        MidiExportOptions {
            ppq: 480,
            bpm: 120.0,
            channel: 0,
            include_tempo: true,
            track_name: Some("chordstrum".to_string()),
        }
    }
}

/// Export notes as a single-track MIDI file.
///
/// Negative ticks are clamped to 0, pitch to 0..=127 and velocity to 1..=127,
/// since a note-on with velocity 0 is read as a note-off.
/// Notes with a non-positive length are skipped.
pub fn export_midi(notes: &[NoteEvent], options: &MidiExportOptions) -> ExportResult<Vec<u8>> {
    if options.channel > 15 {
        return Err(ExportError::InvalidChannel(options.channel));
    }
    if options.ppq == 0 || options.ppq > 0x7FFF {
        return Err(ExportError::InvalidPpq(options.ppq));
    }

    let header = Header {
        format: Format::SingleTrack,
        timing: Timing::Metrical(options.ppq.into()),
    };

    let mut track = Track::new();

    if let Some(name) = &options.track_name {
        add_track_name(&mut track, 0, name);
    }

    if options.include_tempo {
        add_tempo(&mut track, 0, options.bpm);
    }

    let events = note_messages(notes, options.channel);
    let mut last_tick = 0;
    for (tick, kind) in events {
        track.push(TrackEvent {
            delta: (tick - last_tick).into(),
            kind,
        });
        last_tick = tick;
    }

    add_end_of_track(&mut track, 0);

    let smf = Smf {
        header,
        tracks: vec![track],
    };

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;

    Ok(bytes)
}

/// Note on/off pairs sorted by absolute tick; note-offs sort before
/// note-ons on the same tick so repeated pitches retrigger cleanly
fn note_messages<'a>(notes: &[NoteEvent], channel: u8) -> Vec<(u32, TrackEventKind<'a>)> {
    let mut events: Vec<(u32, bool, TrackEventKind)> = Vec::with_capacity(notes.len() * 2);

    for note in notes.iter().filter(|n| n.length > 0) {
        let key = clamp_u7(note.pitch);
        if key as i32 != note.pitch {
            log::warn!("Pitch {} at tick {} clamped to {}", note.pitch, note.tick, key);
        }
        let tick_on = clamp_tick(note.tick);
        let tick_off = clamp_tick(note.end_tick());

        events.push((
            tick_on,
            true,
            TrackEventKind::Midi {
                channel: channel.into(),
                message: MidiMessage::NoteOn {
                    key: key.into(),
                    vel: note_on_velocity(note.velocity).into(),
                },
            },
        ));
        events.push((
            tick_off,
            false,
            TrackEventKind::Midi {
                channel: channel.into(),
                message: MidiMessage::NoteOff {
                    key: key.into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    events.sort_by_key(|(tick, is_on, _)| (*tick, *is_on));
    events
        .into_iter()
        .map(|(tick, _, kind)| (tick, kind))
        .collect()
}

fn clamp_u7(value: i32) -> u8 {
    value.clamp(0, 127) as u8
}

fn note_on_velocity(velocity: i32) -> u8 {
    velocity.clamp(1, 127) as u8
}

fn clamp_tick(tick: i64) -> u32 {
    tick.clamp(0, 0x0FFF_FFFF) as u32
}

fn add_track_name<'a>(track: &mut Track<'a>, delta: u32, name: &'a str) {
    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
    });
}

/// Add tempo meta message (microseconds per quarter note)
fn add_tempo(track: &mut Track<'_>, delta: u32, bpm: f64) {
    let us_per_quarter = (60_000_000.0 / bpm) as u32;

    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(us_per_quarter.into())),
    });
}

fn add_end_of_track(track: &mut Track<'_>, delta: u32) {
    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_keys(track: &Track) -> Vec<(u32, bool, u8)> {
        let mut tick = 0;
        let mut keys = Vec::new();
        for event in track {
            tick += u32::from(event.delta);
            if let TrackEventKind::Midi { message, .. } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, .. } => keys.push((tick, true, u8::from(key))),
                    MidiMessage::NoteOff { key, .. } => keys.push((tick, false, u8::from(key))),
                    _ => {}
                }
            }
        }
        keys
    }

    #[test]
    fn test_export_empty() {
        let bytes = export_midi(&[], &MidiExportOptions::default()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.tracks.len(), 1);
        // Track name, tempo, end of track
        assert_eq!(smf.tracks[0].len(), 3);
    }

    #[test]
    fn test_export_notes_timing() {
        let notes = vec![NoteEvent::new(0, 60, 480, 100), NoteEvent::new(8, 72, 480, 98)];
        let bytes = export_midi(&notes, &MidiExportOptions::default()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        assert_eq!(
            note_keys(&smf.tracks[0]),
            vec![(0, true, 60), (8, true, 72), (480, false, 60), (488, false, 72)]
        );
    }

    #[test]
    fn test_note_off_before_retrigger() {
        let notes = vec![NoteEvent::new(0, 60, 100, 100), NoteEvent::new(100, 60, 100, 100)];
        let events = note_messages(&notes, 0);
        let order: Vec<(u32, bool)> = events
            .iter()
            .map(|(tick, kind)| {
                let on = matches!(kind, TrackEventKind::Midi { message: MidiMessage::NoteOn { .. }, .. });
                (*tick, on)
            })
            .collect();
        assert_eq!(order, vec![(0, true), (100, false), (100, true), (200, false)]);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let notes = vec![
            NoteEvent::new(-50, 140, 100, 200),
            NoteEvent::new(10, 60, 0, 100),
        ];
        let bytes = export_midi(&notes, &MidiExportOptions::default()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        assert_eq!(note_keys(&smf.tracks[0]), vec![(0, true, 127), (50, false, 127)]);
    }

    #[test]
    fn test_quiet_voices_still_sound() {
        // Long velocity-gap chains run the top voices down to zero or below
        let notes = vec![NoteEvent::new(0, 60, 100, 0), NoteEvent::new(8, 72, 100, -6)];
        let bytes = export_midi(&notes, &MidiExportOptions::default()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        let velocities: Vec<u8> = smf.tracks[0]
            .iter()
            .filter_map(|event| match event.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { vel, .. },
                    ..
                } => Some(u8::from(vel)),
                _ => None,
            })
            .collect();
        assert_eq!(velocities, vec![1, 1]);
        assert_eq!(
            note_keys(&smf.tracks[0]),
            vec![(0, true, 60), (8, true, 72), (100, false, 60), (108, false, 72)]
        );
    }

    #[test]
    fn test_tempo_calculation() {
        let mut track = Track::new();
        add_tempo(&mut track, 0, 120.0);

        if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = &track[0].kind {
            assert_eq!(u32::from(*tempo), 500000);
        } else {
            panic!("Expected Tempo event");
        }
    }

    #[test]
    fn test_invalid_options() {
        let options = MidiExportOptions {
            channel: 16,
            ..Default::default()
        };
        assert!(matches!(
            export_midi(&[], &options),
            Err(ExportError::InvalidChannel(16))
        ));

        let options = MidiExportOptions {
            ppq: 0,
            ..Default::default()
        };
        assert!(matches!(export_midi(&[], &options), Err(ExportError::InvalidPpq(0))));
    }

    #[test]
    fn test_without_metadata() {
        let options = MidiExportOptions {
            include_tempo: false,
            track_name: None,
            ..Default::default()
        };
        let bytes = export_midi(&[NoteEvent::new(0, 60, 10, 100)], &options).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks[0].len(), 3);
    }
}
