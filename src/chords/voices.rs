// Voice Parameters - Per-voice tuning merged with the selected chord template
// Pitch and mute come from the template; gaps and rates are user tuning

use serde::{Deserialize, Serialize};

use super::templates::{default_template, ChordTemplate, GAP_COUNT, VOICE_COUNT};

/// Default ticks between consecutive voices
pub const DEFAULT_TICK_GAP: i64 = 8;

/// Default velocity change between consecutive voices
pub const DEFAULT_VELOCITY_GAP: i32 = -2;

/// Default multiplier applied to the source note length
pub const DEFAULT_LENGTH_RATE: f64 = 1.0;

/// Parameters that belong to a single voice (H1..H6)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceParameters {
    /// Semitone offset from the source pitch
    pub relative_pitch: i32,

    /// Silenced voices still advance the strum cursor
    pub mute: bool,

    /// Multiplier applied to the source note length
    pub length_rate: f64,
}

impl Default for VoiceParameters {
    fn default() -> Self {
        VoiceParameters {
            relative_pitch: 0,
            mute: false,
            length_rate: DEFAULT_LENGTH_RATE,
        }
    }
}

/// Parameters for the gap between voice i and voice i + 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceGap {
    /// Fixed delay in ticks before the next voice fires
    pub tick_gap: i64,

    /// Extra delay per tick of source note length
    pub tick_gap_length_rate: f64,

    /// Added to the velocity for the next voice
    pub velocity_gap: i32,
}

impl Default for VoiceGap {
    fn default() -> Self {
        VoiceGap {
            tick_gap: DEFAULT_TICK_GAP,
            tick_gap_length_rate: 0.0,
            velocity_gap: DEFAULT_VELOCITY_GAP,
        }
    }
}

/// The complete, caller-editable voice configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSet {
    pub voices: [VoiceParameters; VOICE_COUNT],
    pub gaps: [VoiceGap; GAP_COUNT],
}

impl Default for VoiceSet {
    /// Default tuning with the first catalog template selected
    fn default() -> Self {
        VoiceSet::with_template(default_template())
    }
}

impl VoiceSet {
    /// Default tuning with the given template selected
    pub fn with_template(template: &ChordTemplate) -> Self {
        let mut set = VoiceSet {
            voices: [VoiceParameters::default(); VOICE_COUNT],
            gaps: [VoiceGap::default(); GAP_COUNT],
        };
        set.select_template(template);
        set
    }

    /// Overwrite relative pitches and mutes from a template.
    /// Gaps, length rates and velocity gaps are left untouched.
    pub fn select_template(&mut self, template: &ChordTemplate) {
        for (voice, (pitch, mute)) in self
            .voices
            .iter_mut()
            .zip(template.relative_pitches.iter().zip(template.mutes.iter()))
        {
            voice.relative_pitch = *pitch;
            voice.mute = *mute;
        }
    }

    pub fn broadcast_relative_pitch(&mut self, relative_pitch: i32) {
        self.voices.iter_mut().for_each(|v| v.relative_pitch = relative_pitch);
    }

    pub fn broadcast_mute(&mut self, mute: bool) {
        self.voices.iter_mut().for_each(|v| v.mute = mute);
    }

    pub fn broadcast_length_rate(&mut self, length_rate: f64) {
        self.voices.iter_mut().for_each(|v| v.length_rate = length_rate);
    }

    pub fn broadcast_tick_gap(&mut self, tick_gap: i64) {
        self.gaps.iter_mut().for_each(|g| g.tick_gap = tick_gap);
    }

    pub fn broadcast_tick_gap_length_rate(&mut self, rate: f64) {
        self.gaps.iter_mut().for_each(|g| g.tick_gap_length_rate = rate);
    }

    pub fn broadcast_velocity_gap(&mut self, velocity_gap: i32) {
        self.gaps.iter_mut().for_each(|g| g.velocity_gap = velocity_gap);
    }

    /// Index of the first unmuted voice, or 0 when every voice is muted
    pub fn first_sounding(&self) -> usize {
        self.voices.iter().position(|v| !v.mute).unwrap_or(0)
    }

    /// Index of the last unmuted voice, or 0 when every voice is muted
    pub fn last_sounding(&self) -> usize {
        self.voices.iter().rposition(|v| !v.mute).unwrap_or(0)
    }
}
