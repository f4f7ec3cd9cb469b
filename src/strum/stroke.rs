// Stroke Builder - Down-stroke and up-stroke voice lists
// Trims leading and trailing muted voices and pairs each voice with its gap

use serde::{Deserialize, Serialize};

use crate::chords::{VoiceSet, GAP_COUNT};

/// Strum direction for one chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stroke {
    /// Ascending voice order (H1 first)
    Down,

    /// Descending voice order (highest sounding voice first)
    Up,
}

impl Stroke {
    pub fn to_string(&self) -> &'static str {
        match self {
            Stroke::Down => "down",
            Stroke::Up => "up",
        }
    }
}

/// One voice as seen by the expander, with the gap that follows it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeVoice {
    pub relative_pitch: i32,
    pub mute: bool,
    pub tick_gap: i64,
    pub tick_gap_length_rate: f64,
    pub length_rate: f64,
    pub velocity_gap: i32,
}

/// Both voice orders plus the gap totals used for beat length and complete mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokePlan {
    pub down: Vec<StrokeVoice>,
    pub up: Vec<StrokeVoice>,

    /// Sum of tick gaps over every down-stroke voice except the last
    pub total_tick_gap: i64,

    /// Sum of tick-gap length rates over every down-stroke voice except the last
    pub total_tick_gap_length_rate: f64,
}

impl StrokePlan {
    /// Build the voice lists from the current voice configuration.
    ///
    /// Down-stroke voice `i` takes gap `i % 5`, so the top voice (H6) reuses
    /// the H1-H2 gap. Up-stroke voice `j` takes gap `max(j - 1, 0)`, the gap
    /// below it, so the bottom voice reuses the H1-H2 gap as well.
    pub fn build(set: &VoiceSet) -> Self {
        let begin = set.first_sounding();
        let end = set.last_sounding();

        let voice_with_gap = |index: usize, gap_index: usize| {
            let voice = &set.voices[index];
            let gap = &set.gaps[gap_index];
            StrokeVoice {
                relative_pitch: voice.relative_pitch,
                mute: voice.mute,
                tick_gap: gap.tick_gap,
                tick_gap_length_rate: gap.tick_gap_length_rate,
                length_rate: voice.length_rate,
                velocity_gap: gap.velocity_gap,
            }
        };

        let down: Vec<StrokeVoice> = (begin..=end)
            .map(|i| voice_with_gap(i, i % GAP_COUNT))
            .collect();

        let up: Vec<StrokeVoice> = (begin..=end)
            .rev()
            .map(|j| voice_with_gap(j, j.saturating_sub(1)))
            .collect();

        let leading = &down[..down.len() - 1];
        let total_tick_gap = leading.iter().map(|v| v.tick_gap).sum();
        let total_tick_gap_length_rate = leading.iter().map(|v| v.tick_gap_length_rate).sum();

        StrokePlan {
            down,
            up,
            total_tick_gap,
            total_tick_gap_length_rate,
        }
    }

    /// Voice list for a strum direction
    pub fn voices(&self, stroke: Stroke) -> &[StrokeVoice] {
        match stroke {
            Stroke::Down => &self.down,
            Stroke::Up => &self.up,
        }
    }

    /// Beat length used when the stream carries no `BEATLEN` line:
    /// twice the summed down-stroke gaps. Fractional rates keep their
    /// fraction so a note 82 ticks later is still inside an 82.5 tick beat.
    pub fn derived_beat_length(&self) -> f64 {
        2.0 * (self.total_tick_gap as f64 + self.total_tick_gap_length_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chords::{resolve, VoiceSet};

    fn numbered_gaps() -> VoiceSet {
        let mut set = VoiceSet::default();
        for (i, gap) in set.gaps.iter_mut().enumerate() {
            gap.tick_gap = 10 * (i as i64 + 1);
            gap.tick_gap_length_rate = 0.25 * (i as f64 + 1.0);
            gap.velocity_gap = i as i32 + 1;
        }
        set
    }

    #[test]
    fn test_full_chord_lists() {
        let plan = StrokePlan::build(&VoiceSet::default());

        assert_eq!(plan.down.len(), 6);
        assert_eq!(plan.up.len(), 6);

        let down_pitches: Vec<i32> = plan.down.iter().map(|v| v.relative_pitch).collect();
        let up_pitches: Vec<i32> = plan.up.iter().map(|v| v.relative_pitch).collect();
        assert_eq!(down_pitches, vec![0, 7, 12, 16, 19, 24]);
        assert_eq!(up_pitches, vec![24, 19, 16, 12, 7, 0]);

        assert_eq!(plan.total_tick_gap, 40);
        assert_eq!(plan.derived_beat_length(), 80.0);
    }

    #[test]
    fn test_top_voice_gap_aliases_first_gap() {
        let plan = StrokePlan::build(&numbered_gaps());

        let down_gaps: Vec<i64> = plan.down.iter().map(|v| v.tick_gap).collect();
        assert_eq!(down_gaps, vec![10, 20, 30, 40, 50, 10]);

        let down_velocity: Vec<i32> = plan.down.iter().map(|v| v.velocity_gap).collect();
        assert_eq!(down_velocity, vec![1, 2, 3, 4, 5, 1]);
    }

    #[test]
    fn test_up_stroke_uses_gap_below() {
        let plan = StrokePlan::build(&numbered_gaps());

        let up_gaps: Vec<i64> = plan.up.iter().map(|v| v.tick_gap).collect();
        assert_eq!(up_gaps, vec![50, 40, 30, 20, 10, 10]);
    }

    #[test]
    fn test_totals_exclude_last_voice() {
        let plan = StrokePlan::build(&numbered_gaps());

        assert_eq!(plan.total_tick_gap, 10 + 20 + 30 + 40 + 50);
        assert_eq!(plan.total_tick_gap_length_rate, 3.75);
        assert_eq!(plan.derived_beat_length(), 307.5);
    }

    #[test]
    fn test_trims_muted_boundary_voices() {
        let plan = StrokePlan::build(&VoiceSet::with_template(resolve("Octave").unwrap()));

        assert_eq!(plan.down.len(), 2);
        assert_eq!(plan.down[0].relative_pitch, 0);
        assert_eq!(plan.down[1].relative_pitch, 12);
        assert_eq!(plan.up[0].relative_pitch, 12);
        assert_eq!(plan.total_tick_gap, 8);
        assert_eq!(plan.derived_beat_length(), 16.0);
    }

    #[test]
    fn test_inner_muted_voices_are_kept() {
        let plan = StrokePlan::build(&VoiceSet::with_template(resolve("-5").unwrap()));

        assert_eq!(plan.down.len(), 6);
        assert!(plan.down[1].mute);
        assert!(plan.up[4].mute);
    }

    #[test]
    fn test_trim_from_both_ends() {
        let mut set = numbered_gaps();
        set.voices[0].mute = true;
        set.voices[5].mute = true;
        let plan = StrokePlan::build(&set);

        let down_gaps: Vec<i64> = plan.down.iter().map(|v| v.tick_gap).collect();
        let up_gaps: Vec<i64> = plan.up.iter().map(|v| v.tick_gap).collect();
        assert_eq!(down_gaps, vec![20, 30, 40, 50]);
        assert_eq!(up_gaps, vec![40, 30, 20, 10]);
        assert_eq!(plan.total_tick_gap, 90);
    }

    #[test]
    fn test_all_muted_degrades_to_first_voice() {
        let mut set = VoiceSet::default();
        set.broadcast_mute(true);
        let plan = StrokePlan::build(&set);

        assert_eq!(plan.down.len(), 1);
        assert_eq!(plan.up.len(), 1);
        assert!(plan.down[0].mute);
        assert_eq!(plan.total_tick_gap, 0);
        assert_eq!(plan.derived_beat_length(), 0.0);
    }

    #[test]
    fn test_voices_by_direction() {
        let plan = StrokePlan::build(&VoiceSet::default());
        assert_eq!(plan.voices(Stroke::Down)[0].relative_pitch, 0);
        assert_eq!(plan.voices(Stroke::Up)[0].relative_pitch, 24);
    }
}
