// Chord Templates - Built-in catalog of six-voice chord shapes
// Each template fixes the relative pitch and mute flag of voices H1..H6

use serde::Serialize;
use thiserror::Error;

/// Number of voices (H1..H6) generated from a single source note
pub const VOICE_COUNT: usize = 6;

/// Number of gaps between consecutive voices
pub const GAP_COUNT: usize = VOICE_COUNT - 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChordError {
    #[error("Unknown chord template: {0}")]
    UnknownTemplate(String),
}

pub type ChordResult<T> = Result<T, ChordError>;

/// A named chord shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordTemplate {
    /// Catalog name (e.g., "Major", "m7", "7-5")
    pub name: &'static str,

    /// Semitone offsets added to the source pitch, one per voice
    pub relative_pitches: [i32; VOICE_COUNT],

    /// Voices that are silenced by default for this shape
    pub mutes: [bool; VOICE_COUNT],
}

const fn template(
    name: &'static str,
    relative_pitches: [i32; VOICE_COUNT],
    mutes: [bool; VOICE_COUNT],
) -> ChordTemplate {
    ChordTemplate {
        name,
        relative_pitches,
        mutes,
    }
}

const OPEN: [bool; VOICE_COUNT] = [false; VOICE_COUNT];
const MUTE_H6: [bool; VOICE_COUNT] = [false, false, false, false, false, true];

/// The full catalog, in menu order. The first entry is the default selection.
pub static CATALOG: [ChordTemplate; 23] = [
    template("Major", [0, 7, 12, 16, 19, 24], OPEN),
    template("Minor", [0, 7, 12, 15, 19, 24], OPEN),
    template("Octave", [0, 12, 24, 36, 48, 60], [false, false, true, true, true, true]),
    template("dim", [0, 6, 12, 15, 19, 24], [false, false, false, false, true, true]),
    template("aug", [0, 8, 12, 16, 20, 24], OPEN),
    template("sus", [0, 7, 12, 17, 19, 24], OPEN),
    template("6", [0, 7, 12, 16, 21, 24], OPEN),
    template("7", [0, 7, 10, 16, 19, 24], OPEN),
    template("maj7", [0, 7, 11, 16, 19, 24], MUTE_H6),
    template("9", [0, 7, 10, 16, 19, 26], OPEN),
    template("add9", [0, 7, 14, 16, 19, 24], OPEN),
    template("m6", [0, 7, 12, 15, 21, 24], OPEN),
    template("m7", [0, 7, 12, 15, 22, 24], OPEN),
    template("mmaj7", [0, 7, 11, 15, 19, 24], MUTE_H6),
    template("m9", [0, 7, 10, 15, 19, 26], OPEN),
    template("11", [0, 7, 10, 17, 19, 26], OPEN),
    template("7sus4", [0, 7, 10, 17, 19, 24], OPEN),
    template("13", [0, 4, 10, 14, 21, 24], MUTE_H6),
    template("6add9", [0, 4, 9, 14, 19, 24], OPEN),
    template("-5", [0, 7, 12, 18, 24, 28], [false, true, false, false, false, false]),
    template("7-5", [0, 12, 18, 22, 24, 28], OPEN),
    template("7maj5", [0, 12, 20, 22, 28, 32], OPEN),
    template("maj9", [0, 7, 11, 16, 19, 26], OPEN),
];

/// Look up a template by its exact catalog name.
///
/// Matching is case-sensitive: the catalog holds names such as "Major" and
/// "maj7" that only differ by case and suffix.
pub fn resolve(name: &str) -> ChordResult<&'static ChordTemplate> {
    CATALOG
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| ChordError::UnknownTemplate(name.to_string()))
}

/// The default template ("Major")
pub fn default_template() -> &'static ChordTemplate {
    &CATALOG[0]
}
