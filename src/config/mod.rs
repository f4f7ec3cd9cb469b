// Configuration - Strum presets stored as JSON
// A preset names a chord template and carries the per-voice tuning

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::chords::voices::{DEFAULT_LENGTH_RATE, DEFAULT_TICK_GAP, DEFAULT_VELOCITY_GAP};
use crate::chords::{self, ChordError, VoiceSet, GAP_COUNT, VOICE_COUNT};
use crate::strum::NoteShaping;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to get config directory")]
    NoConfigDir,
    #[error(transparent)]
    Chord(#[from] ChordError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_template_name() -> String {
    chords::templates::default_template().name.to_string()
}

fn default_tick_gaps() -> [i64; GAP_COUNT] {
    [DEFAULT_TICK_GAP; GAP_COUNT]
}

fn default_velocity_gaps() -> [i32; GAP_COUNT] {
    [DEFAULT_VELOCITY_GAP; GAP_COUNT]
}

fn default_length_rates() -> [f64; VOICE_COUNT] {
    [DEFAULT_LENGTH_RATE; VOICE_COUNT]
}

/// Everything a strum pass needs besides the event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrumConfig {
    /// Chord template name from the built-in catalog
    #[serde(default = "default_template_name")]
    pub template: String,

    #[serde(default)]
    pub shaping: NoteShaping,

    #[serde(default = "default_tick_gaps")]
    pub tick_gaps: [i64; GAP_COUNT],

    #[serde(default)]
    pub tick_gap_length_rates: [f64; GAP_COUNT],

    #[serde(default = "default_velocity_gaps")]
    pub velocity_gaps: [i32; GAP_COUNT],

    #[serde(default = "default_length_rates")]
    pub length_rates: [f64; VOICE_COUNT],

    /// Replaces the template's pitches when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_pitches: Option<[i32; VOICE_COUNT]>,

    /// Replaces the template's mutes when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutes: Option<[bool; VOICE_COUNT]>,
}

impl Default for StrumConfig {
    fn default() -> Self {
        StrumConfig {
            template: default_template_name(),
            shaping: NoteShaping::default(),
            tick_gaps: default_tick_gaps(),
            tick_gap_length_rates: [0.0; GAP_COUNT],
            velocity_gaps: default_velocity_gaps(),
            length_rates: default_length_rates(),
            relative_pitches: None,
            mutes: None,
        }
    }
}

impl StrumConfig {
    /// Resolve the template and apply tuning and overrides on top of it
    pub fn voice_set(&self) -> ConfigResult<VoiceSet> {
        let template = chords::resolve(&self.template)?;
        let mut set = VoiceSet::with_template(template);

        for (gap, i) in set.gaps.iter_mut().zip(0..) {
            gap.tick_gap = self.tick_gaps[i];
            gap.tick_gap_length_rate = self.tick_gap_length_rates[i];
            gap.velocity_gap = self.velocity_gaps[i];
        }

        for (voice, i) in set.voices.iter_mut().zip(0..) {
            voice.length_rate = self.length_rates[i];
            if let Some(pitches) = &self.relative_pitches {
                voice.relative_pitch = pitches[i];
            }
            if let Some(mutes) = &self.mutes {
                voice.mute = mutes[i];
            }
        }

        Ok(set)
    }
}

/// `<config dir>/chordstrum/config.json`
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("chordstrum").join("config.json"))
}

pub fn load_config(path: &Path) -> ConfigResult<StrumConfig> {
    let contents = fs::read_to_string(path)?;
    let config: StrumConfig = serde_json::from_str(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write the config as pretty JSON, creating parent directories
pub fn save_config(path: &Path, config: &StrumConfig) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json + "\n")?;
    log::info!("Saved config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_matches_default_voices() {
        let set = StrumConfig::default().voice_set().unwrap();
        assert_eq!(set, VoiceSet::default());
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let config = StrumConfig {
            template: "Phrygian".to_string(),
            ..Default::default()
        };
        match config.voice_set() {
            Err(ConfigError::Chord(ChordError::UnknownTemplate(name))) => {
                assert_eq!(name, "Phrygian")
            }
            other => panic!("Expected unknown template error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StrumConfig =
            serde_json::from_str(r#"{"template": "m7", "shaping": "limited"}"#).unwrap();
        assert_eq!(config.template, "m7");
        assert_eq!(config.shaping, NoteShaping::Limited);
        assert_eq!(config.tick_gaps, [8; GAP_COUNT]);
        assert_eq!(config.velocity_gaps, [-2; GAP_COUNT]);
        assert_eq!(config.length_rates, [1.0; VOICE_COUNT]);
    }

    #[test]
    fn test_overrides_apply_after_template() {
        let config = StrumConfig {
            template: "Octave".to_string(),
            mutes: Some([false, false, false, true, true, true]),
            tick_gaps: [1, 2, 3, 4, 5],
            ..Default::default()
        };
        let set = config.voice_set().unwrap();

        assert_eq!(set.voices[2].relative_pitch, 24);
        assert!(!set.voices[2].mute);
        assert!(set.voices[3].mute);
        assert_eq!(set.gaps[4].tick_gap, 5);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = StrumConfig {
            template: "maj9".to_string(),
            shaping: NoteShaping::Complete,
            tick_gap_length_rates: [0.5; GAP_COUNT],
            relative_pitches: Some([0, 1, 2, 3, 4, 5]),
            ..Default::default()
        };
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_default_config_path_name() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("chordstrum/config.json"));
        }
    }
}
