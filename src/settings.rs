//! Game settings
//!
//! Every tunable of the turn loop. Loaded from JSON (missing fields fall back
//! to the defaults in [`crate::consts`]) and validated before use.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Tunables for pattern size, reveal pacing, countdown and input handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    // === Pattern ===
    /// Pattern length at level 1
    pub starting_pattern_length: u32,
    /// Pattern length never grows past this
    pub max_pattern_length: u32,
    /// Independent draws (true) or a shuffled permutation (false)
    pub allow_duplicates_in_pattern: bool,

    // === Countdown ===
    /// Level-1 budget for a three-tile pattern; a third of it is the per-tile time
    pub base_time_limit: f32,
    /// Carried for compatibility with existing settings files; the countdown
    /// formula does not read it
    pub additional_time_per_tile: f32,
    /// Per-tile time removed for each level above 1
    pub time_reduction_per_level: f32,
    /// Floor for the per-tile time
    pub min_time_per_tile: f32,
    /// Pause between "your turn" and the countdown actually running
    pub countdown_grace_delay: f32,

    // === Reveal ===
    /// Highlight duration at level 1
    pub highlight_time: f32,
    pub decrease_highlight_time_per_level: f32,
    pub min_highlight_time: f32,
    /// Gap after each unhighlight
    pub wait_time_between_tiles: f32,
    /// Pause before the first highlight
    pub wait_time_before_playback: f32,
    /// Time for placed tiles to settle before the pause above starts
    pub visual_settle_time: f32,

    // === Input ===
    /// Steps closer together than this are treated as sensor bounce
    pub step_cooldown: f32,

    // === Flow ===
    /// Delay between a level-complete and the "enter the area" prompt
    pub level_complete_prompt_delay: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_pattern_length: STARTING_PATTERN_LENGTH,
            max_pattern_length: MAX_PATTERN_LENGTH,
            allow_duplicates_in_pattern: false,

            base_time_limit: BASE_TIME_LIMIT,
            additional_time_per_tile: ADDITIONAL_TIME_PER_TILE,
            time_reduction_per_level: TIME_REDUCTION_PER_LEVEL,
            min_time_per_tile: MIN_TIME_PER_TILE,
            countdown_grace_delay: COUNTDOWN_GRACE_DELAY,

            highlight_time: HIGHLIGHT_TIME,
            decrease_highlight_time_per_level: HIGHLIGHT_DECAY_PER_LEVEL,
            min_highlight_time: MIN_HIGHLIGHT_TIME,
            wait_time_between_tiles: WAIT_BETWEEN_TILES,
            wait_time_before_playback: WAIT_BEFORE_PLAYBACK,
            visual_settle_time: VISUAL_SETTLE_TIME,

            step_cooldown: STEP_COOLDOWN,

            level_complete_prompt_delay: LEVEL_COMPLETE_PROMPT_DELAY,
        }
    }
}

impl GameSettings {
    /// Parse and validate settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the timing model cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.starting_pattern_length == 0 {
            return Err(SettingsError::invalid("starting_pattern_length", "must be at least 1"));
        }
        if self.max_pattern_length < self.starting_pattern_length {
            return Err(SettingsError::invalid(
                "max_pattern_length",
                "must not be smaller than starting_pattern_length",
            ));
        }

        let positive = [
            ("min_time_per_tile", self.min_time_per_tile),
            ("min_highlight_time", self.min_highlight_time),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::invalid(field, "must be a positive number of seconds"));
            }
        }

        let non_negative = [
            ("base_time_limit", self.base_time_limit),
            ("additional_time_per_tile", self.additional_time_per_tile),
            ("time_reduction_per_level", self.time_reduction_per_level),
            ("countdown_grace_delay", self.countdown_grace_delay),
            ("highlight_time", self.highlight_time),
            ("decrease_highlight_time_per_level", self.decrease_highlight_time_per_level),
            ("wait_time_between_tiles", self.wait_time_between_tiles),
            ("wait_time_before_playback", self.wait_time_before_playback),
            ("visual_settle_time", self.visual_settle_time),
            ("step_cooldown", self.step_cooldown),
            ("level_complete_prompt_delay", self.level_complete_prompt_delay),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::invalid(field, "must be a non-negative number of seconds"));
            }
        }

        Ok(())
    }
}
