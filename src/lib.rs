//! Tile Recall - a "Simon says" floor-tile memory game
//!
//! Core modules:
//! - `sim`: Deterministic turn loop (pattern generation, reveal, countdown, input validation)
//! - `settings`: Data-driven game balance
//! - `error`: Configuration errors
//!
//! Rendering, particles, audio and tile sensing are collaborators: they feed
//! signals into [`sim::TurnController`] and subscribe to its [`sim::GameEvent`]s.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SettingsError;
pub use settings::GameSettings;
pub use sim::{GameEvent, TargetId, TargetRegistry, TickInput, TurnController, TurnState};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Pattern size
    pub const STARTING_PATTERN_LENGTH: u32 = 3;
    pub const MAX_PATTERN_LENGTH: u32 = 10;

    /// Countdown
    pub const BASE_TIME_LIMIT: f32 = 10.0;
    pub const ADDITIONAL_TIME_PER_TILE: f32 = 1.0;
    pub const TIME_REDUCTION_PER_LEVEL: f32 = 0.2;
    pub const MIN_TIME_PER_TILE: f32 = 0.8;
    pub const COUNTDOWN_GRACE_DELAY: f32 = 2.0;

    /// Reveal pacing
    pub const HIGHLIGHT_TIME: f32 = 1.0;
    pub const HIGHLIGHT_DECAY_PER_LEVEL: f32 = 0.1;
    pub const MIN_HIGHLIGHT_TIME: f32 = 0.3;
    pub const WAIT_BETWEEN_TILES: f32 = 0.5;
    pub const WAIT_BEFORE_PLAYBACK: f32 = 1.0;
    /// Time for dropped tile visuals to land before playback
    pub const VISUAL_SETTLE_TIME: f32 = 1.0;

    /// Sensor debounce
    pub const STEP_COOLDOWN: f32 = 0.5;

    pub const LEVEL_COMPLETE_PROMPT_DELAY: f32 = 4.0;

    /// Seconds granted by the add-time pickup
    pub const POWER_UP_BONUS_SECS: f32 = 15.0;
}
