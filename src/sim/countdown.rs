//! Per-turn countdown
//!
//! The limit is fixed when the countdown starts: per-tile time (shrinking with
//! level) times the pattern length. `remaining` only goes down, except for
//! bonuses, which are capped at the limit.

use serde::{Deserialize, Serialize};

use super::difficulty;
use crate::settings::GameSettings;

/// Display band for the remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    /// At least half the limit left
    Normal,
    /// Under half
    Warning,
    /// Under a quarter
    Critical,
}

/// What happened to a bonus request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BonusOutcome {
    /// Seconds actually added after clamping to the limit
    Applied { added: f32 },
    /// Countdown not running; the bonus is dropped
    Discarded,
}

/// Countdown state for the current turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    limit: f32,
    remaining: f32,
    active: bool,
    expired: bool,
}

impl Countdown {
    /// Start a fresh countdown for this turn, replacing any running one.
    /// Returns the computed limit.
    pub fn start(&mut self, settings: &GameSettings, pattern_length: usize, level: u32) -> f32 {
        let limit = difficulty::countdown_limit(settings, level, pattern_length);
        self.start_with_limit(limit);
        limit
    }

    pub fn start_with_limit(&mut self, limit: f32) {
        if self.active {
            log::debug!("Countdown restarted with {:.1}s still remaining", self.remaining);
        }
        self.limit = limit.max(0.0);
        self.remaining = self.limit;
        self.active = true;
        self.expired = false;
    }

    /// No-op when already stopped
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Advance by `dt`. Returns true on the one tick the countdown runs out.
    /// Negative or NaN `dt` counts as no time passing.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        if self.remaining <= 0.0 {
            self.active = false;
            self.expired = true;
            return true;
        }
        false
    }

    pub fn add_bonus(&mut self, seconds: f32) -> BonusOutcome {
        if !self.active {
            return BonusOutcome::Discarded;
        }
        let before = self.remaining;
        self.remaining = (self.remaining + seconds.max(0.0)).min(self.limit);
        BonusOutcome::Applied {
            added: self.remaining - before,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn urgency(&self) -> Urgency {
        if self.remaining < self.limit * 0.25 {
            Urgency::Critical
        } else if self.remaining < self.limit * 0.5 {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}
