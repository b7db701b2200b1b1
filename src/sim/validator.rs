//! Player input validation
//!
//! Tracks the cursor into the expected pattern, debounces sensor bounce and
//! classifies each step. Knows nothing about scoring or events; the
//! controller turns outcomes into transitions.

use serde::{Deserialize, Serialize};

use super::pattern::Pattern;
use super::registry::TargetId;

/// Why a step was dropped without effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Not in the awaiting-input phase
    NotAccepting,
    /// A failure already ended this turn
    AlreadyFailed,
    /// Within the cooldown of the previous accepted step
    Debounced,
    /// Id is not in the registry
    UnknownTarget,
}

/// Classification of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Right target. `is_last` means the pattern is now complete.
    Correct { index: usize, target: TargetId, is_last: bool },
    /// Wrong target; the turn is lost
    Wrong { index: usize, expected: TargetId, stepped: TargetId },
    Ignored(IgnoreReason),
}

/// Cursor and gating for one awaiting-input phase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputValidator {
    cursor: usize,
    accepting: bool,
    failed: bool,
    /// Seconds since the last step that passed the debounce, saturating at
    /// `cooldown`
    since_last_step: Option<f32>,
    cooldown: f32,
}

impl InputValidator {
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown,
            ..Default::default()
        }
    }

    /// Open the gate for a fresh attempt
    pub fn begin(&mut self) {
        self.cursor = 0;
        self.accepting = true;
        self.failed = false;
        self.since_last_step = None;
    }

    /// Let `dt` seconds pass for the debounce window
    pub fn advance(&mut self, dt: f32) {
        if let Some(since) = self.since_last_step.as_mut() {
            *since = (*since + dt.max(0.0)).min(self.cooldown);
        }
    }

    /// Close the gate without failing (reveal started, turn won, reset)
    pub fn close(&mut self) {
        self.accepting = false;
    }

    /// Close the gate and refuse further steps until the next `begin`
    pub fn fail(&mut self) {
        self.accepting = false;
        self.failed = true;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting && !self.failed
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Check `stepped` against the pattern
    pub fn step(&mut self, pattern: &Pattern, stepped: TargetId) -> StepOutcome {
        if self.failed {
            return StepOutcome::Ignored(IgnoreReason::AlreadyFailed);
        }
        if !self.accepting {
            return StepOutcome::Ignored(IgnoreReason::NotAccepting);
        }
        if self.since_last_step.is_some_and(|since| since < self.cooldown) {
            return StepOutcome::Ignored(IgnoreReason::Debounced);
        }
        self.since_last_step = Some(0.0);

        let index = self.cursor;
        let Some(expected) = pattern.get(index) else {
            // Cursor already at the end: the turn is over
            self.accepting = false;
            return StepOutcome::Ignored(IgnoreReason::NotAccepting);
        };

        if stepped != expected {
            self.fail();
            return StepOutcome::Wrong {
                index,
                expected,
                stepped,
            };
        }

        self.cursor += 1;
        let is_last = self.cursor >= pattern.len();
        if is_last {
            self.accepting = false;
        }
        StepOutcome::Correct {
            index,
            target: stepped,
            is_last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Pattern {
        Pattern::new(vec![TargetId(0), TargetId(1), TargetId(2)])
    }

    /// Step after letting a full cooldown pass
    fn step_later(v: &mut InputValidator, p: &Pattern, target: usize) -> StepOutcome {
        v.advance(1.0);
        v.step(p, TargetId(target))
    }

    #[test]
    fn test_ignored_until_begin() {
        let mut v = InputValidator::new(0.5);
        assert_eq!(
            v.step(&abc(), TargetId(0)),
            StepOutcome::Ignored(IgnoreReason::NotAccepting)
        );
        assert_eq!(v.cursor(), 0);
    }

    #[test]
    fn test_full_pattern() {
        let mut v = InputValidator::new(0.5);
        let p = abc();
        v.begin();
        assert_eq!(
            v.step(&p, TargetId(0)),
            StepOutcome::Correct { index: 0, target: TargetId(0), is_last: false }
        );
        assert_eq!(
            step_later(&mut v, &p, 1),
            StepOutcome::Correct { index: 1, target: TargetId(1), is_last: false }
        );
        assert_eq!(
            step_later(&mut v, &p, 2),
            StepOutcome::Correct { index: 2, target: TargetId(2), is_last: true }
        );
        assert_eq!(v.cursor(), 3);
        assert!(!v.is_accepting());
        assert_eq!(
            step_later(&mut v, &p, 0),
            StepOutcome::Ignored(IgnoreReason::NotAccepting)
        );
    }

    #[test]
    fn test_wrong_step_locks_out() {
        let mut v = InputValidator::new(0.5);
        let p = abc();
        v.begin();
        v.step(&p, TargetId(0));
        assert_eq!(
            step_later(&mut v, &p, 3),
            StepOutcome::Wrong { index: 1, expected: TargetId(1), stepped: TargetId(3) }
        );
        assert!(v.has_failed());
        assert_eq!(
            step_later(&mut v, &p, 1),
            StepOutcome::Ignored(IgnoreReason::AlreadyFailed)
        );

        // A new attempt clears the failure and the debounce window
        v.begin();
        assert_eq!(v.cursor(), 0);
        assert!(matches!(v.step(&p, TargetId(0)), StepOutcome::Correct { .. }));
    }

    #[test]
    fn test_debounce_window() {
        let mut v = InputValidator::new(0.5);
        let p = abc();
        v.begin();
        assert!(matches!(v.step(&p, TargetId(0)), StepOutcome::Correct { .. }));
        // Same target bouncing
        v.advance(0.25);
        assert_eq!(
            v.step(&p, TargetId(0)),
            StepOutcome::Ignored(IgnoreReason::Debounced)
        );
        // Different target still inside the window
        v.advance(0.125);
        assert_eq!(
            v.step(&p, TargetId(1)),
            StepOutcome::Ignored(IgnoreReason::Debounced)
        );
        assert_eq!(v.cursor(), 1);
        v.advance(0.125);
        assert!(matches!(v.step(&p, TargetId(1)), StepOutcome::Correct { index: 1, .. }));
    }

    #[test]
    fn test_debounce_ignores_bad_dt() {
        let mut v = InputValidator::new(0.5);
        let p = abc();
        v.begin();
        v.step(&p, TargetId(0));
        v.advance(f32::NAN);
        v.advance(-10.0);
        assert_eq!(
            v.step(&p, TargetId(1)),
            StepOutcome::Ignored(IgnoreReason::Debounced)
        );
    }

    #[test]
    fn test_window_saturates_after_long_idle() {
        let mut v = InputValidator::new(0.5);
        let p = abc();
        v.begin();
        v.step(&p, TargetId(0));
        for _ in 0..100_000 {
            v.advance(10.0);
        }
        assert!(matches!(v.step(&p, TargetId(1)), StepOutcome::Correct { index: 1, .. }));
        assert_eq!(
            v.step(&p, TargetId(2)),
            StepOutcome::Ignored(IgnoreReason::Debounced)
        );
    }
}
