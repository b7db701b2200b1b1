//! One-shot delays driven by the simulation tick

use serde::{Deserialize, Serialize};

/// A delay that fires once after being armed. Re-arming replaces any pending
/// deadline; nothing ever sleeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OneShot {
    remaining: Option<f32>,
}

impl OneShot {
    pub fn arm(&mut self, delay: f32) {
        self.remaining = Some(delay.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance by `dt`. Returns the unused part of `dt` exactly once, on the
    /// tick the delay elapses, so whatever fires next can carry it.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        let remaining = self.remaining.as_mut()?;
        let dt = dt.max(0.0);
        if *remaining > dt {
            *remaining -= dt;
            return None;
        }
        let leftover = dt - *remaining;
        self.remaining = None;
        Some(leftover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let mut delay = OneShot::default();
        delay.arm(1.0);
        assert_eq!(delay.tick(0.5), None);
        assert_eq!(delay.tick(0.5), Some(0.0));
        assert_eq!(delay.tick(0.5), None);
        assert!(!delay.is_pending());
    }

    #[test]
    fn test_cancel_and_rearm() {
        let mut delay = OneShot::default();
        delay.arm(1.0);
        delay.cancel();
        assert_eq!(delay.tick(2.0), None);

        delay.arm(1.0);
        assert_eq!(delay.tick(0.75), None);
        delay.arm(1.0);
        assert_eq!(delay.tick(0.75), None);
        assert_eq!(delay.tick(0.25), Some(0.0));
    }

    #[test]
    fn test_zero_delay_fires_on_next_tick() {
        let mut delay = OneShot::default();
        delay.arm(0.0);
        assert!(delay.is_pending());
        assert_eq!(delay.tick(0.0), Some(0.0));
    }

    #[test]
    fn test_overshoot_is_returned() {
        let mut delay = OneShot::default();
        delay.arm(1.0);
        assert_eq!(delay.tick(1.5), Some(0.5));
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut delay = OneShot::default();
        delay.arm(1.0);
        assert_eq!(delay.tick(-5.0), None);
        assert_eq!(delay.tick(1.0), Some(0.0));
    }
}
