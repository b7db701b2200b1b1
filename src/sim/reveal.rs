//! Reveal sequencing
//!
//! A resumable process: settle -> lead-in -> (highlight, gap) per target -> done.
//! Each `advance` consumes simulated time and hands back the cues that fell
//! inside it. Leftover time carries into the next phase so pacing does not
//! depend on frame rate.

use serde::{Deserialize, Serialize};

use super::pattern::Pattern;
use super::registry::TargetId;
use crate::settings::GameSettings;

/// Something the presentation layer should do at this point of the reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealCue {
    Highlight { index: usize, target: TargetId },
    Unhighlight { index: usize, target: TargetId },
    /// Last gap elapsed; input may begin
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Phase {
    /// Placed tiles dropping into position
    Settle,
    /// Wait before the first highlight
    LeadIn,
    Highlight(usize),
    Gap(usize),
    Done,
}

/// Timings frozen at the start of a reveal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealTiming {
    pub settle: f32,
    pub lead_in: f32,
    pub highlight: f32,
    pub gap: f32,
}

impl RevealTiming {
    pub fn for_level(settings: &GameSettings, level: u32) -> Self {
        Self {
            settle: settings.visual_settle_time,
            lead_in: settings.wait_time_before_playback,
            highlight: super::difficulty::highlight_duration(settings, level),
            gap: settings.wait_time_between_tiles,
        }
    }

    /// Wall time from start to `Complete` for a pattern of `len` targets
    pub fn total(&self, len: usize) -> f32 {
        self.settle + self.lead_in + (self.highlight + self.gap) * len as f32
    }
}

/// Drives one reveal of one pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealSequencer {
    targets: Vec<TargetId>,
    timing: RevealTiming,
    phase: Phase,
    /// Seconds left in the current phase
    phase_remaining: f32,
    /// Part of the finishing `advance` that came after `Complete`
    leftover: f32,
}

impl RevealSequencer {
    pub fn new(pattern: &Pattern, timing: RevealTiming) -> Self {
        Self {
            targets: pattern.targets().to_vec(),
            timing,
            phase: Phase::Settle,
            phase_remaining: timing.settle,
            leftover: 0.0,
        }
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Target currently lit, if any
    pub fn highlighted(&self) -> Option<TargetId> {
        match self.phase {
            Phase::Highlight(i) => self.targets.get(i).copied(),
            _ => None,
        }
    }

    /// Time left over after `Complete` in the `advance` that finished the reveal
    pub fn leftover(&self) -> f32 {
        self.leftover
    }

    /// Consume `dt` seconds and return the cues crossed, in order
    pub fn advance(&mut self, dt: f32) -> Vec<RevealCue> {
        let mut cues = Vec::new();
        if self.phase == Phase::Done {
            return cues;
        }
        let mut budget = dt.max(0.0);

        while self.phase != Phase::Done {
            if self.phase_remaining > budget {
                self.phase_remaining -= budget;
                break;
            }
            budget -= self.phase_remaining;
            self.next_phase(&mut cues);
        }

        if self.phase == Phase::Done {
            self.leftover = budget;
        }
        cues
    }

    fn next_phase(&mut self, cues: &mut Vec<RevealCue>) {
        let (phase, duration) = match self.phase {
            Phase::Settle => (Phase::LeadIn, self.timing.lead_in),
            Phase::LeadIn => self.highlight_or_done(0, cues),
            Phase::Highlight(i) => {
                cues.push(RevealCue::Unhighlight {
                    index: i,
                    target: self.targets[i],
                });
                (Phase::Gap(i), self.timing.gap)
            }
            Phase::Gap(i) => self.highlight_or_done(i + 1, cues),
            Phase::Done => (Phase::Done, 0.0),
        };
        self.phase = phase;
        self.phase_remaining = duration;
    }

    fn highlight_or_done(&self, index: usize, cues: &mut Vec<RevealCue>) -> (Phase, f32) {
        match self.targets.get(index) {
            Some(&target) => {
                cues.push(RevealCue::Highlight { index, target });
                (Phase::Highlight(index), self.timing.highlight)
            }
            None => {
                cues.push(RevealCue::Complete);
                (Phase::Done, 0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> RevealTiming {
        RevealTiming {
            settle: 1.0,
            lead_in: 1.0,
            highlight: 1.0,
            gap: 0.5,
        }
    }

    fn pattern(ids: &[usize]) -> Pattern {
        Pattern::new(ids.iter().copied().map(TargetId).collect())
    }

    #[test]
    fn test_cue_order_and_timing() {
        let mut seq = RevealSequencer::new(&pattern(&[4, 2]), timing());

        // Settle + lead-in: nothing visible yet
        assert!(seq.advance(1.5).is_empty());
        assert_eq!(
            seq.advance(0.5),
            vec![RevealCue::Highlight { index: 0, target: TargetId(4) }]
        );
        assert_eq!(seq.highlighted(), Some(TargetId(4)));

        assert_eq!(
            seq.advance(1.0),
            vec![RevealCue::Unhighlight { index: 0, target: TargetId(4) }]
        );
        assert_eq!(seq.highlighted(), None);
        assert_eq!(
            seq.advance(0.5),
            vec![RevealCue::Highlight { index: 1, target: TargetId(2) }]
        );
        assert_eq!(
            seq.advance(1.5),
            vec![
                RevealCue::Unhighlight { index: 1, target: TargetId(2) },
                RevealCue::Complete
            ]
        );
        assert!(seq.is_complete());
        assert!(seq.advance(5.0).is_empty());
    }

    #[test]
    fn test_large_step_crosses_whole_reveal() {
        let t = timing();
        let mut seq = RevealSequencer::new(&pattern(&[0, 1, 2]), t);
        let cues = seq.advance(t.total(3));
        assert_eq!(cues.len(), 7);
        assert_eq!(cues.last(), Some(&RevealCue::Complete));
        assert!(seq.is_complete());
    }

    #[test]
    fn test_leftover_after_complete() {
        let mut seq = RevealSequencer::new(&pattern(&[3]), timing());
        assert_eq!(
            seq.advance(2.5),
            vec![RevealCue::Highlight { index: 0, target: TargetId(3) }]
        );
        assert_eq!(
            seq.advance(1.5),
            vec![RevealCue::Unhighlight { index: 0, target: TargetId(3) }, RevealCue::Complete]
        );
        assert_eq!(seq.leftover(), 0.5);
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut seq = RevealSequencer::new(&pattern(&[3]), timing());
        assert!(seq.advance(-4.0).is_empty());
        assert!(seq.advance(f32::NAN).is_empty());
        assert!(seq.advance(1.5).is_empty());
        assert_eq!(
            seq.advance(0.5),
            vec![RevealCue::Highlight { index: 0, target: TargetId(3) }]
        );
    }

    #[test]
    fn test_empty_pattern_completes_after_lead_in() {
        let mut seq = RevealSequencer::new(&Pattern::default(), timing());
        assert!(seq.advance(1.5).is_empty());
        assert_eq!(seq.advance(0.5), vec![RevealCue::Complete]);
    }

    #[test]
    fn test_timing_follows_level() {
        let settings = GameSettings::default();
        let t1 = RevealTiming::for_level(&settings, 1);
        let t5 = RevealTiming::for_level(&settings, 5);
        assert!(t5.highlight < t1.highlight);
        assert_eq!(t1.gap, t5.gap);
    }
}
