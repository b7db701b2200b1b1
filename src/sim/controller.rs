//! Turn controller
//!
//! Owns level/score and drives one turn at a time:
//! generate -> reveal -> (grace delay) countdown + input -> success or fail.
//! Everything advances from `tick`; inputs in a tick are applied before any
//! timer so a step landing on the last frame beats the countdown.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::countdown::{BonusOutcome, Countdown};
use super::difficulty;
use super::events::{EventBus, EventKind, FailCause, GameEvent, SubscriptionId};
use super::pattern::{self, Pattern};
use super::registry::{TargetId, TargetRegistry};
use super::reveal::{RevealCue, RevealSequencer, RevealTiming};
use super::schedule::OneShot;
use super::validator::{IgnoreReason, InputValidator, StepOutcome};
use crate::settings::GameSettings;

/// Phase of the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// No game started yet
    Idle,
    /// Pattern being shown; input ignored
    Revealing,
    /// Player reproducing the pattern
    AwaitingInput,
    /// Pattern reproduced; waiting for the player to start the next level
    Success,
    /// Turn lost; the next start resets the game
    Failed,
    /// Countdown ran out. Passed through on the way to `Failed`, never observed
    /// between ticks.
    TimeExpired,
}

/// Level and score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Starts at 1
    pub level: u32,
    pub score: u32,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self { level: 1, score: 0 }
    }
}

/// Environment signals collected during one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start button pressed
    pub start_game: bool,
    /// Player walked into the start/reset area
    pub entered_reset_zone: bool,
    /// Targets stepped on, in sensor order
    pub steps: Vec<TargetId>,
    /// Time pickup collected
    pub time_bonus: Option<f32>,
}

/// The game state machine
pub struct TurnController<R: Rng = Pcg32> {
    settings: GameSettings,
    registry: TargetRegistry,
    rng: R,
    state: TurnState,
    progress: PlayerProgress,
    pattern: Pattern,
    reveal: Option<RevealSequencer>,
    validator: InputValidator,
    countdown: Countdown,
    /// Pause between reveal end and countdown start
    grace: OneShot,
    /// Delay before the next-level prompt
    prompt: OneShot,
    /// Simulated seconds since construction. Only reported; no timing
    /// decision reads it.
    clock: f64,
    events: EventBus,
}

impl TurnController<Pcg32> {
    /// Controller with a seeded PCG stream
    pub fn with_seed(registry: TargetRegistry, settings: GameSettings, seed: u64) -> Self {
        Self::new(registry, settings, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> TurnController<R> {
    pub fn new(registry: TargetRegistry, settings: GameSettings, rng: R) -> Self {
        let validator = InputValidator::new(settings.step_cooldown);
        Self {
            settings,
            registry,
            rng,
            state: TurnState::Idle,
            progress: PlayerProgress::default(),
            pattern: Pattern::default(),
            reveal: None,
            validator,
            countdown: Countdown::default(),
            grace: OneShot::default(),
            prompt: OneShot::default(),
            clock: 0.0,
            events: EventBus::new(),
        }
    }

    // === Accessors ===

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn progress(&self) -> PlayerProgress {
        self.progress
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn input_index(&self) -> usize {
        self.validator.cursor()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Target lit by the reveal right now
    pub fn highlighted(&self) -> Option<TargetId> {
        self.reveal.as_ref().and_then(|r| r.highlighted())
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    // === Subscriptions ===

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(kind, callback)
    }

    pub fn subscribe_all(&mut self, callback: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.events.subscribe_all(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // === Inbound signals ===

    /// Advance one frame: apply this frame's inputs, then run the timers.
    /// A negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("Invalid frame delta {}, treating as 0", dt);
            0.0
        };
        if input.start_game {
            self.start_game();
        }
        if input.entered_reset_zone {
            self.player_entered_reset_zone();
        }
        for &target in &input.steps {
            self.player_stepped_on(target);
        }
        if let Some(seconds) = input.time_bonus {
            self.time_bonus(seconds);
        }
        self.advance(dt);
    }

    /// Reset level and score and begin a new pattern, cancelling whatever was running
    pub fn start_game(&mut self) {
        log::info!("Starting new game");
        self.progress = PlayerProgress::default();
        self.emit(GameEvent::GameReset);
        self.begin_turn();
    }

    /// Start the first turn, retry after a loss, or move on after a win
    pub fn player_entered_reset_zone(&mut self) {
        match self.state {
            TurnState::Idle => {
                log::info!("Player entered start area, starting pattern");
                self.begin_turn();
            }
            TurnState::Failed => {
                log::info!("Player entered start area after a loss, restarting from level 1");
                self.progress = PlayerProgress::default();
                self.emit(GameEvent::GameReset);
                self.begin_turn();
            }
            TurnState::Success => {
                log::info!("Player re-entered start area, proceeding to level {}", self.progress.level);
                self.begin_turn();
            }
            TurnState::Revealing | TurnState::AwaitingInput | TurnState::TimeExpired => {
                log::debug!("Start area entered during {:?}, ignored", self.state);
            }
        }
    }

    /// Forwarded from the target sensors
    pub fn player_stepped_on(&mut self, target: TargetId) -> StepOutcome {
        match self.state {
            TurnState::AwaitingInput => {}
            TurnState::Failed | TurnState::TimeExpired => {
                return StepOutcome::Ignored(IgnoreReason::AlreadyFailed);
            }
            _ => return StepOutcome::Ignored(IgnoreReason::NotAccepting),
        }
        if !self.registry.contains(target) {
            log::warn!("Step on unregistered target {}, ignored", target);
            return StepOutcome::Ignored(IgnoreReason::UnknownTarget);
        }

        let outcome = self.validator.step(&self.pattern, target);
        match outcome {
            StepOutcome::Correct {
                index,
                target,
                is_last,
            } => {
                log::debug!("Correct tile {} at index {}", target, index);
                let sound = self.registry.get(target).and_then(|t| t.sound);
                self.emit(GameEvent::StepAccepted {
                    index,
                    target,
                    is_last,
                    sound,
                });
                if is_last {
                    self.complete_turn();
                }
            }
            StepOutcome::Wrong {
                expected, stepped, ..
            } => {
                log::info!("Wrong tile! Expected {}, but stepped on {}", expected, stepped);
                self.fail_turn(FailCause::WrongTarget { expected, stepped });
            }
            StepOutcome::Ignored(reason) => {
                log::debug!("Step on {} ignored: {:?}", target, reason);
            }
        }
        outcome
    }

    /// Forwarded from a time pickup. Dropped unless the countdown is running.
    pub fn time_bonus(&mut self, seconds: f32) -> BonusOutcome {
        let outcome = self.countdown.add_bonus(seconds);
        match outcome {
            BonusOutcome::Applied { added } => {
                log::info!("{} seconds added, timer now {:.1}s", added, self.countdown.remaining());
                self.emit(GameEvent::TimeBonusApplied {
                    requested: seconds,
                    added,
                    remaining: self.countdown.remaining(),
                });
                self.emit_remaining_time();
            }
            BonusOutcome::Discarded => {
                log::debug!("Time bonus of {}s discarded, countdown not running", seconds);
            }
        }
        outcome
    }

    // === Internals ===

    /// Run every timer for `dt`. Each timer hands the part of `dt` it did not
    /// need to whatever it arms: reveal -> grace -> countdown, and an empty
    /// reveal -> prompt. Anything armed by an input this tick gets all of `dt`.
    fn advance(&mut self, dt: f32) {
        self.clock += f64::from(dt);
        self.validator.advance(dt);

        self.tick_countdown(dt);
        self.tick_grace(dt);
        self.tick_prompt(dt);

        if self.state == TurnState::Revealing {
            let (cues, highlight, leftover) = match self.reveal.as_mut() {
                Some(reveal) => {
                    let cues = reveal.advance(dt);
                    (cues, reveal.timing().highlight, reveal.leftover())
                }
                None => (vec![RevealCue::Complete], 0.0, dt),
            };
            for cue in cues {
                self.handle_cue(cue, highlight, leftover);
            }
        }
    }

    fn tick_countdown(&mut self, dt: f32) {
        if !self.countdown.is_active() {
            return;
        }
        let expired = self.countdown.tick(dt);
        self.emit_remaining_time();
        if expired {
            self.handle_time_expired();
        }
    }

    fn tick_grace(&mut self, dt: f32) {
        let Some(leftover) = self.grace.tick(dt) else {
            return;
        };
        if self.state == TurnState::AwaitingInput {
            self.start_countdown();
            if leftover > 0.0 {
                self.tick_countdown(leftover);
            }
        }
    }

    fn tick_prompt(&mut self, dt: f32) {
        if self.prompt.tick(dt).is_some() && self.state == TurnState::Success {
            self.emit(GameEvent::NextLevelPrompt {
                level: self.progress.level,
            });
        }
    }

    fn begin_turn(&mut self) {
        self.countdown.stop();
        self.grace.cancel();
        self.prompt.cancel();
        self.validator.close();

        let level = self.progress.level;
        let requested = difficulty::pattern_length(&self.settings, level);
        let draw = pattern::generate(
            &mut self.rng,
            requested,
            self.settings.allow_duplicates_in_pattern,
            self.registry.len(),
        );
        if draw.truncated {
            log::warn!(
                "Requested pattern length {} exceeds {} available tiles, truncating",
                draw.requested,
                self.registry.len()
            );
        }

        self.pattern = draw.pattern;
        self.reveal = Some(RevealSequencer::new(
            &self.pattern,
            RevealTiming::for_level(&self.settings, level),
        ));
        self.state = TurnState::Revealing;
        log::info!("Level {}: generated pattern of length {}", level, self.pattern.len());

        self.emit(GameEvent::PatternStart {
            level,
            pattern_length: self.pattern.len(),
        });
        let placed: Vec<GameEvent> = self
            .pattern
            .iter()
            .map(|id| {
                let target = self.registry.get(id);
                GameEvent::TargetPlaced {
                    target: id,
                    display: target.and_then(|t| t.display),
                    sound: target.and_then(|t| t.sound),
                }
            })
            .collect();
        for event in placed {
            self.emit(event);
        }
    }

    fn handle_cue(&mut self, cue: RevealCue, highlight: f32, leftover: f32) {
        match cue {
            RevealCue::Highlight { index, target } => {
                log::debug!("Highlighted tile {}", target);
                let sound = self.registry.get(target).and_then(|t| t.sound);
                self.emit(GameEvent::TargetHighlighted {
                    index,
                    target,
                    duration: highlight,
                    sound,
                });
            }
            RevealCue::Unhighlight { index, target } => {
                self.emit(GameEvent::TargetUnhighlighted { index, target });
            }
            RevealCue::Complete => self.finish_reveal(leftover),
        }
    }

    /// `leftover` is the part of this tick that came after the reveal ended
    fn finish_reveal(&mut self, leftover: f32) {
        self.reveal = None;
        self.state = TurnState::AwaitingInput;
        self.validator.begin();
        log::info!("Pattern finished, player's turn");
        self.emit(GameEvent::PatternComplete);

        if self.pattern.is_empty() {
            // Nothing to reproduce
            self.complete_turn();
            self.tick_prompt(leftover);
            return;
        }
        self.grace.arm(self.settings.countdown_grace_delay);
        self.tick_grace(leftover);
    }

    fn start_countdown(&mut self) {
        let limit = self
            .countdown
            .start(&self.settings, self.pattern.len(), self.progress.level);
        log::debug!("Countdown started: {:.1}s", limit);
        self.emit(GameEvent::CountdownStarted { limit });
        self.emit_remaining_time();
    }

    fn complete_turn(&mut self) {
        self.countdown.stop();
        self.grace.cancel();
        self.validator.close();
        self.state = TurnState::Success;

        let pattern_length = self.pattern.len();
        self.progress.score = self.progress.score.saturating_add(pattern_length as u32);
        self.progress.level = self.progress.level.saturating_add(1);
        log::info!(
            "Player completed the pattern! score={} level={}",
            self.progress.score,
            self.progress.level
        );

        self.emit(GameEvent::PlayerSuccess {
            score: self.progress.score,
            level: self.progress.level,
            pattern_length,
        });
        self.prompt.arm(self.settings.level_complete_prompt_delay);
    }

    fn handle_time_expired(&mut self) {
        if self.state != TurnState::AwaitingInput {
            return;
        }
        self.state = TurnState::TimeExpired;
        let cursor = self.validator.cursor();
        log::info!("Time limit exceeded at index {}", cursor);
        self.fail_turn(FailCause::Timeout {
            pending: self.pattern.get(cursor),
        });
    }

    fn fail_turn(&mut self, cause: FailCause) {
        self.countdown.stop();
        self.grace.cancel();
        self.validator.fail();
        self.state = TurnState::Failed;
        self.emit(GameEvent::PlayerFail {
            cause,
            score: self.progress.score,
            level: self.progress.level,
        });
    }

    fn emit_remaining_time(&mut self) {
        self.emit(GameEvent::RemainingTimeChanged {
            remaining: self.countdown.remaining(),
            limit: self.countdown.limit(),
            urgency: self.countdown.urgency(),
        });
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.emit(&event);
    }
}
