//! Deterministic turn simulation
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time advances only through `tick(dt)`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod controller;
pub mod countdown;
pub mod difficulty;
pub mod events;
pub mod pattern;
pub mod registry;
pub mod reveal;
pub mod schedule;
pub mod validator;

pub use controller::{PlayerProgress, TickInput, TurnController, TurnState};
pub use countdown::{BonusOutcome, Countdown, Urgency};
pub use events::{EventBus, EventKind, FailCause, GameEvent, SubscriptionId};
pub use pattern::{Pattern, PatternDraw, generate};
pub use registry::{ResourceHandle, Target, TargetId, TargetRegistry};
pub use reveal::{RevealCue, RevealSequencer, RevealTiming};
pub use schedule::OneShot;
pub use validator::{IgnoreReason, InputValidator, StepOutcome};
