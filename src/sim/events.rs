//! Outbound event surface
//!
//! Presentation collaborators (HUD text, particles, audio) subscribe per
//! event kind. Callbacks run synchronously, in registration order, while the
//! controller is inside the transition that raised them.

use serde::{Deserialize, Serialize};

use super::countdown::Urgency;
use super::registry::{ResourceHandle, TargetId};

/// Why a turn was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailCause {
    WrongTarget { expected: TargetId, stepped: TargetId },
    /// Countdown ran out; `pending` is the target the player still owed
    Timeout { pending: Option<TargetId> },
}

/// Everything the core reports to the outside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score and level reset by a new game
    GameReset,
    /// Reveal phase beginning
    PatternStart { level: u32, pattern_length: usize },
    /// A pattern target was placed on the board (before the reveal plays)
    TargetPlaced {
        target: TargetId,
        display: Option<ResourceHandle>,
        sound: Option<ResourceHandle>,
    },
    TargetHighlighted {
        index: usize,
        target: TargetId,
        duration: f32,
        sound: Option<ResourceHandle>,
    },
    TargetUnhighlighted { index: usize, target: TargetId },
    /// Reveal finished, input accepted from now on
    PatternComplete,
    CountdownStarted { limit: f32 },
    RemainingTimeChanged { remaining: f32, limit: f32, urgency: Urgency },
    TimeBonusApplied { requested: f32, added: f32, remaining: f32 },
    /// Correct step; `is_last` selects the special feedback
    StepAccepted {
        index: usize,
        target: TargetId,
        is_last: bool,
        sound: Option<ResourceHandle>,
    },
    /// Whole pattern reproduced
    PlayerSuccess { score: u32, level: u32, pattern_length: usize },
    PlayerFail { cause: FailCause, score: u32, level: u32 },
    /// Prompt the player to re-enter the start area for `level`
    NextLevelPrompt { level: u32 },
}

/// Discriminant used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    GameReset,
    PatternStart,
    TargetPlaced,
    TargetHighlighted,
    TargetUnhighlighted,
    PatternComplete,
    CountdownStarted,
    RemainingTimeChanged,
    TimeBonusApplied,
    StepAccepted,
    PlayerSuccess,
    PlayerFail,
    NextLevelPrompt,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::GameReset => EventKind::GameReset,
            GameEvent::PatternStart { .. } => EventKind::PatternStart,
            GameEvent::TargetPlaced { .. } => EventKind::TargetPlaced,
            GameEvent::TargetHighlighted { .. } => EventKind::TargetHighlighted,
            GameEvent::TargetUnhighlighted { .. } => EventKind::TargetUnhighlighted,
            GameEvent::PatternComplete => EventKind::PatternComplete,
            GameEvent::CountdownStarted { .. } => EventKind::CountdownStarted,
            GameEvent::RemainingTimeChanged { .. } => EventKind::RemainingTimeChanged,
            GameEvent::TimeBonusApplied { .. } => EventKind::TimeBonusApplied,
            GameEvent::StepAccepted { .. } => EventKind::StepAccepted,
            GameEvent::PlayerSuccess { .. } => EventKind::PlayerSuccess,
            GameEvent::PlayerFail { .. } => EventKind::PlayerFail,
            GameEvent::NextLevelPrompt { .. } => EventKind::NextLevelPrompt,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&GameEvent)>;

struct Subscription {
    id: SubscriptionId,
    /// `None` receives every kind
    kind: Option<EventKind>,
    callback: Callback,
}

/// Ordered callback registry
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `callback` for every event of `kind`
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.push(Some(kind), Box::new(callback))
    }

    /// Call `callback` for every event
    pub fn subscribe_all(&mut self, callback: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.push(None, Box::new(callback))
    }

    /// Returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Deliver to matching subscribers in registration order
    pub fn emit(&mut self, event: &GameEvent) {
        let kind = event.kind();
        for sub in &mut self.subscriptions {
            if sub.kind.is_none_or(|k| k == kind) {
                (sub.callback)(event);
            }
        }
    }

    fn push(&mut self, kind: Option<EventKind>, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, callback });
        id
    }
}
