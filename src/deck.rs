//! The card stack: cursor, drag offset and the per-gesture state machine.
//!
//! ```text
//! Idle ──drag start──▶ Dragging ──release──▶ Resolving ──settled──▶ Idle
//! ```
//!
//! Only two profiles are ever visible: the active card (id == cursor) and
//! the next card (id == cursor + 1), painted beneath it. The cursor moves
//! forward by one after a dismiss animation settles, never at release time.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{DeckConfig, GestureConfig, MotionConfig};
use crate::error::Result;
use crate::geometry::{Vec2, Viewport};
use crate::gesture::{GestureOutcome, GestureTracker, Release};
use crate::motion::{Motion, Snap, Spring};
use crate::presentation::{Presentation, PresentationStyle};
use crate::profile::{Profile, ProfileSet};

/// Frame step used when a resolution is settled without a host clock.
pub const SETTLE_STEP: Duration = Duration::from_millis(16);

/// Upper bound on frames [`SwipeDeck::settle`] will run (10 simulated minutes).
const MAX_SETTLE_FRAMES: usize = 37_500;

/// Externally visible gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// At rest, waiting for a drag.
    Idle,
    /// Following the pointer.
    Dragging,
    /// Animating toward the release target.
    Resolving { outcome: GestureOutcome },
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Dragging => write!(f, "dragging"),
            Phase::Resolving { outcome } => write!(f, "resolving ({})", outcome.as_str()),
        }
    }
}

/// Reported once when a resolution completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum DeckEvent {
    /// The card left the stack and the cursor moved on.
    Dismissed { id: u32, outcome: GestureOutcome },
    /// The card returned to rest.
    Restored { id: u32 },
}

/// The ids to draw this frame: `{cursor, cursor + 1} ∩ ids`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RenderSet {
    pub active: Option<u32>,
    pub next: Option<u32>,
}

impl RenderSet {
    /// Ids in paint order: the next card first, the active card on top.
    pub fn paint_order(&self) -> impl Iterator<Item = u32> {
        self.next.into_iter().chain(self.active)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.active == Some(id) || self.next == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.next.is_none()
    }
}

/// Per-session gesture counts. Held in memory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SwipeStats {
    pub accepted: u32,
    pub rejected: u32,
    pub cancelled: u32,
}

impl SwipeStats {
    fn record(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::Accept => self.accepted += 1,
            GestureOutcome::Reject => self.rejected += 1,
            GestureOutcome::Cancel => self.cancelled += 1,
        }
    }
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DeckFrame<'a> {
    pub cursor: u32,
    pub phase: Phase,
    pub active: Option<&'a Profile>,
    pub next: Option<&'a Profile>,
    pub offset: Vec2,
    pub presentation: Presentation,
}

#[derive(Debug)]
enum State {
    Idle,
    Dragging,
    Resolving {
        outcome: GestureOutcome,
        motion: Box<dyn Motion>,
    },
}

/// The swipeable card stack.
#[derive(Debug)]
pub struct SwipeDeck {
    profiles: ProfileSet,
    cursor: u32,
    offset: Vec2,
    tracker: GestureTracker,
    state: State,
    viewport: Viewport,
    gesture: GestureConfig,
    style: PresentationStyle,
    motion: MotionConfig,
    stats: SwipeStats,
}

impl SwipeDeck {
    /// Create a deck over `profiles` with default gesture, style and motion.
    pub fn new(profiles: ProfileSet, viewport: Viewport) -> Self {
        let gesture = GestureConfig::default();
        Self {
            cursor: profiles.first_id(),
            profiles,
            offset: Vec2::ZERO,
            tracker: GestureTracker::new(gesture.threshold),
            state: State::Idle,
            viewport,
            gesture,
            style: PresentationStyle::default(),
            motion: MotionConfig::default(),
            stats: SwipeStats::default(),
        }
    }

    /// Create a deck from configuration.
    pub fn from_config(config: &DeckConfig, viewport: Viewport) -> Result<Self> {
        Ok(Self::new(config.profile_set()?, viewport)
            .with_gesture(config.gesture)
            .with_style(config.presentation)
            .with_motion(config.motion))
    }

    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.tracker = GestureTracker::new(gesture.threshold);
        self.gesture = gesture;
        self
    }

    pub fn with_style(mut self, style: PresentationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// Id of the active card; past the last id once the stack is exhausted.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Live offset of the active card.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stats(&self) -> SwipeStats {
        self.stats
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Idle => Phase::Idle,
            State::Dragging => Phase::Dragging,
            State::Resolving { outcome, .. } => Phase::Resolving { outcome: *outcome },
        }
    }

    /// Whether a resolution animation is in flight.
    pub fn is_animating(&self) -> bool {
        matches!(self.state, State::Resolving { .. })
    }

    /// Whether every card has been dismissed.
    pub fn is_exhausted(&self) -> bool {
        self.profiles.get(self.cursor).is_none()
    }

    /// Update viewport geometry. An in-flight resolution keeps its target.
    pub fn resize(&mut self, viewport: Viewport) {
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
    }

    pub fn render_set(&self) -> RenderSet {
        RenderSet {
            active: self.profiles.get(self.cursor).map(|p| p.id),
            next: self
                .cursor
                .checked_add(1)
                .and_then(|id| self.profiles.get(id))
                .map(|p| p.id),
        }
    }

    /// Derived presentation for the current (possibly in-flight) offset.
    pub fn presentation(&self) -> Presentation {
        Presentation::derive(self.offset, &self.viewport, &self.style)
    }

    /// Snapshot for rendering.
    pub fn frame(&self) -> DeckFrame<'_> {
        let set = self.render_set();
        DeckFrame {
            cursor: self.cursor,
            phase: self.phase(),
            active: set.active.and_then(|id| self.profiles.get(id)),
            next: set.next.and_then(|id| self.profiles.get(id)),
            offset: self.offset,
            presentation: self.presentation(),
        }
    }

    /// Begin dragging the active card. Ignored unless idle with a card.
    pub fn on_drag_start(&mut self) -> bool {
        if !matches!(self.state, State::Idle) {
            debug!(phase = %self.phase(), "drag start ignored");
            return false;
        }
        if self.is_exhausted() {
            debug!(cursor = self.cursor, "drag start ignored: stack exhausted");
            return false;
        }
        if !self.tracker.on_drag_start() {
            return false;
        }
        self.offset = Vec2::ZERO;
        self.state = State::Dragging;
        debug!(id = self.cursor, "drag started");
        true
    }

    /// Follow the pointer. `(dx, dy)` is cumulative since drag start.
    pub fn on_drag_move(&mut self, dx: f64, dy: f64) -> bool {
        if !matches!(self.state, State::Dragging) {
            return false;
        }
        match self.tracker.on_drag_move(dx, dy) {
            Some(offset) => {
                self.offset = offset;
                true
            }
            None => false,
        }
    }

    /// Release the card and start resolving toward the outcome's target.
    pub fn on_drag_end(&mut self, dx: f64, dy: f64) -> Option<Release> {
        if !matches!(self.state, State::Dragging) {
            debug!(phase = %self.phase(), "drag end ignored");
            return None;
        }
        let release = self.tracker.on_drag_end(dx, dy)?;
        self.offset = release.offset;

        let target = self.release_target(&release);
        let spring = if release.outcome.dismisses() {
            self.motion.dismiss
        } else {
            self.motion.cancel
        };
        let motion: Box<dyn Motion> = if self.motion.animate {
            Box::new(Spring::new(self.offset, target, spring))
        } else {
            Box::new(Snap::new(self.offset, target))
        };

        debug!(
            id = self.cursor,
            outcome = ?release.outcome,
            dx,
            dy,
            target_x = target.x,
            target_y = target.y,
            "released"
        );
        self.state = State::Resolving {
            outcome: release.outcome,
            motion,
        };
        Some(release)
    }

    /// Where the active card animates to after `release`.
    pub fn release_target(&self, release: &Release) -> Vec2 {
        match release.outcome {
            GestureOutcome::Cancel => Vec2::ZERO,
            outcome => Vec2::new(
                outcome.direction() * self.viewport.exit_distance(self.gesture.exit_margin),
                release.offset.y,
            ),
        }
    }

    /// Target of the in-flight resolution, if any.
    pub fn animation_target(&self) -> Option<Vec2> {
        match &self.state {
            State::Resolving { motion, .. } => Some(motion.target()),
            _ => None,
        }
    }

    /// Swipe the active card without a pointer: a drag just past the
    /// threshold in the outcome's direction, then release.
    pub fn swipe(&mut self, outcome: GestureOutcome) -> Option<Release> {
        if !outcome.dismisses() || !self.on_drag_start() {
            return None;
        }
        let dx = outcome.direction() * (self.gesture.threshold + 1.0);
        self.on_drag_move(dx, 0.0);
        self.on_drag_end(dx, 0.0)
    }

    /// Advance the in-flight resolution by one host frame. Returns the
    /// completion event on the frame the motion settles.
    pub fn tick(&mut self, dt: Duration) -> Option<DeckEvent> {
        let State::Resolving { outcome, motion } = &mut self.state else {
            return None;
        };
        self.offset = motion.advance(dt);
        if !motion.is_settled() {
            return None;
        }
        let outcome = *outcome;
        Some(self.complete(outcome))
    }

    /// Run the in-flight resolution to completion with fixed frame steps.
    pub fn settle(&mut self) -> Option<DeckEvent> {
        if !self.is_animating() {
            return None;
        }
        for _ in 0..MAX_SETTLE_FRAMES {
            if let Some(event) = self.tick(SETTLE_STEP) {
                return Some(event);
            }
        }
        warn!(phase = %self.phase(), "motion did not settle");
        None
    }

    fn complete(&mut self, outcome: GestureOutcome) -> DeckEvent {
        self.state = State::Idle;
        let id = self.cursor;
        self.stats.record(outcome);
        self.tracker.reset();
        self.offset = Vec2::ZERO;

        if outcome.dismisses() {
            // ProfileSet keeps the last id below u32::MAX.
            self.cursor += 1;
            info!(id, ?outcome, cursor = self.cursor, "card dismissed");
            if self.is_exhausted() {
                info!(
                    accepted = self.stats.accepted,
                    rejected = self.stats.rejected,
                    "no more profiles"
                );
            }
            DeckEvent::Dismissed { id, outcome }
        } else {
            debug!(id, "card restored");
            DeckEvent::Restored { id }
        }
    }
}
