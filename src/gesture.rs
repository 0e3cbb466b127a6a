//! Gesture tracking: pointer drag samples in, drag offset and release
//! classification out.
//!
//! The tracker only knows three events. Touch vs. mouse, pointer capture
//! and hit-testing belong to whoever feeds it.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::Vec2;

/// Default absolute horizontal release threshold in reference units.
pub const DEFAULT_THRESHOLD: f64 = 120.0;

/// Result of classifying a released drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureOutcome {
    /// Swiped right past the threshold ("LIKE").
    Accept,
    /// Swiped left past the threshold ("NOPE").
    Reject,
    /// Released inside the threshold; the card returns to rest.
    Cancel,
}

impl GestureOutcome {
    /// Whether this outcome removes the card from the stack.
    pub fn dismisses(&self) -> bool {
        !matches!(self, Self::Cancel)
    }

    /// Horizontal exit direction: +1 right, -1 left, 0 for cancel.
    pub fn direction(&self) -> f64 {
        match self {
            Self::Accept => 1.0,
            Self::Reject => -1.0,
            Self::Cancel => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }

    /// Label stamped on the card for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accept => "LIKE",
            Self::Reject => "NOPE",
            Self::Cancel => "",
        }
    }
}

/// A classified release: the outcome plus the offset that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Release {
    pub outcome: GestureOutcome,
    pub offset: Vec2,
}

/// Classify a release by horizontal distance alone. The boundary is
/// exclusive: `dx == threshold` is a cancel.
pub fn classify(dx: f64, threshold: f64) -> GestureOutcome {
    if dx > threshold {
        GestureOutcome::Accept
    } else if dx < -threshold {
        GestureOutcome::Reject
    } else {
        GestureOutcome::Cancel
    }
}

/// Converts a drag into an offset and, on release, an outcome.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    threshold: f64,
    active: bool,
    offset: Vec2,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl GestureTracker {
    /// Create a tracker with the given absolute release threshold.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
            active: false,
            offset: Vec2::ZERO,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Latest offset of the current drag.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Begin tracking. Returns false if a drag is already in progress.
    pub fn on_drag_start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.offset = Vec2::ZERO;
        true
    }

    /// Record the cumulative displacement since drag start. Only the latest
    /// sample matters. Ignored when no drag is active.
    pub fn on_drag_move(&mut self, dx: f64, dy: f64) -> Option<Vec2> {
        if !self.active {
            return None;
        }
        self.offset = Vec2::new(dx, dy);
        trace!(dx, dy, "drag move");
        Some(self.offset)
    }

    /// Finish the drag and classify it. Ignored when no drag is active.
    pub fn on_drag_end(&mut self, dx: f64, dy: f64) -> Option<Release> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.offset = Vec2::new(dx, dy);
        Some(Release {
            outcome: classify(dx, self.threshold),
            offset: self.offset,
        })
    }

    /// Drop any drag state and return to rest.
    pub fn reset(&mut self) {
        self.active = false;
        self.offset = Vec2::ZERO;
    }
}
