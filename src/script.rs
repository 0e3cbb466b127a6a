//! Headless gesture scripts.
//!
//! A script is a JSON array of pointer events fed through the same
//! [`SwipeDeck`] the terminal UI drives:
//!
//! ```json
//! [
//!   {"event": "start"},
//!   {"event": "move", "dx": 150, "dy": 20},
//!   {"event": "end", "dx": 150, "dy": 20},
//!   {"event": "settle"}
//! ]
//! ```
//!
//! Replaying produces a [`Transcript`] of every step.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::deck::{DeckEvent, Phase, RenderSet, SwipeDeck, SwipeStats};
use crate::error::{DeckError, Result};
use crate::geometry::{Vec2, Viewport};
use crate::gesture::{GestureOutcome, Release};

/// Direction of a keyboard-style swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn outcome(self) -> GestureOutcome {
        match self {
            SwipeDirection::Left => GestureOutcome::Reject,
            SwipeDirection::Right => GestureOutcome::Accept,
        }
    }
}

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ScriptEvent {
    Start,
    Move {
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    End {
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    /// Run the current animation to completion.
    Settle,
    /// Advance the current animation by `ms` milliseconds.
    Tick { ms: u64 },
    Swipe { direction: SwipeDirection },
}

impl std::fmt::Display for ScriptEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptEvent::Start => write!(f, "start"),
            ScriptEvent::Move { dx, dy } => write!(f, "move ({}, {})", dx, dy),
            ScriptEvent::End { dx, dy } => write!(f, "end ({}, {})", dx, dy),
            ScriptEvent::Settle => write!(f, "settle"),
            ScriptEvent::Tick { ms } => write!(f, "tick {}ms", ms),
            ScriptEvent::Swipe { direction } => write!(f, "swipe {:?}", direction),
        }
    }
}

/// An ordered list of scripted inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn new(events: Vec<ScriptEvent>) -> Self {
        Self { events }
    }

    pub fn parse(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read a script file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DeckError::InvalidPath(path.display().to_string()));
        }
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// State of the deck after one scripted input.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub index: usize,
    pub event: ScriptEvent,
    /// False when the deck ignored the input.
    pub handled: bool,
    pub phase: Phase,
    pub cursor: u32,
    pub offset: Vec2,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<Release>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<DeckEvent>,
}

/// Result of replaying a script.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub viewport: Viewport,
    pub steps: Vec<Step>,
    pub cursor: u32,
    pub render_set: RenderSet,
    pub stats: SwipeStats,
    pub exhausted: bool,
}

impl Transcript {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Feed `script` through `deck`, recording the state after each input.
pub fn replay(deck: &mut SwipeDeck, script: &Script) -> Transcript {
    let mut steps = Vec::with_capacity(script.len());

    for (index, event) in script.events.iter().copied().enumerate() {
        let mut release = None;
        let mut completed = None;
        let handled = match event {
            ScriptEvent::Start => deck.on_drag_start(),
            ScriptEvent::Move { dx, dy } => deck.on_drag_move(dx, dy),
            ScriptEvent::End { dx, dy } => {
                release = deck.on_drag_end(dx, dy);
                release.is_some()
            }
            ScriptEvent::Settle => {
                let animating = deck.is_animating();
                completed = deck.settle();
                animating
            }
            ScriptEvent::Tick { ms } => {
                let animating = deck.is_animating();
                completed = deck.tick(Duration::from_millis(ms));
                animating
            }
            ScriptEvent::Swipe { direction } => {
                release = deck.swipe(direction.outcome());
                release.is_some()
            }
        };

        if !handled {
            debug!(index, %event, "ignored");
        }

        steps.push(Step {
            index: index + 1,
            event,
            handled,
            phase: deck.phase(),
            cursor: deck.cursor(),
            offset: deck.offset(),
            release,
            target: release.and(deck.animation_target()),
            completed,
        });
    }

    let transcript = Transcript {
        viewport: deck.viewport(),
        steps,
        cursor: deck.cursor(),
        render_set: deck.render_set(),
        stats: deck.stats(),
        exhausted: deck.is_exhausted(),
    };
    info!(
        events = script.len(),
        cursor = transcript.cursor,
        "replay finished"
    );
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileSet;

    fn deck() -> SwipeDeck {
        SwipeDeck::new(ProfileSet::builtin(), Viewport::new(390.0, 844.0))
    }

    #[test]
    fn test_parse_all_event_shapes() {
        let script = Script::parse(
            r#"[
                {"event": "start"},
                {"event": "move", "dx": 10, "dy": -4.5},
                {"event": "end", "dx": 10},
                {"event": "settle"},
                {"event": "tick", "ms": 16},
                {"event": "swipe", "direction": "left"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            script.events,
            vec![
                ScriptEvent::Start,
                ScriptEvent::Move { dx: 10.0, dy: -4.5 },
                ScriptEvent::End { dx: 10.0, dy: 0.0 },
                ScriptEvent::Settle,
                ScriptEvent::Tick { ms: 16 },
                ScriptEvent::Swipe {
                    direction: SwipeDirection::Left
                },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        let result = Script::parse(r#"[{"event": "pinch"}]"#);
        assert!(matches!(result, Err(DeckError::Script(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Script::load(Path::new("/nonexistent/script.json"));
        assert!(matches!(result, Err(DeckError::InvalidPath(_))));
    }

    #[test]
    fn test_replay_accept_drag() {
        let script = Script::new(vec![
            ScriptEvent::Start,
            ScriptEvent::Move { dx: 150.0, dy: 20.0 },
            ScriptEvent::End { dx: 150.0, dy: 20.0 },
            ScriptEvent::Settle,
        ]);
        let mut deck = deck();
        let transcript = replay(&mut deck, &script);

        let end = &transcript.steps[2];
        assert_eq!(end.release.map(|r| r.outcome), Some(GestureOutcome::Accept));
        assert_eq!(end.target, Some(Vec2::new(490.0, 20.0)));

        let settle = &transcript.steps[3];
        assert_eq!(
            settle.completed,
            Some(DeckEvent::Dismissed {
                id: 1,
                outcome: GestureOutcome::Accept
            })
        );
        assert_eq!(transcript.cursor, 2);
        assert_eq!(
            transcript.render_set,
            RenderSet {
                active: Some(2),
                next: Some(3)
            }
        );
    }

    #[test]
    fn test_replay_marks_ignored_events() {
        let script = Script::new(vec![
            ScriptEvent::Move { dx: 40.0, dy: 0.0 },
            ScriptEvent::Settle,
            ScriptEvent::Swipe {
                direction: SwipeDirection::Left,
            },
            ScriptEvent::Start,
            ScriptEvent::Tick { ms: 16 },
        ]);
        let mut deck = deck();
        let transcript = replay(&mut deck, &script);
        let handled: Vec<bool> = transcript.steps.iter().map(|s| s.handled).collect();
        // The swipe starts a resolution, so the following start is ignored.
        assert_eq!(handled, vec![false, false, true, false, true]);
        assert_eq!(transcript.stats.rejected, 0);
    }

    #[test]
    fn test_replay_to_exhaustion() {
        let swipe = ScriptEvent::Swipe {
            direction: SwipeDirection::Right,
        };
        let mut events = Vec::new();
        for _ in 0..5 {
            events.push(swipe);
            events.push(ScriptEvent::Settle);
        }
        let mut deck = deck();
        let transcript = replay(&mut deck, &Script::new(events));
        assert!(transcript.exhausted);
        assert_eq!(transcript.cursor, 5);
        assert!(transcript.render_set.is_empty());
        assert_eq!(transcript.stats.accepted, 4);
        assert!(!transcript.steps[8].handled);
    }

    #[test]
    fn test_transcript_json() {
        let mut deck = deck();
        let transcript = replay(&mut deck, &Script::new(vec![ScriptEvent::Start]));
        let json: serde_json::Value =
            serde_json::from_str(&transcript.to_json().unwrap()).unwrap();
        assert_eq!(json["cursor"], 1);
        assert_eq!(json["steps"][0]["event"]["event"], "start");
        assert_eq!(json["steps"][0]["phase"], "dragging");
        assert_eq!(json["render_set"]["next"], 2);
    }
}
