//! swipedeck - a swipeable card stack for the terminal.
//!
//! Profiles are dealt as a stack of cards. Dragging the top card past a
//! horizontal threshold and releasing accepts ("LIKE") or rejects ("NOPE")
//! it; shorter drags spring back. The library holds the gesture state
//! machine and derived presentation, independent of any front end; the
//! `ui` module draws it with ratatui, and `script` replays recorded
//! gestures headlessly.

pub mod config;
pub mod deck;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod motion;
pub mod presentation;
pub mod profile;
pub mod script;
pub mod ui;

pub use config::DeckConfig;
pub use deck::{DeckEvent, Phase, RenderSet, SwipeDeck};
pub use error::{DeckError, Result};
pub use geometry::{Vec2, Viewport};
pub use gesture::{GestureOutcome, GestureTracker};
pub use presentation::Presentation;
pub use profile::{Profile, ProfileSet};
