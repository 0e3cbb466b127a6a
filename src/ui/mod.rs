//! Terminal UI for the card stack.
//!
//! Colors, profile pictures rendered as half-block cells, and the ratatui
//! front end.

pub mod card_image;
pub mod colors;
pub mod transcript;
pub mod tui;

pub use card_image::{load_image, CellImage, ColorMode};
pub use colors::Theme;
pub use transcript::TranscriptRenderer;
