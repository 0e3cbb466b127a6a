//! Ratatui-based interactive deck.
//!
//! Provides:
//! - Mouse drag and keyboard swipes
//! - Spring-animated dismissals and snap-backs
//! - Transformed card widgets with LIKE/NOPE stamps

pub mod app;
pub mod widgets;

pub use app::{run, App, CellMapper, Regions};
pub use widgets::{CardRaster, CardTransform, CardWidget, Stamps};
