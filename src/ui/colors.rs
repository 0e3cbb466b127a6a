//! 24-bit RGB color theme for terminal output.
//!
//! Defines the palette shared by the interactive deck and the headless
//! transcripts.

use owo_colors::Rgb;
use ratatui::style::Color;

/// 24-bit RGB color theme.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// "LIKE" stamp and accepted outcomes - green (34, 197, 94)
    pub accept: Rgb,
    /// "NOPE" stamp and rejected outcomes - red (239, 68, 68)
    pub reject: Rgb,
    /// Cancelled gestures - yellow (234, 179, 8)
    pub cancel: Rgb,
    /// Muted/secondary text and card borders - gray (107, 114, 128)
    pub muted: Rgb,
    /// Profile ids and headings - cyan (34, 211, 238)
    pub highlight: Rgb,
    /// Screen background the cards fade into - near black (17, 24, 39)
    pub background: Rgb,
    /// Card face behind missing images - slate (55, 65, 81)
    pub card: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accept: Rgb(34, 197, 94),
            reject: Rgb(239, 68, 68),
            cancel: Rgb(234, 179, 8),
            muted: Rgb(107, 114, 128),
            highlight: Rgb(34, 211, 238),
            background: Rgb(17, 24, 39),
            card: Rgb(55, 65, 81),
        }
    }
}

impl Theme {
    /// Create a new theme with default colors.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Convert a theme color for ratatui.
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Linear blend from `from` (t = 0) to `to` (t = 1).
pub fn blend(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| -> u8 {
        let (a, b) = (a as f64, b as f64);
        (a + (b - a) * t).round() as u8
    };
    Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let black = Rgb(0, 0, 0);
        let white = Rgb(255, 255, 255);
        assert_eq!(blend(black, white, 0.0), black);
        assert_eq!(blend(black, white, 1.0), white);
        assert_eq!(blend(black, white, 0.5), Rgb(128, 128, 128));
        assert_eq!(blend(black, white, 7.0), white);
    }

    #[test]
    fn test_to_color() {
        let theme = Theme::new();
        assert_eq!(to_color(theme.accept), Color::Rgb(34, 197, 94));
    }
}
