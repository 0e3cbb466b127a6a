//! Presentation derivation: a pure function from the horizontal drag
//! offset to how the active and next cards look.
//!
//! Every curve is a clamped piecewise-linear map over `[-H, 0, H]` where
//! `H` is half the viewport width.

use serde::{Deserialize, Serialize};

use crate::geometry::{Vec2, Viewport};

/// Clamped piecewise-linear interpolation.
///
/// `input` must be strictly ascending and the same length as `output`.
/// Values below the first breakpoint saturate to the first output, values
/// above the last saturate to the last output.
pub fn interpolate(x: f64, input: &[f64], output: &[f64]) -> f64 {
    debug_assert_eq!(input.len(), output.len());
    let n = input.len().min(output.len());
    if n == 0 {
        return 0.0;
    }
    if x.is_nan() || x <= input[0] {
        return output[0];
    }
    if x >= input[n - 1] {
        return output[n - 1];
    }

    for i in 1..n {
        if x <= input[i] {
            let (x0, x1) = (input[i - 1], input[i]);
            let (y0, y1) = (output[i - 1], output[i]);
            let span = x1 - x0;
            if span <= 0.0 {
                return y1;
            }
            return y0 + (y1 - y0) * (x - x0) / span;
        }
    }
    output[n - 1]
}

/// The extreme values of each presentation curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationStyle {
    /// Rotation at `dx = ±H`, in degrees.
    pub max_rotation_deg: f64,
    /// Scale of the next card while the active card is centred.
    pub next_card_min_scale: f64,
    /// Opacity of the next card while the active card is centred.
    pub next_card_min_opacity: f64,
}

impl Default for PresentationStyle {
    fn default() -> Self {
        Self {
            max_rotation_deg: 10.0,
            next_card_min_scale: 0.8,
            next_card_min_opacity: 0.0,
        }
    }
}

/// Derived presentation values for one offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Presentation {
    /// Active card translation; equals the raw offset.
    pub translation: Vec2,
    /// Active card rotation in degrees, positive is clockwise.
    pub rotation_deg: f64,
    /// Opacity of the "LIKE" stamp.
    pub accept_opacity: f64,
    /// Opacity of the "NOPE" stamp.
    pub reject_opacity: f64,
    /// Opacity of the card underneath.
    pub next_opacity: f64,
    /// Scale of the card underneath.
    pub next_scale: f64,
}

impl Presentation {
    /// Presentation of a card at rest.
    pub fn rest(style: &PresentationStyle) -> Self {
        Self::derive(Vec2::ZERO, &Viewport::default(), style)
    }

    /// Derive every presentation value from the live offset.
    pub fn derive(offset: Vec2, viewport: &Viewport, style: &PresentationStyle) -> Self {
        let h = viewport.half_width();
        let dx = offset.x;

        let (rotation_deg, accept_opacity, reject_opacity, next_opacity, next_scale) = if h > 0.0
        {
            let input = [-h, 0.0, h];
            let r = style.max_rotation_deg;
            (
                interpolate(dx, &input, &[-r, 0.0, r]),
                interpolate(dx, &input, &[0.0, 0.0, 1.0]),
                interpolate(dx, &input, &[1.0, 0.0, 0.0]),
                interpolate(dx, &input, &[1.0, style.next_card_min_opacity, 1.0]),
                interpolate(dx, &input, &[1.0, style.next_card_min_scale, 1.0]),
            )
        } else {
            // Zero-width domain: everything is an endpoint.
            let side = if dx > 0.0 {
                1.0
            } else if dx < 0.0 {
                -1.0
            } else {
                0.0
            };
            let revealed = side != 0.0;
            (
                side * style.max_rotation_deg,
                if side > 0.0 { 1.0 } else { 0.0 },
                if side < 0.0 { 1.0 } else { 0.0 },
                if revealed { 1.0 } else { style.next_card_min_opacity },
                if revealed { 1.0 } else { style.next_card_min_scale },
            )
        };

        Self {
            translation: offset,
            rotation_deg,
            accept_opacity,
            reject_opacity,
            next_opacity,
            next_scale,
        }
    }
}
