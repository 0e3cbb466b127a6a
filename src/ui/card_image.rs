//! Profile pictures for the terminal.
//!
//! Images are looked up among the assets embedded in the binary first, then
//! on the filesystem. They are rendered with upper half blocks: each cell
//! shows two vertically stacked pixels, the top one as foreground and the
//! bottom one as background.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgba};
use owo_colors::Rgb;
use rust_embed::Embed;

use crate::error::{DeckError, Result};

/// Glyph that paints the top half of a cell in the foreground color.
pub const HALF_BLOCK: char = '▀';

/// ANSI reset code
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Embed)]
#[folder = "assets/profiles/"]
#[include = "*.png"]
#[include = "*.jpg"]
#[include = "*.jpeg"]
pub struct ProfileAssets;

/// Names of the images bundled with the binary.
pub fn embedded_images() -> Vec<String> {
    <ProfileAssets as Embed>::iter()
        .map(|s| s.to_string())
        .collect()
}

/// Load a profile picture by embedded asset name or filesystem path.
pub fn load_image(reference: &str) -> Result<DynamicImage> {
    let decode_error = |source| DeckError::Image {
        reference: reference.to_string(),
        source,
    };

    if let Some(file) = <ProfileAssets as Embed>::get(reference) {
        return image::load_from_memory(&file.data).map_err(decode_error);
    }

    let path = Path::new(reference);
    if path.is_file() {
        return image::open(path).map_err(decode_error);
    }

    Err(DeckError::ImageNotFound(reference.to_string()))
}

/// Color rendering mode for ANSI output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Full 24-bit true color
    #[default]
    TrueColor,
    /// 256 color palette
    Color256,
}

fn from_rgba(rgba: Rgba<u8>) -> Rgb {
    Rgb(rgba[0], rgba[1], rgba[2])
}

/// Convert RGB to closest 256-color palette index
fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    // Grayscale ramp (232-255)
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return ((r as u16 - 8) / 10 + 232) as u8;
    }

    // 6x6x6 color cube (16-231)
    let r_idx = (r as u16 * 6 / 256) as u8;
    let g_idx = (g as u16 * 6 / 256) as u8;
    let b_idx = (b as u16 * 6 / 256) as u8;

    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// One terminal cell of a half-block image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfCell {
    pub top: Rgb,
    pub bottom: Rgb,
}

impl HalfCell {
    /// Average of both halves, for glyphs drawn over the image.
    pub fn average(&self) -> Rgb {
        let avg = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Rgb(
            avg(self.top.0, self.bottom.0),
            avg(self.top.1, self.bottom.1),
            avg(self.top.2, self.bottom.2),
        )
    }
}

/// An image resampled to a grid of terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CellImage {
    width: u16,
    height: u16,
    cells: Vec<HalfCell>,
}

impl CellImage {
    /// Resample `img` to `width` x `height` cells, cropping to fill the
    /// grid without distortion.
    pub fn from_image(img: &DynamicImage, width: u16, height: u16) -> Self {
        if width == 0 || height == 0 {
            return Self {
                width: 0,
                height: 0,
                cells: Vec::new(),
            };
        }

        let pixels = img.resize_to_fill(width as u32, height as u32 * 2, FilterType::Triangle);
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as u32 {
            for x in 0..width as u32 {
                cells.push(HalfCell {
                    top: from_rgba(pixels.get_pixel(x, y * 2)),
                    bottom: from_rgba(pixels.get_pixel(x, y * 2 + 1)),
                });
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<HalfCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Render as ANSI text, one line per row.
    pub fn to_ansi(&self, mode: ColorMode) -> String {
        let mut output = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(cell) = self.get(x, y) else {
                    continue;
                };
                let (t, b) = (cell.top, cell.bottom);
                let _ = match mode {
                    ColorMode::TrueColor => write!(
                        output,
                        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m",
                        t.0, t.1, t.2, b.0, b.1, b.2
                    ),
                    ColorMode::Color256 => write!(
                        output,
                        "\x1b[38;5;{}m\x1b[48;5;{}m",
                        rgb_to_256(t.0, t.1, t.2),
                        rgb_to_256(b.0, b.1, b.2)
                    ),
                };
                output.push(HALF_BLOCK);
            }
            output.push_str(ANSI_RESET);
            output.push('\n');
        }
        output
    }
}
