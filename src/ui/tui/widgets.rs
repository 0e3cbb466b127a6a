//! Ratatui widgets for the card stack.
//!
//! Cards are composed once into a [`CardRaster`] at rest and then drawn
//! through a [`CardTransform`] by inverse mapping: every destination cell
//! asks which raster cell lands on it after translation, rotation and
//! scaling. Rotation happens in reference units so non-square cells do not
//! skew the card.

use owo_colors::Rgb;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::deck::{DeckFrame, SwipeStats};
use crate::geometry::Vec2;
use crate::profile::Profile;
use crate::ui::card_image::{CellImage, HALF_BLOCK};
use crate::ui::colors::{blend, to_color, Theme};

/// One cell of a composed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub symbol: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Pixel {
    fn solid(color: Rgb) -> Self {
        Self {
            symbol: ' ',
            fg: color,
            bg: color,
        }
    }

    /// Fade toward `background` as opacity drops to 0.
    fn faded(self, background: Rgb, opacity: f64) -> Self {
        Self {
            symbol: self.symbol,
            fg: blend(background, self.fg, opacity),
            bg: blend(background, self.bg, opacity),
        }
    }
}

/// Opacity of each outcome stamp on the active card.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stamps {
    pub accept: f64,
    pub reject: f64,
}

/// A card composed at rest: border, picture, caption and stamps.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRaster {
    width: u16,
    height: u16,
    cells: Vec<Pixel>,
}

const ROUNDED: [char; 6] = ['╭', '╮', '╰', '╯', '─', '│'];

impl CardRaster {
    /// Compose a card of `width` x `height` cells. `image` should be sized
    /// to the card interior (two cells smaller in each direction).
    pub fn compose(
        profile: &Profile,
        image: Option<&CellImage>,
        width: u16,
        height: u16,
        stamps: Stamps,
        theme: &Theme,
    ) -> Self {
        let mut raster = Self {
            width,
            height,
            cells: vec![Pixel::solid(theme.card); width as usize * height as usize],
        };
        if width < 2 || height < 2 {
            return raster;
        }

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let pixel = match image.and_then(|img| img.get(x - 1, y - 1)) {
                    Some(cell) => Pixel {
                        symbol: HALF_BLOCK,
                        fg: cell.top,
                        bg: cell.bottom,
                    },
                    None => Pixel::solid(theme.card),
                };
                raster.set(x, y, pixel);
            }
        }

        if image.is_none() {
            raster.put_text_centered(height / 2, "?", theme.muted, None);
        }

        raster.draw_border(theme.muted, theme.background);
        let caption = format!(" {} ", profile.label());
        raster.put_text_centered(height - 2, &caption, Rgb(255, 255, 255), Some(theme.background));

        // LIKE sits top-left, NOPE top-right, as on the physical stamps.
        if stamps.accept > 0.0 {
            raster.draw_stamp("LIKE", 2, 2, theme.accept, stamps.accept);
        }
        if stamps.reject > 0.0 {
            let x = width.saturating_sub(2 + 6);
            raster.draw_stamp("NOPE", x, 2, theme.reject, stamps.reject);
        }

        raster
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    fn set(&mut self, x: u16, y: u16, pixel: Pixel) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = pixel;
        }
    }

    fn draw_border(&mut self, color: Rgb, outside: Rgb) {
        let (w, h) = (self.width - 1, self.height - 1);
        let glyph = |symbol| Pixel {
            symbol,
            fg: color,
            bg: outside,
        };
        for x in 1..w {
            self.set(x, 0, glyph(ROUNDED[4]));
            self.set(x, h, glyph(ROUNDED[4]));
        }
        for y in 1..h {
            self.set(0, y, glyph(ROUNDED[5]));
            self.set(w, y, glyph(ROUNDED[5]));
        }
        self.set(0, 0, glyph(ROUNDED[0]));
        self.set(w, 0, glyph(ROUNDED[1]));
        self.set(0, h, glyph(ROUNDED[2]));
        self.set(w, h, glyph(ROUNDED[3]));
    }

    fn put_text_centered(&mut self, y: u16, text: &str, fg: Rgb, bg: Option<Rgb>) {
        let len = text.chars().count() as u16;
        let x0 = self.width.saturating_sub(len) / 2;
        self.put_text(x0, y, text, fg, bg, 1.0);
    }

    /// Write `text` over the existing cells. With no explicit background the
    /// glyphs sit on the average color of what they cover.
    fn put_text(&mut self, x0: u16, y: u16, text: &str, fg: Rgb, bg: Option<Rgb>, opacity: f64) {
        for (i, symbol) in text.chars().enumerate() {
            let x = x0.saturating_add(i as u16);
            // Keep the border intact.
            if x == 0 || x + 1 >= self.width || y == 0 || y + 1 >= self.height {
                continue;
            }
            let Some(under) = self.get(x, y) else {
                continue;
            };
            let base = bg.unwrap_or_else(|| underlying_color(under));
            let bg = blend(underlying_color(under), base, opacity);
            self.set(
                x,
                y,
                Pixel {
                    symbol,
                    fg: blend(bg, fg, opacity),
                    bg,
                },
            );
        }
    }

    /// A boxed word such as `┃LIKE┃`, three rows tall.
    fn draw_stamp(&mut self, word: &str, x: u16, y: u16, color: Rgb, opacity: f64) {
        let inner = word.chars().count();
        let top = format!("┏{}┓", "━".repeat(inner));
        let middle = format!("┃{}┃", word);
        let bottom = format!("┗{}┛", "━".repeat(inner));
        for (row, text) in [top, middle, bottom].iter().enumerate() {
            self.put_text(x, y + row as u16, text, color, None, opacity);
        }
    }
}

fn underlying_color(pixel: Pixel) -> Rgb {
    if pixel.symbol == HALF_BLOCK {
        crate::ui::card_image::HalfCell {
            top: pixel.fg,
            bottom: pixel.bg,
        }
        .average()
    } else {
        pixel.bg
    }
}

/// Placement of a card relative to the centre of the area it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    /// Translation in reference units.
    pub translation: Vec2,
    /// Clockwise rotation in degrees.
    pub rotation_deg: f64,
    /// Uniform scale about the card centre.
    pub scale: f64,
    /// 0 is fully faded into the background, 1 is opaque.
    pub opacity: f64,
    /// Reference units per column.
    pub units_per_column: f64,
    /// Reference units per row.
    pub units_per_row: f64,
}

impl CardTransform {
    /// A card at rest.
    pub fn identity(units_per_column: f64, units_per_row: f64) -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
            units_per_column,
            units_per_row,
        }
    }

    /// Map a destination cell centre (offset from the area centre, in
    /// cells) to a raster-space offset from the card centre, in cells.
    fn inverse(&self, col: f64, row: f64) -> Option<(f64, f64)> {
        if self.scale <= 0.0 {
            return None;
        }
        let x = col * self.units_per_column - self.translation.x;
        let y = row * self.units_per_row - self.translation.y;
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        let ux = (x * cos + y * sin) / self.scale;
        let uy = (-x * sin + y * cos) / self.scale;
        Some((ux / self.units_per_column, uy / self.units_per_row))
    }
}

/// Draws a [`CardRaster`] centred in its area through a transform. Cells the
/// card does not cover are left untouched, so cards stack.
pub struct CardWidget<'a> {
    raster: &'a CardRaster,
    transform: CardTransform,
    background: Rgb,
}

impl<'a> CardWidget<'a> {
    pub fn new(raster: &'a CardRaster, transform: CardTransform, background: Rgb) -> Self {
        Self {
            raster,
            transform,
            background,
        }
    }
}

impl Widget for CardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.transform.opacity <= 0.0 || area.width == 0 || area.height == 0 {
            return;
        }
        let center_x = area.x as f64 + area.width as f64 / 2.0;
        let center_y = area.y as f64 + area.height as f64 / 2.0;
        let half_w = self.raster.width() as f64 / 2.0;
        let half_h = self.raster.height() as f64 / 2.0;

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let col = x as f64 + 0.5 - center_x;
                let row = y as f64 + 0.5 - center_y;
                let Some((ux, uy)) = self.transform.inverse(col, row) else {
                    return;
                };
                let (rx, ry) = ((ux + half_w).floor(), (uy + half_h).floor());
                if rx < 0.0 || ry < 0.0 {
                    continue;
                }
                let Some(pixel) = self.raster.get(rx as u16, ry as u16) else {
                    continue;
                };
                let pixel = pixel.faded(self.background, self.transform.opacity);
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(pixel.symbol)
                        .set_fg(to_color(pixel.fg))
                        .set_bg(to_color(pixel.bg));
                }
            }
        }
    }
}

/// Fills an area with the theme background.
pub struct BackdropWidget {
    color: Rgb,
}

impl BackdropWidget {
    pub fn new(color: Rgb) -> Self {
        Self { color }
    }
}

impl Widget for BackdropWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(to_color(self.color)));
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(' ');
                }
            }
        }
    }
}

/// Title and session counters.
pub struct HeaderWidget<'a> {
    frame: &'a DeckFrame<'a>,
    stats: SwipeStats,
    total: usize,
    theme: Theme,
}

impl<'a> HeaderWidget<'a> {
    pub fn new(frame: &'a DeckFrame<'a>, stats: SwipeStats, total: usize, theme: Theme) -> Self {
        Self {
            frame,
            stats,
            total,
            theme,
        }
    }
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let position = match self.frame.active {
            Some(profile) => format!("{} ", profile.label()),
            None => "done ".to_string(),
        };
        let line = Line::from(vec![
            Span::styled(
                " swipedeck ",
                Style::default()
                    .fg(to_color(self.theme.highlight))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(position, Style::default().fg(to_color(self.theme.muted))),
            Span::styled(
                format!("♥ {} ", self.stats.accepted),
                Style::default().fg(to_color(self.theme.accept)),
            ),
            Span::styled(
                format!("✗ {} ", self.stats.rejected),
                Style::default().fg(to_color(self.theme.reject)),
            ),
            Span::styled(
                format!("of {}", self.total),
                Style::default().fg(to_color(self.theme.muted)),
            ),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

/// Key hints.
pub struct FooterWidget {
    theme: Theme,
}

impl FooterWidget {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

impl Widget for FooterWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hint = " drag card with mouse | ← nope | → like | q quit";
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(to_color(self.theme.muted)),
        )))
        .render(area, buf);
    }
}

/// Shown when every card has been dismissed.
pub struct EmptyStackWidget {
    stats: SwipeStats,
    theme: Theme,
}

impl EmptyStackWidget {
    pub fn new(stats: SwipeStats, theme: Theme) -> Self {
        Self { stats, theme }
    }
}

impl Widget for EmptyStackWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let lines = vec![
            Line::from(Span::styled(
                "No more profiles",
                Style::default()
                    .fg(to_color(self.theme.highlight))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "{} liked, {} noped",
                    self.stats.accepted, self.stats.rejected
                ),
                Style::default().fg(to_color(self.theme.muted)),
            )),
        ];
        let top = area.y + area.height.saturating_sub(2) / 2;
        let centered = Rect {
            y: top,
            height: 2.min(area.height),
            ..area
        };
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .render(centered, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn raster(stamps: Stamps) -> CardRaster {
        CardRaster::compose(
            &Profile::new(1, "1.png").with_name("Ada"),
            None,
            20,
            12,
            stamps,
            &Theme::default(),
        )
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn raster_text(raster: &CardRaster) -> String {
        (0..raster.height())
            .map(|y| {
                (0..raster.width())
                    .filter_map(|x| raster.get(x, y).map(|p| p.symbol))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_raster_has_border_and_caption() {
        let raster = raster(Stamps::default());
        assert_eq!(raster.get(0, 0).unwrap().symbol, '╭');
        assert_eq!(raster.get(19, 11).unwrap().symbol, '╯');
        assert!(raster_text(&raster).contains(" Ada "));
        assert!(!raster_text(&raster).contains("LIKE"));
    }

    #[test]
    fn test_stamps_follow_opacity() {
        let liked = raster(Stamps {
            accept: 1.0,
            reject: 0.0,
        });
        let text = raster_text(&liked);
        assert!(text.contains("LIKE"));
        assert!(!text.contains("NOPE"));

        let noped = raster(Stamps {
            accept: 0.0,
            reject: 0.4,
        });
        assert!(raster_text(&noped).contains("NOPE"));
    }

    #[test]
    fn test_full_opacity_stamp_uses_stamp_color() {
        let theme = Theme::default();
        let liked = raster(Stamps {
            accept: 1.0,
            reject: 0.0,
        });
        // 'L' of LIKE: stamp box starts at x=2, text one cell in.
        let letter = liked.get(3, 3).unwrap();
        assert_eq!(letter.symbol, 'L');
        assert_eq!(letter.fg, theme.accept);
    }

    #[test]
    fn test_identity_transform_centers_card() {
        let raster = raster(Stamps::default());
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        CardWidget::new(
            &raster,
            CardTransform::identity(4.0, 8.0),
            Theme::default().background,
        )
        .render(area, &mut buf);

        // Card is 20x12 centred in 40x20: columns 10..30, rows 4..16.
        assert_eq!(buf[(10, 4)].symbol(), "╭");
        assert_eq!(buf[(29, 15)].symbol(), "╯");
        assert_eq!(buf[(9, 4)].symbol(), " ");
        assert!(row_text(&buf, 14).contains("Ada"));
    }

    #[test]
    fn test_translation_moves_card() {
        let raster = raster(Stamps::default());
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        let transform = CardTransform {
            translation: Vec2::new(20.0, 0.0),
            ..CardTransform::identity(4.0, 8.0)
        };
        CardWidget::new(&raster, transform, Theme::default().background).render(area, &mut buf);
        // 20 units / 4 units per column = 5 columns right.
        assert_eq!(buf[(15, 4)].symbol(), "╭");
    }

    #[test]
    fn test_zero_opacity_draws_nothing() {
        let raster = raster(Stamps::default());
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        let transform = CardTransform {
            opacity: 0.0,
            ..CardTransform::identity(4.0, 8.0)
        };
        CardWidget::new(&raster, transform, Theme::default().background).render(area, &mut buf);
        assert!(buf.content().iter().all(|c| c.symbol() == " "));
    }

    #[test]
    fn test_scaled_card_is_smaller() {
        let raster = raster(Stamps::default());
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        let transform = CardTransform {
            scale: 0.5,
            ..CardTransform::identity(4.0, 8.0)
        };
        CardWidget::new(&raster, transform, Theme::default().background).render(area, &mut buf);
        // Corners of the full-size card stay untouched, the centre is card face.
        assert_eq!(buf[(10, 4)].bg, Color::Reset);
        assert_eq!(buf[(12, 5)].bg, Color::Reset);
        assert_eq!(buf[(20, 10)].bg, to_color(Theme::default().card));
    }
}
