//! Drawing confetti batches into a ratatui buffer.

use std::f32::consts::FRAC_PI_4;

use confetti_core::Point;
use confetti_render::{AtlasBatch, AtlasSurface};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};

use crate::chars::{EDGE_ON, FULL, THIN};

/// Virtual pixels covered by one terminal cell.
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

/// Scale below which a flake is drawn as a dot.
const EDGE_ON_SCALE: f32 = 0.2;
/// Scale below which a flake is drawn as a line.
const THIN_SCALE: f32 = 0.6;

/// Size in virtual pixels of a terminal area.
pub fn viewport(area: Rect) -> (f32, f32) {
    (
        f32::from(area.width) * CELL_WIDTH,
        f32::from(area.height) * CELL_HEIGHT,
    )
}

/// Pick a glyph for a flake with the given scale and in-plane rotation.
/// `None` when the flake is turned fully sideways.
pub fn glyph(scale: f32, rotation: f32) -> Option<char> {
    if scale <= f32::EPSILON {
        return None;
    }
    if scale < EDGE_ON_SCALE {
        return Some(EDGE_ON);
    }
    // A rectangle looks the same after half a turn, so four buckets of 45°
    // cover every orientation.
    let orientation = ((rotation / FRAC_PI_4).round() as i64).rem_euclid(4) as usize;
    if scale < THIN_SCALE {
        Some(THIN[orientation])
    } else {
        Some(FULL[orientation])
    }
}

/// [`AtlasSurface`] writing one glyph per flake into a terminal area.
///
/// Each flake lands in the cell containing its transformed center; later
/// flakes overwrite earlier ones.
#[derive(Debug)]
pub struct ConfettiLayer<'a> {
    buffer: &'a mut Buffer,
    area: Rect,
}

impl<'a> ConfettiLayer<'a> {
    pub fn new(buffer: &'a mut Buffer, area: Rect) -> Self {
        Self { buffer, area }
    }

    fn cell_at(&self, point: Point) -> Option<Position> {
        if !(point.x >= 0.0 && point.y >= 0.0) {
            return None;
        }
        let column = (point.x / CELL_WIDTH) as u16;
        let row = (point.y / CELL_HEIGHT) as u16;
        if column >= self.area.width || row >= self.area.height {
            return None;
        }
        Some(Position::new(self.area.x + column, self.area.y + row))
    }
}

impl AtlasSurface for ConfettiLayer<'_> {
    fn draw_atlas(&mut self, batch: &AtlasBatch<'_>) {
        if batch.opacity <= 0.0 {
            return;
        }
        let anchor = batch.flake_size.center();

        for i in 0..batch.len() {
            let transform = &batch.transforms[i];
            let Some(position) = self.cell_at(transform.apply(anchor)) else {
                continue;
            };
            let Some(symbol) = glyph(transform.scale(), transform.rotation()) else {
                continue;
            };

            let color = batch.colors[i].dimmed(batch.opacity);
            if let Some(cell) = self.buffer.cell_mut(position) {
                cell.set_char(symbol)
                    .set_fg(Color::Rgb(color.r, color.g, color.b));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use confetti_core::{FlakeSize, Rect as SpriteRect, Rgb};
    use confetti_render::RsxForm;

    use super::*;

    const FLAKE: FlakeSize = FlakeSize {
        width: 6.0,
        height: 12.0,
    };

    fn draw(transforms: &[RsxForm], opacity: f32) -> Buffer {
        let sprites = vec![SpriteRect::new(0.0, 0.0, 6.0, 12.0); transforms.len()];
        let colors = vec![Rgb::new(200, 100, 50); transforms.len()];
        let batch = AtlasBatch {
            sprites: &sprites,
            transforms,
            colors: &colors,
            flake_size: FLAKE,
            opacity,
        };

        let area = Rect::new(0, 0, 10, 5);
        let mut buffer = Buffer::empty(area);
        ConfettiLayer::new(&mut buffer, area).draw_atlas(&batch);
        buffer
    }

    fn at(rotation: f32, scale: f32, x: f32, y: f32) -> RsxForm {
        RsxForm::around(rotation, scale, FLAKE.center(), Point::new(x, y))
    }

    fn symbol(buffer: &Buffer, x: u16, y: u16) -> &str {
        buffer[(x, y)].symbol()
    }

    #[test]
    fn test_glyph_by_scale_and_rotation() {
        assert_eq!(glyph(0.0, 0.0), None);
        assert_eq!(glyph(0.1, 0.0), Some(EDGE_ON));
        assert_eq!(glyph(0.4, 0.0), Some('│'));
        assert_eq!(glyph(0.4, FRAC_PI_2), Some('─'));
        assert_eq!(glyph(1.0, 0.0), Some('▮'));
        assert_eq!(glyph(1.0, -FRAC_PI_2), Some('▬'));
        // Half a turn looks the same.
        assert_eq!(glyph(1.0, std::f32::consts::PI), Some('▮'));
    }

    #[test]
    fn test_flake_lands_in_its_cell() {
        let buffer = draw(&[at(0.0, 1.0, 20.0, 40.0)], 1.0);
        assert_eq!(symbol(&buffer, 2, 2), "▮");
        assert_eq!(buffer[(2, 2)].fg, Color::Rgb(200, 100, 50));
        assert_eq!(symbol(&buffer, 0, 0), " ");
    }

    #[test]
    fn test_offscreen_flakes_are_skipped() {
        let buffer = draw(
            &[
                at(0.0, 1.0, -5.0, 10.0),
                at(0.0, 1.0, 10.0, -200.0),
                at(0.0, 1.0, 500.0, 10.0),
            ],
            1.0,
        );
        assert!(buffer.content().iter().all(|cell| cell.symbol() == " "));
    }

    #[test]
    fn test_opacity_dims_color() {
        let buffer = draw(&[at(0.0, 1.0, 4.0, 4.0)], 0.5);
        assert_eq!(buffer[(0, 0)].fg, Color::Rgb(100, 50, 25));

        let hidden = draw(&[at(0.0, 1.0, 4.0, 4.0)], 0.0);
        assert_eq!(symbol(&hidden, 0, 0), " ");
    }

    #[test]
    fn test_viewport_in_virtual_pixels() {
        assert_eq!(viewport(Rect::new(0, 0, 80, 24)), (640.0, 384.0));
    }
}
