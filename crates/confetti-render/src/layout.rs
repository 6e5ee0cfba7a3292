//! Deterministic grid placement of flakes.

use confetti_core::{ConfettiOptions, FlakeSize, Point, RANDOM_INITIAL_Y_JIGGLE, Rect};

/// Virtual grid every flake is assigned to by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Flake count the grid was sized for.
    count: usize,
    /// Number of grid columns (at least one).
    columns: usize,
    /// Number of grid rows.
    rows: usize,
    flake: FlakeSize,
    /// Flake height plus vertical spacing.
    row_height: f32,
    /// Shift applied to every resting position so the grid starts above the
    /// visible area.
    vertical_offset: f32,
    container_width: f32,
    container_height: f32,
}

impl Layout {
    pub fn new(
        count: usize,
        flake: FlakeSize,
        container_width: f32,
        container_height: f32,
        vertical_spacing: f32,
        has_cannons: bool,
    ) -> Self {
        let columns = if flake.width > 0.0 {
            ((container_width / flake.width).floor() as usize).max(1)
        } else {
            1
        };
        let rows = count.div_ceil(columns);
        let row_height = flake.height + vertical_spacing;

        // With cannons only a fifth of the grid sits above the screen: flakes
        // are blasted into place rather than falling in from far away.
        let lift = if has_cannons { 0.2 } else { 1.0 };
        let vertical_offset =
            -(rows as f32) * row_height * lift + vertical_spacing - RANDOM_INITIAL_Y_JIGGLE;

        Self {
            count,
            columns,
            rows,
            flake,
            row_height,
            vertical_offset,
            container_width,
            container_height,
        }
    }

    /// Build the grid for `options` inside the given viewport.
    pub fn from_options(options: &ConfettiOptions, viewport_width: f32, viewport_height: f32) -> Self {
        let (width, height) = options.container_size(viewport_width, viewport_height);
        Self::new(
            options.count,
            options.flake_size,
            width,
            height,
            options.vertical_spacing,
            options.has_cannons(),
        )
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flake_size(&self) -> FlakeSize {
        self.flake
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn container_height(&self) -> f32 {
        self.container_height
    }

    /// Top-left corner of flake `index` in the grid.
    pub fn position(&self, index: usize) -> Point {
        let x = (index % self.columns) as f32 * self.flake.width;
        let y = (index / self.columns) as f32 * self.row_height;
        Point::new(x, y)
    }

    /// Region of flake `index` inside the atlas texture.
    pub fn sprite(&self, index: usize) -> Rect {
        let Point { x, y } = self.position(index);
        Rect::new(x, y, self.flake.width, self.flake.height)
    }

    /// Size of the atlas texture holding every flake's sprite.
    pub fn texture_size(&self) -> (f32, f32) {
        (
            self.columns as f32 * self.flake.width,
            self.rows as f32 * self.row_height,
        )
    }

    /// Vertical distance a flake with speed multiplier 1.0 travels during the
    /// fall phase: from its lifted start to half a screen below the bottom.
    pub fn fall_distance(&self) -> f32 {
        -self.vertical_offset + self.container_height * 1.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize, has_cannons: bool) -> Layout {
        Layout::new(
            count,
            FlakeSize::new(6.0, 12.0),
            390.0,
            844.0,
            30.0,
            has_cannons,
        )
    }

    #[test]
    fn test_grid_dimensions() {
        let layout = grid(200, false);
        assert_eq!(layout.columns(), 65);
        assert_eq!(layout.rows(), 4);
        assert_eq!(layout.row_height(), 42.0);
        assert_eq!(layout.texture_size(), (390.0, 168.0));
    }

    #[test]
    fn test_positions_are_index_driven() {
        let layout = grid(200, false);
        assert_eq!(layout.position(0), Point::new(0.0, 0.0));
        assert_eq!(layout.position(1), Point::new(6.0, 0.0));
        assert_eq!(layout.position(65), Point::new(0.0, 42.0));
        assert_eq!(layout.position(131), Point::new(6.0, 84.0));
        assert_eq!(layout.sprite(66), Rect::new(6.0, 42.0, 6.0, 12.0));
    }

    #[test]
    fn test_vertical_offset_lifts_grid() {
        // -4 rows * 42 + 30 - 20
        assert_eq!(grid(200, false).vertical_offset(), -158.0);
        // With cannons only a fifth of the grid is lifted.
        let lifted = grid(200, true).vertical_offset();
        assert!((lifted - (-4.0 * 42.0 * 0.2 + 10.0)).abs() < 1e-4);
    }

    #[test]
    fn test_fall_distance() {
        let layout = grid(200, false);
        assert_eq!(layout.fall_distance(), 158.0 + 844.0 * 1.5);
    }

    #[test]
    fn test_narrow_container_keeps_one_column() {
        let layout = Layout::new(3, FlakeSize::new(6.0, 12.0), 2.0, 100.0, 0.0, false);
        assert_eq!(layout.columns(), 1);
        assert_eq!(layout.rows(), 3);
        assert_eq!(layout.position(2), Point::new(0.0, 24.0));
    }

    #[test]
    fn test_empty_grid() {
        let layout = grid(0, false);
        assert_eq!(layout.rows(), 0);
        assert_eq!(layout.texture_size().1, 0.0);
    }

    #[test]
    fn test_from_options_uses_viewport_fallback() {
        let options = ConfettiOptions {
            height: Some(500.0),
            ..Default::default()
        };
        let layout = Layout::from_options(&options, 390.0, 844.0);
        assert_eq!(layout.container_width(), 390.0);
        assert_eq!(layout.container_height(), 500.0);
    }
}
