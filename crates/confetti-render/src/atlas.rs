//! Batch submission to the host rendering surface.

use confetti_core::{FlakeSize, Rect, Rgb};

use crate::transform::RsxForm;

/// One frame's worth of flakes, drawn in a single call.
///
/// `sprites`, `transforms` and `colors` are parallel: entry `i` draws the
/// atlas region `sprites[i]` tinted `colors[i]`, placed by `transforms[i]`.
#[derive(Debug, Clone, Copy)]
pub struct AtlasBatch<'a> {
    pub sprites: &'a [Rect],
    pub transforms: &'a [RsxForm],
    pub colors: &'a [Rgb],
    pub flake_size: FlakeSize,
    /// Global opacity applied to every sprite (0.0-1.0).
    pub opacity: f32,
}

impl AtlasBatch<'_> {
    /// Number of drawable entries.
    pub fn len(&self) -> usize {
        self.sprites
            .len()
            .min(self.transforms.len())
            .min(self.colors.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A rendering surface able to draw many transformed copies of small atlas
/// sprites in one submission.
pub trait AtlasSurface {
    fn draw_atlas(&mut self, batch: &AtlasBatch<'_>);
}
