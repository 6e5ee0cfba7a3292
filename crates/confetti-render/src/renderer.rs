//! Per-frame glue between the transform engine and a surface.

use confetti_core::{ConfettiOptions, Rect};
use tracing::debug;

use crate::atlas::{AtlasBatch, AtlasSurface};
use crate::flakes::FlakeParams;
use crate::layout::Layout;
use crate::transform::{TransformBuffer, TransformEngine};

/// Owns the sprite atlas layout and the reusable transform buffer for one
/// confetti instance.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: ConfettiOptions,
    engine: TransformEngine,
    sprites: Vec<Rect>,
    buffer: TransformBuffer,
    viewport: (f32, f32),
}

impl Renderer {
    pub fn new(options: &ConfettiOptions, viewport_width: f32, viewport_height: f32) -> Self {
        let layout = Layout::from_options(options, viewport_width, viewport_height);
        let sprites = (0..layout.count()).map(|i| layout.sprite(i)).collect();
        Self {
            options: options.clone(),
            engine: TransformEngine::new(layout, options),
            sprites,
            buffer: TransformBuffer::with_capacity(options.count),
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    /// Rebuild the grid when the host viewport changes size.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if self.viewport == (viewport_width, viewport_height) {
            return;
        }
        debug!(viewport_width, viewport_height, "viewport resized");
        *self = Self::new(&self.options, viewport_width, viewport_height);
    }

    /// Compute this frame's transforms and submit them as a single batch.
    pub fn draw<S: AtlasSurface + ?Sized>(
        &mut self,
        progress: f32,
        flakes: &[FlakeParams],
        surface: &mut S,
    ) {
        self.engine.fill(progress, flakes, &mut self.buffer);
        let batch = AtlasBatch {
            sprites: &self.sprites[..self.buffer.len()],
            transforms: self.buffer.transforms(),
            colors: self.buffer.colors(),
            flake_size: self.engine.layout().flake_size(),
            opacity: self.engine.opacity(progress),
        };
        surface.draw_atlas(&batch);
    }
}
