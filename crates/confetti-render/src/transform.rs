//! Progress-driven flake transforms.
//!
//! Everything here is a pure function of the current progress value and the
//! flake parameters, so it can be evaluated every frame from whichever thread
//! renders without any cross-frame state.

use confetti_core::{ConfettiOptions, END_PROGRESS, Point, Rgb, interpolate};

use crate::flakes::FlakeParams;
use crate::layout::Layout;

/// Progress keyframes the drift samples are spread across.
const DRIFT_KEYFRAMES: [f32; 5] = [1.0, 1.25, 1.5, 1.75, 2.0];

/// Blast entry ramp: flakes grow in over the first fifth of the blast.
const BLAST_SCALE_INPUT: [f32; 3] = [0.0, 0.2, 1.0];
const BLAST_SCALE_OUTPUT: [f32; 3] = [0.0, 1.0, 1.0];

/// Fade-out window at the tail of the fall phase.
const FADE_INPUT: [f32; 3] = [1.0, 1.9, 2.0];
const FADE_OUTPUT: [f32; 3] = [1.0, 0.0, 0.0];

/// Compact rotation + uniform scale + translation transform.
///
/// Maps a sprite-local point `(u, v)` to
/// `(scos * u - ssin * v + tx, ssin * u + scos * v + ty)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RsxForm {
    pub scos: f32,
    pub ssin: f32,
    pub tx: f32,
    pub ty: f32,
}

impl RsxForm {
    /// Transform that rotates by `rotation` and scales by `scale` around
    /// `anchor` (sprite-local), then places the anchor at `position`.
    pub fn around(rotation: f32, scale: f32, anchor: Point, position: Point) -> Self {
        let scos = rotation.cos() * scale;
        let ssin = rotation.sin() * scale;
        Self {
            scos,
            ssin,
            tx: position.x - scos * anchor.x + ssin * anchor.y,
            ty: position.y - ssin * anchor.x - scos * anchor.y,
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.scos * point.x - self.ssin * point.y + self.tx,
            self.ssin * point.x + self.scos * point.y + self.ty,
        )
    }

    pub fn scale(&self) -> f32 {
        self.scos.hypot(self.ssin)
    }

    /// In-plane rotation in radians; zero when the scale collapses.
    pub fn rotation(&self) -> f32 {
        self.ssin.atan2(self.scos)
    }
}

/// Decomposed transform of a single flake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlakeTransform {
    /// Where the flake's center lands on screen.
    pub position: Point,
    /// In-plane rotation.
    pub rotation_z: f32,
    /// Flip rotation driving the oscillating scale.
    pub rotation_x: f32,
    pub scale: f32,
}

/// Reusable per-frame output storage.
///
/// Cleared and refilled every frame so steady-state rendering does not
/// allocate.
#[derive(Debug, Clone, Default)]
pub struct TransformBuffer {
    transforms: Vec<RsxForm>,
    colors: Vec<Rgb>,
}

impl TransformBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transforms: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    pub fn transforms(&self) -> &[RsxForm] {
        &self.transforms
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    fn clear(&mut self) {
        self.transforms.clear();
        self.colors.clear();
    }

    fn push(&mut self, transform: RsxForm, color: Rgb) {
        self.transforms.push(transform);
        self.colors.push(color);
    }
}

/// Maps the animation progress to per-flake transforms and global opacity.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    layout: Layout,
    cannons: Vec<Point>,
    initial_progress: f32,
    fade_out_on_end: bool,
}

impl TransformEngine {
    pub fn new(layout: Layout, options: &ConfettiOptions) -> Self {
        Self {
            layout,
            cannons: options.cannons_positions.clone(),
            initial_progress: options.initial_progress(),
            fade_out_on_end: options.fade_out_on_end,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn initial_progress(&self) -> f32 {
        self.initial_progress
    }

    fn has_cannons(&self) -> bool {
        !self.cannons.is_empty()
    }

    /// Clamp `progress` to the animation domain `[initial, 2]`.
    pub fn clamp_progress(&self, progress: f32) -> f32 {
        if progress.is_nan() {
            return self.initial_progress;
        }
        progress.clamp(self.initial_progress, END_PROGRESS)
    }

    /// Cannon flake `index` is launched from: flakes are split into contiguous
    /// runs, one per cannon, in index order.
    pub fn cannon_index(&self, index: usize) -> usize {
        // floor(index / count * cannons), in integers to avoid rounding at
        // run boundaries.
        let count = self.layout.count().max(1);
        index * self.cannons.len() / count
    }

    /// Where flake `index` rests between the blast and the fall, before any
    /// fall displacement or drift.
    pub fn resting_position(&self, index: usize, params: &FlakeParams) -> Point {
        let grid = self.layout.position(index);
        Point::new(
            grid.x + params.random_offset_x,
            grid.y + params.random_offset_y + params.initial_random_y + self.layout.vertical_offset(),
        )
    }

    /// Center position of flake `index` at `progress`.
    fn translation(&self, index: usize, params: &FlakeParams, progress: f32) -> Point {
        let rest = self.resting_position(index, params);

        if self.has_cannons() && progress < 1.0 {
            let cannon = self
                .cannons
                .get(self.cannon_index(index))
                .copied()
                .unwrap_or_default();
            return Point::new(
                interpolate(progress, &[0.0, 1.0], &[cannon.x, rest.x]),
                interpolate(progress, &[0.0, 1.0], &[cannon.y, rest.y]),
            );
        }

        let fall = self.layout.fall_distance() * params.random_speed;
        let dy = interpolate(progress, &[1.0, END_PROGRESS], &[0.0, fall]);
        // Drift is anchored at the first keyframe so the fall starts exactly
        // where the blast ended.
        let dx = interpolate(progress, &DRIFT_KEYFRAMES, &params.random_xs) - params.random_xs[0];

        Point::new(rest.x + dx, rest.y + dy)
    }

    /// Full transform of flake `index` at `progress`.
    pub fn flake_transform(&self, index: usize, params: &FlakeParams, progress: f32) -> FlakeTransform {
        let progress = self.clamp_progress(progress);

        // Rotation accumulates over the whole cycle, blast included.
        let span = [self.initial_progress, END_PROGRESS];
        let direction = params.direction();
        let rotation_z = params.initial_rotation
            + interpolate(progress, &span, &[0.0, direction * params.max_rotation.z]);
        let rotation_x = params.initial_rotation
            + interpolate(progress, &span, &[0.0, direction * params.max_rotation.x]);

        let flip = rotation_x.cos().abs();
        let grow = interpolate(progress, &BLAST_SCALE_INPUT, &BLAST_SCALE_OUTPUT);

        FlakeTransform {
            position: self.translation(index, params, progress),
            rotation_z,
            rotation_x,
            scale: flip * grow,
        }
    }

    /// Global opacity of the whole flake set at `progress`.
    pub fn opacity(&self, progress: f32) -> f32 {
        if !self.fade_out_on_end {
            return 1.0;
        }
        interpolate(self.clamp_progress(progress), &FADE_INPUT, &FADE_OUTPUT)
    }

    /// Compute every flake's atlas transform for this frame into `buffer`.
    ///
    /// Flakes beyond the layout's count, or missing from `flakes`, are
    /// skipped.
    pub fn fill(&self, progress: f32, flakes: &[FlakeParams], buffer: &mut TransformBuffer) {
        buffer.clear();
        let anchor = self.layout.flake_size().center();

        for (index, params) in flakes.iter().take(self.layout.count()).enumerate() {
            let t = self.flake_transform(index, params, progress);
            buffer.push(
                RsxForm::around(t.rotation_z, t.scale, anchor, t.position),
                params.color,
            );
        }
    }
}
