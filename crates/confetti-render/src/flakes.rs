//! Per-flake randomized parameters.

use std::f32::consts::PI;
use std::ops::RangeInclusive;

use confetti_core::{DEFAULT_COLORS, RANDOM_INITIAL_Y_JIGGLE, Rgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Number of horizontal drift keyframes per flake.
pub const DRIFT_SAMPLES: usize = 5;

/// Total spin range of each rotation axis (1 to 10 full turns).
const MAX_ROTATION: RangeInclusive<f32> = 2.0 * PI..=20.0 * PI;

/// Horizontal drift keyframe range in pixels.
const DRIFT: RangeInclusive<f32> = -50.0..=50.0;

/// Fall speed multiplier range.
const SPEED: RangeInclusive<f32> = 0.9..=1.3;

/// Positional jitter range in pixels.
const OFFSET: RangeInclusive<f32> = -10.0..=10.0;

/// Starting rotation range.
const INITIAL_ROTATION: RangeInclusive<f32> = 0.1 * PI..=PI;

/// Rotation extents around the two animated axes, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Spin around the horizontal axis, seen as a card flip.
    pub x: f32,
    /// Spin in the screen plane.
    pub z: f32,
}

/// Random parameters of a single flake for one animation cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FlakeParams {
    pub color: Rgb,
    pub clockwise: bool,
    pub max_rotation: Rotation,
    /// Horizontal drift keyframes for progress 1.0, 1.25, 1.5, 1.75 and 2.0.
    pub random_xs: [f32; DRIFT_SAMPLES],
    /// Fall distance multiplier.
    pub random_speed: f32,
    pub random_offset_x: f32,
    pub random_offset_y: f32,
    /// Rotation the flake starts the cycle with.
    pub initial_rotation: f32,
    /// Vertical seed added to the resting position.
    pub initial_random_y: f32,
}

impl FlakeParams {
    /// `1.0` for clockwise spin, `-1.0` otherwise.
    pub fn direction(&self) -> f32 {
        if self.clockwise { 1.0 } else { -1.0 }
    }
}

/// Roll `count` independent flakes from `colors` using `rng`.
///
/// An empty palette is a caller bug; it is tolerated by falling back to the
/// first default color.
pub fn generate_flakes<R: Rng>(rng: &mut R, count: usize, colors: &[Rgb]) -> Vec<FlakeParams> {
    if colors.is_empty() && count > 0 {
        warn!("empty color palette, falling back to the default color");
    }

    (0..count)
        .map(|_| FlakeParams {
            clockwise: rng.random_bool(0.5),
            max_rotation: Rotation {
                x: rng.random_range(MAX_ROTATION),
                z: rng.random_range(MAX_ROTATION),
            },
            color: pick_color(rng, colors),
            random_xs: std::array::from_fn(|_| rng.random_range(DRIFT)),
            random_speed: rng.random_range(SPEED),
            random_offset_x: rng.random_range(OFFSET),
            random_offset_y: rng.random_range(OFFSET),
            initial_rotation: rng.random_range(INITIAL_ROTATION),
            initial_random_y: rng.random_range(-RANDOM_INITIAL_Y_JIGGLE..=RANDOM_INITIAL_Y_JIGGLE),
        })
        .collect()
}

fn pick_color<R: Rng>(rng: &mut R, colors: &[Rgb]) -> Rgb {
    if colors.is_empty() {
        return DEFAULT_COLORS[0];
    }
    colors[rng.random_range(0..colors.len())]
}

/// Flake generator owning its random source.
#[derive(Debug, Clone)]
pub struct FlakeGenerator {
    rng: StdRng,
}

impl FlakeGenerator {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, count: usize, colors: &[Rgb]) -> Vec<FlakeParams> {
        let flakes = generate_flakes(&mut self.rng, count, colors);
        debug!(count = flakes.len(), "generated flakes");
        flakes
    }
}

impl Default for FlakeGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
