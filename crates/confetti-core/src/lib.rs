//! Core types shared by the confetti crates.
//!
//! Holds the construction options, palette colors, geometry primitives and the
//! clamped interpolation every progress-driven computation goes through.

mod color;
mod constants;
mod geometry;
mod interpolate;
mod options;

pub use color::{ColorParseError, Rgb};
pub use constants::{
    DEFAULT_AUTOSTART_DELAY_MS, DEFAULT_BLAST_DURATION_MS, DEFAULT_COLORS, DEFAULT_COUNT,
    DEFAULT_FALL_DURATION_MS, DEFAULT_FLAKE_SIZE, DEFAULT_VERTICAL_SPACING, END_PROGRESS,
    RANDOM_INITIAL_Y_JIGGLE,
};
pub use geometry::{FlakeSize, Point, Rect};
pub use interpolate::{interpolate, lerp};
pub use options::{ConfettiOptions, Easing, OptionsError};
