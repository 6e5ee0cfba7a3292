//! Default option values and fixed animation constants.

use crate::{FlakeSize, Rgb};

/// Number of flakes generated per cycle.
pub const DEFAULT_COUNT: usize = 200;

/// Bounding box of a single flake.
pub const DEFAULT_FLAKE_SIZE: FlakeSize = FlakeSize {
    width: 6.0,
    height: 12.0,
};

/// Duration of the fall phase in milliseconds.
pub const DEFAULT_FALL_DURATION_MS: u64 = 8000;

/// Duration of the blast phase in milliseconds.
pub const DEFAULT_BLAST_DURATION_MS: u64 = 300;

/// Delay before the automatic first start in milliseconds.
pub const DEFAULT_AUTOSTART_DELAY_MS: u64 = 0;

/// Extra gap between grid rows.
pub const DEFAULT_VERTICAL_SPACING: f32 = 30.0;

/// Maximum per-flake vertical seed offset, also subtracted from the grid's
/// start offset so jiggled flakes stay above the visible area.
pub const RANDOM_INITIAL_Y_JIGGLE: f32 = 20.0;

/// Progress value at the end of the fall phase.
pub const END_PROGRESS: f32 = 2.0;

/// Default flake palette.
pub const DEFAULT_COLORS: [Rgb; 10] = [
    Rgb::new(0xFF, 0x57, 0x33),
    Rgb::new(0x33, 0xFF, 0x57),
    Rgb::new(0x33, 0x57, 0xFF),
    Rgb::new(0xF5, 0xFF, 0x33),
    Rgb::new(0xFF, 0x33, 0xB5),
    Rgb::new(0x33, 0xFF, 0xDE),
    Rgb::new(0xFF, 0xB7, 0x33),
    Rgb::new(0xA3, 0xFF, 0x33),
    Rgb::new(0x33, 0xA5, 0xFF),
    Rgb::new(0xFF, 0x33, 0xA5),
];
