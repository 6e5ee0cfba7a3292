//! Glyphs used to draw flakes.

/// Flake seen almost edge-on.
pub const EDGE_ON: char = '·';

/// Half-turned flake, indexed by orientation: upright, leaning right,
/// flat, leaning left.
pub const THIN: [char; 4] = ['│', '╱', '─', '╲'];

/// Flake facing the viewer, same orientation order as [`THIN`].
pub const FULL: [char; 4] = ['▮', '◆', '▬', '◆'];
