//! Construction-time options for a confetti instance.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTOSTART_DELAY_MS, DEFAULT_BLAST_DURATION_MS, DEFAULT_COLORS, DEFAULT_COUNT,
    DEFAULT_FALL_DURATION_MS, DEFAULT_FLAKE_SIZE, DEFAULT_VERTICAL_SPACING,
};
use crate::{FlakeSize, Point, Rgb};

/// Timing curve applied to each animation segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// Quadratic ease-in-out: slow start, fast middle, slow end.
    #[default]
    InOutQuad,
}

impl Easing {
    /// Map linear time `t` (0.0-1.0) onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Options rejected by [`ConfettiOptions::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("color palette must not be empty")]
    EmptyPalette,
    #[error("flake size must be positive, got {width}x{height}")]
    InvalidFlakeSize { width: f32, height: f32 },
    #[error("container size must not be negative, got {width}x{height}")]
    InvalidContainer { width: f32, height: f32 },
}

/// Everything a confetti instance is configured with.
///
/// Callbacks are registered separately on the component since they cannot be
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiOptions {
    /// Number of flakes generated per cycle.
    pub count: usize,
    pub flake_size: FlakeSize,
    /// Container width; `None` uses the host viewport.
    pub width: Option<f32>,
    /// Container height; `None` uses the host viewport.
    pub height: Option<f32>,
    /// Fall phase duration in milliseconds.
    pub fall_duration: u64,
    /// Blast phase duration in milliseconds.
    pub blast_duration: u64,
    pub colors: Vec<Rgb>,
    /// Delay before the automatic first start in milliseconds.
    pub auto_start_delay: u64,
    pub vertical_spacing: f32,
    pub autoplay: bool,
    /// Loop forever; `None` follows `autoplay`.
    pub is_infinite: Option<bool>,
    pub fade_out_on_end: bool,
    /// Blast origins. Empty disables the blast phase.
    pub cannons_positions: Vec<Point>,
    pub easing: Easing,
}

impl Default for ConfettiOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            flake_size: DEFAULT_FLAKE_SIZE,
            width: None,
            height: None,
            fall_duration: DEFAULT_FALL_DURATION_MS,
            blast_duration: DEFAULT_BLAST_DURATION_MS,
            colors: DEFAULT_COLORS.to_vec(),
            auto_start_delay: DEFAULT_AUTOSTART_DELAY_MS,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
            autoplay: true,
            is_infinite: None,
            fade_out_on_end: false,
            cannons_positions: Vec::new(),
            easing: Easing::default(),
        }
    }
}

impl ConfettiOptions {
    pub fn has_cannons(&self) -> bool {
        !self.cannons_positions.is_empty()
    }

    /// Progress value a cycle starts from: 0 with cannons (blast first), else 1.
    pub fn initial_progress(&self) -> f32 {
        if self.has_cannons() { 0.0 } else { 1.0 }
    }

    pub fn infinite(&self) -> bool {
        self.is_infinite.unwrap_or(self.autoplay)
    }

    pub fn fall_duration(&self) -> Duration {
        Duration::from_millis(self.fall_duration)
    }

    pub fn blast_duration(&self) -> Duration {
        Duration::from_millis(self.blast_duration)
    }

    pub fn auto_start_delay(&self) -> Duration {
        Duration::from_millis(self.auto_start_delay)
    }

    /// Resolve the container size against the host viewport.
    pub fn container_size(&self, viewport_width: f32, viewport_height: f32) -> (f32, f32) {
        // A zero dimension means "unset", same as None.
        let pick = |value: Option<f32>, fallback: f32| match value {
            Some(v) if v > 0.0 => v,
            _ => fallback,
        };
        (
            pick(self.width, viewport_width),
            pick(self.height, viewport_height),
        )
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.colors.is_empty() {
            return Err(OptionsError::EmptyPalette);
        }
        let FlakeSize { width, height } = self.flake_size;
        if !(width > 0.0 && height > 0.0) {
            return Err(OptionsError::InvalidFlakeSize { width, height });
        }
        // Unset and zero both fall back to the viewport; only reject garbage.
        let (width, height) = (self.width.unwrap_or(0.0), self.height.unwrap_or(0.0));
        if !(width >= 0.0 && height >= 0.0) {
            return Err(OptionsError::InvalidContainer { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConfettiOptions::default();
        assert_eq!(opts.count, 200);
        assert_eq!(opts.fall_duration(), Duration::from_secs(8));
        assert_eq!(opts.colors.len(), 10);
        assert!(opts.autoplay);
        assert!(opts.infinite());
        assert!(!opts.has_cannons());
        assert_eq!(opts.initial_progress(), 1.0);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_infinite_follows_autoplay_unless_set() {
        let mut opts = ConfettiOptions {
            autoplay: false,
            ..Default::default()
        };
        assert!(!opts.infinite());
        opts.is_infinite = Some(true);
        assert!(opts.infinite());
    }

    #[test]
    fn test_cannons_start_at_zero() {
        let opts = ConfettiOptions {
            cannons_positions: vec![Point::new(-30.0, 600.0)],
            ..Default::default()
        };
        assert!(opts.has_cannons());
        assert_eq!(opts.initial_progress(), 0.0);
    }

    #[test]
    fn test_container_size_fallback() {
        let mut opts = ConfettiOptions::default();
        assert_eq!(opts.container_size(390.0, 844.0), (390.0, 844.0));
        opts.width = Some(200.0);
        opts.height = Some(0.0);
        assert_eq!(opts.container_size(390.0, 844.0), (200.0, 844.0));
    }

    #[test]
    fn test_validate_rejects_bad_options() {
        let empty = ConfettiOptions {
            colors: Vec::new(),
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(OptionsError::EmptyPalette));

        let flat = ConfettiOptions {
            flake_size: FlakeSize::new(6.0, 0.0),
            ..Default::default()
        };
        assert!(matches!(
            flat.validate(),
            Err(OptionsError::InvalidFlakeSize { .. })
        ));
    }

    #[test]
    fn test_easing_curves() {
        assert_eq!(Easing::Linear.apply(0.3), 0.3);
        assert_eq!(Easing::InOutQuad.apply(0.0), 0.0);
        assert_eq!(Easing::InOutQuad.apply(0.5), 0.5);
        assert_eq!(Easing::InOutQuad.apply(1.0), 1.0);
        assert!(Easing::InOutQuad.apply(0.25) < 0.25);
        assert!(Easing::InOutQuad.apply(0.75) > 0.75);
        assert_eq!(Easing::Linear.apply(7.0), 1.0);
    }

    #[test]
    fn test_validate_rejects_negative_container() {
        let opts = ConfettiOptions {
            width: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(OptionsError::InvalidContainer { .. })
        ));
    }
}
