//! Timed value sequences.
//!
//! A [`Timeline`] moves a value from a start point through a sequence of timed
//! segments. It is sampled by elapsed time, so the same timeline can be
//! evaluated from any thread without internal state.

use std::time::Duration;

use confetti_core::{ConfettiOptions, END_PROGRESS, Easing, lerp};

/// One timed move towards `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub target: f32,
    pub duration: Duration,
}

/// Value of a timeline at some elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f32,
    /// Every segment has run to completion.
    pub finished: bool,
}

/// A start value followed by segments run back to back.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    start: f32,
    segments: Vec<Segment>,
    easing: Easing,
}

impl Timeline {
    pub fn new(start: f32, easing: Easing) -> Self {
        Self {
            start,
            segments: Vec::new(),
            easing,
        }
    }

    /// Append a segment moving to `target` over `duration`.
    pub fn then(mut self, target: f32, duration: Duration) -> Self {
        self.segments.push(Segment { target, duration });
        self
    }

    /// A full confetti cycle from the initial progress: the blast (only with
    /// cannons) followed by the fall.
    pub fn cycle(options: &ConfettiOptions) -> Self {
        Self::compose(
            options,
            options.initial_progress(),
            Some(options.blast_duration()),
            Some(options.fall_duration()),
        )
    }

    /// The rest of a cycle interrupted at `progress`, with each remaining
    /// segment's duration shortened in proportion to the distance left.
    pub fn resume_from(options: &ConfettiOptions, progress: f32) -> Self {
        if progress < 1.0 {
            let blast = scaled(options.blast_duration(), 1.0 - progress);
            Self::compose(options, progress, Some(blast), Some(options.fall_duration()))
        } else {
            let fall = scaled(options.fall_duration(), END_PROGRESS - progress);
            Self::compose(options, progress, None, Some(fall))
        }
    }

    fn compose(
        options: &ConfettiOptions,
        start: f32,
        blast: Option<Duration>,
        fall: Option<Duration>,
    ) -> Self {
        let mut timeline = Self::new(start, options.easing);
        if let Some(blast) = blast
            && !blast.is_zero()
            && options.has_cannons()
        {
            timeline = timeline.then(1.0, blast);
        }
        if let Some(fall) = fall
            && !fall.is_zero()
        {
            timeline = timeline.then(END_PROGRESS, fall);
        }
        timeline
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_duration(&self) -> Duration {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Value after `elapsed` time.
    pub fn sample(&self, elapsed: Duration) -> Sample {
        let mut from = self.start;
        let mut remaining = elapsed;

        for segment in &self.segments {
            if remaining < segment.duration {
                let t = remaining.as_secs_f32() / segment.duration.as_secs_f32();
                return Sample {
                    value: lerp(from, segment.target, self.easing.apply(t)),
                    finished: false,
                };
            }
            remaining -= segment.duration;
            from = segment.target;
        }

        Sample {
            value: from,
            finished: true,
        }
    }
}

/// `duration * factor`, with the factor clamped to 0.0-1.0.
fn scaled(duration: Duration, factor: f32) -> Duration {
    let factor = f64::from(factor.clamp(0.0, 1.0));
    Duration::from_nanos((duration.as_nanos() as f64 * factor).round() as u64)
}

#[cfg(test)]
mod tests {
    use confetti_core::Point;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn with_cannons() -> ConfettiOptions {
        ConfettiOptions {
            blast_duration: 400,
            fall_duration: 8000,
            cannons_positions: vec![Point::new(0.0, 800.0)],
            easing: Easing::Linear,
            ..Default::default()
        }
    }

    #[test]
    fn test_sample_linear_segments() {
        let timeline = Timeline::new(0.0, Easing::Linear)
            .then(1.0, ms(100))
            .then(2.0, ms(400));

        assert_eq!(timeline.sample(ms(0)).value, 0.0);
        assert!((timeline.sample(ms(50)).value - 0.5).abs() < 1e-4);
        assert!((timeline.sample(ms(100)).value - 1.0).abs() < 1e-4);
        assert!((timeline.sample(ms(300)).value - 1.5).abs() < 1e-4);
        assert!(!timeline.sample(ms(499)).finished);

        let end = timeline.sample(ms(500));
        assert!(end.finished);
        assert_eq!(end.value, 2.0);
        assert_eq!(timeline.sample(ms(10_000)).value, 2.0);
    }

    #[test]
    fn test_sample_eased_segment() {
        let timeline = Timeline::new(1.0, Easing::InOutQuad).then(2.0, ms(1000));
        let quarter = timeline.sample(ms(250)).value;
        assert!(quarter > 1.0 && quarter < 1.25);
        assert!((timeline.sample(ms(500)).value - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_timeline_finishes_immediately() {
        let timeline = Timeline::new(1.0, Easing::Linear);
        let sample = timeline.sample(Duration::ZERO);
        assert!(sample.finished);
        assert_eq!(sample.value, 1.0);
    }

    #[test]
    fn test_cycle_without_cannons_is_fall_only() {
        let options = ConfettiOptions::default();
        let timeline = Timeline::cycle(&options);
        assert_eq!(timeline.start(), 1.0);
        assert_eq!(
            timeline.segments(),
            &[Segment {
                target: 2.0,
                duration: ms(8000)
            }]
        );
    }

    #[test]
    fn test_cycle_with_cannons_blasts_first() {
        let timeline = Timeline::cycle(&with_cannons());
        assert_eq!(timeline.start(), 0.0);
        assert_eq!(timeline.segments().len(), 2);
        assert_eq!(timeline.segments()[0].target, 1.0);
        assert_eq!(timeline.segments()[0].duration, ms(400));
        assert_eq!(timeline.total_duration(), ms(8400));
    }

    #[test]
    fn test_cycle_skips_zero_durations() {
        let options = ConfettiOptions {
            blast_duration: 0,
            ..with_cannons()
        };
        let timeline = Timeline::cycle(&options);
        assert_eq!(timeline.segments().len(), 1);
        assert_eq!(timeline.segments()[0].target, 2.0);
    }

    #[test]
    fn test_resume_mid_blast() {
        let timeline = Timeline::resume_from(&with_cannons(), 0.25);
        assert_eq!(timeline.start(), 0.25);
        assert_eq!(timeline.segments()[0].duration, ms(300));
        assert_eq!(timeline.segments()[1].duration, ms(8000));
    }

    #[test]
    fn test_resume_mid_fall() {
        let timeline = Timeline::resume_from(&with_cannons(), 1.5);
        assert_eq!(timeline.start(), 1.5);
        assert_eq!(
            timeline.segments(),
            &[Segment {
                target: 2.0,
                duration: ms(4000)
            }]
        );
        // Continues from where it stopped, no snap back.
        assert_eq!(timeline.sample(Duration::ZERO).value, 1.5);
    }

    #[test]
    fn test_resume_at_end_is_empty() {
        let timeline = Timeline::resume_from(&ConfettiOptions::default(), 2.0);
        assert!(timeline.is_empty());
        assert!(timeline.sample(Duration::ZERO).finished);
    }
}
