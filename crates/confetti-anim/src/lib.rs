//! Animation state machine for the confetti effect.
//!
//! A [`ConfettiController`] owns the progress value and advances it on a
//! background driver thread. The [`Confetti`] component lives on the
//! application thread: it receives start/end notifications and regenerated
//! flake lists through a channel and renders frames from the latest progress.

mod component;
mod controller;
mod driver;
mod progress;
mod timeline;

pub use component::Confetti;
pub use controller::{AnimationStatus, ConfettiController, ConfettiEvent};
pub use progress::ProgressCell;
pub use timeline::{Sample, Segment, Timeline};
