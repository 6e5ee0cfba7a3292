//! Confetti rendering core.
//!
//! This crate turns a single animation progress value into per-flake draw
//! instructions: a [`Layout`] assigns every flake a grid slot, a
//! [`FlakeGenerator`] rolls the per-flake random parameters, the
//! [`TransformEngine`] maps progress to transforms, and a [`Renderer`] submits
//! everything to an [`AtlasSurface`] as one batch per frame.

mod atlas;
mod flakes;
mod layout;
mod renderer;
mod transform;

pub use atlas::{AtlasBatch, AtlasSurface};
pub use flakes::{DRIFT_SAMPLES, FlakeGenerator, FlakeParams, Rotation, generate_flakes};
pub use layout::Layout;
pub use renderer::Renderer;
pub use transform::{FlakeTransform, RsxForm, TransformBuffer, TransformEngine};
