//! Lock-free progress value shared between threads.

use std::sync::atomic::{AtomicU32, Ordering};

/// An `f32` stored as raw bits in an atomic.
///
/// One writer at a time (the driver while animating, the controller
/// otherwise); any number of readers, each seeing the latest complete value.
#[derive(Debug)]
pub struct ProgressCell {
    bits: AtomicU32,
}

impl ProgressCell {
    pub fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }
}
