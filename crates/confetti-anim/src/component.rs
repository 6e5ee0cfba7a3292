//! The application-side half of a confetti instance.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use confetti_core::{ConfettiOptions, OptionsError};
use confetti_render::{AtlasSurface, FlakeGenerator, FlakeParams, Renderer};
use tracing::debug;

use crate::controller::{ConfettiController, ConfettiEvent};

type Callback = Box<dyn FnMut() + Send>;

/// A confetti instance owned by the application thread.
///
/// Creating one "mounts" it: with `autoplay` the first cycle is scheduled
/// right away. Events from the animation thread are queued until
/// [`Confetti::dispatch_pending`] runs them here, which is also where the
/// start/end callbacks are invoked and the flake list gets swapped.
pub struct Confetti {
    controller: ConfettiController,
    events: Receiver<ConfettiEvent>,
    flakes: Arc<[FlakeParams]>,
    renderer: Renderer,
    on_start: Option<Callback>,
    on_end: Option<Callback>,
}

impl Confetti {
    pub fn new(
        options: ConfettiOptions,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Result<Self, OptionsError> {
        Self::with_generator(
            options,
            FlakeGenerator::from_entropy(),
            viewport_width,
            viewport_height,
        )
    }

    /// Like [`Confetti::new`] with a caller supplied random source.
    pub fn with_generator(
        options: ConfettiOptions,
        generator: FlakeGenerator,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Result<Self, OptionsError> {
        options.validate()?;

        let renderer = Renderer::new(&options, viewport_width, viewport_height);
        let (tx, events) = mpsc::channel();
        let (controller, flakes) = ConfettiController::new(options, generator, tx);
        controller.schedule_autostart();

        debug!(count = flakes.len(), "confetti mounted");
        Ok(Self {
            controller,
            events,
            flakes,
            renderer,
            on_start: None,
            on_end: None,
        })
    }

    /// Called on this thread whenever a cycle starts.
    pub fn on_animation_start(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Called on this thread whenever a cycle runs to completion.
    pub fn on_animation_end(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    /// Handle for restart/pause/resume/reset, usable from any thread.
    pub fn controller(&self) -> &ConfettiController {
        &self.controller
    }

    /// Handle every queued event. Returns how many were handled.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for one event and handle it.
    pub fn dispatch_next(&mut self, timeout: Duration) -> Option<ConfettiEvent> {
        let event = self.events.recv_timeout(timeout).ok()?;
        self.handle(event.clone());
        Some(event)
    }

    fn handle(&mut self, event: ConfettiEvent) {
        match event {
            ConfettiEvent::Started => {
                if let Some(callback) = self.on_start.as_mut() {
                    callback();
                }
            }
            ConfettiEvent::Ended => {
                if let Some(callback) = self.on_end.as_mut() {
                    callback();
                }
            }
            ConfettiEvent::FlakesRegenerated(flakes) => self.flakes = flakes,
        }
    }

    /// Flakes of the current cycle.
    pub fn flakes(&self) -> &[FlakeParams] {
        &self.flakes
    }

    pub fn progress(&self) -> f32 {
        self.controller.progress()
    }

    /// Opacity the next frame is drawn with.
    pub fn opacity(&self) -> f32 {
        self.renderer.engine().opacity(self.progress())
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.renderer.resize(viewport_width, viewport_height);
    }

    /// Draw the current frame onto `surface`.
    pub fn render<S: AtlasSurface + ?Sized>(&mut self, surface: &mut S) {
        let progress = self.controller.progress();
        self.renderer.draw(progress, &self.flakes, surface);
    }
}

impl fmt::Debug for Confetti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Confetti")
            .field("controller", &self.controller)
            .field("flakes", &self.flakes.len())
            .field("renderer", &self.renderer)
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

impl Drop for Confetti {
    fn drop(&mut self) {
        self.controller.shutdown();
    }
}
