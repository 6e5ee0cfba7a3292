//! Restart/pause/resume/reset state machine.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;

use confetti_core::ConfettiOptions;
use confetti_render::{FlakeGenerator, FlakeParams};
use tracing::{debug, error};

use crate::driver::{CycleHooks, Driver};
use crate::progress::ProgressCell;
use crate::timeline::Timeline;

/// Where the animation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AnimationStatus {
    /// Progress at its initial value, nothing scheduled.
    #[default]
    Idle = 0,
    Running = 1,
    /// Progress frozen where it was paused.
    Paused = 2,
}

impl AnimationStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => AnimationStatus::Running,
            2 => AnimationStatus::Paused,
            _ => AnimationStatus::Idle,
        }
    }
}

/// Notification handed from the driver to the application thread.
#[derive(Debug, Clone)]
pub enum ConfettiEvent {
    /// A cycle began.
    Started,
    /// A cycle ran to completion.
    Ended,
    /// A fresh flake list replaces the current one.
    FlakesRegenerated(Arc<[FlakeParams]>),
}

#[derive(Debug)]
struct Shared {
    options: ConfettiOptions,
    progress: Arc<ProgressCell>,
    status: AtomicU8,
    /// Set once the owning component is gone.
    closed: AtomicBool,
    /// Only control operations lock this; the driver thread never does.
    driver: Mutex<Option<Driver>>,
    generator: Mutex<FlakeGenerator>,
    events: Sender<ConfettiEvent>,
}

impl Shared {
    fn status(&self) -> AnimationStatus {
        AnimationStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    fn set_status(&self, status: AnimationStatus) {
        self.status.store(status as u8, Ordering::Release);
    }

    fn driver(&self) -> MutexGuard<'_, Option<Driver>> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn initial(&self) -> f32 {
        self.options.initial_progress()
    }

    fn send(&self, event: ConfettiEvent) {
        // The receiver goes away with the component; nothing left to notify.
        let _ = self.events.send(event);
    }

    fn regenerate(&self) {
        let flakes: Arc<[FlakeParams]> = self
            .generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate(self.options.count, &self.options.colors)
            .into();
        self.send(ConfettiEvent::FlakesRegenerated(flakes));
    }

    /// End-of-cycle bookkeeping, run on the driver thread. `continue_with`
    /// decides whether another full cycle follows; its start is announced
    /// by the driver once it is sure to run.
    fn complete_cycle(&self, continue_with: bool) -> Option<Timeline> {
        debug!("confetti cycle ended");
        self.send(ConfettiEvent::Ended);
        self.regenerate();

        self.progress.set(self.initial());
        if continue_with {
            Some(Timeline::cycle(&self.options))
        } else {
            self.set_status(AnimationStatus::Idle);
            None
        }
    }
}

/// Driver hooks of one controller run.
struct CycleEnd {
    shared: Weak<Shared>,
    /// The run began with `resume`; its first completion follows `autoplay`.
    resumed: bool,
}

impl CycleHooks for CycleEnd {
    fn completed(&mut self) -> Option<Timeline> {
        let shared = self.shared.upgrade()?;
        let options = &shared.options;
        let continue_with = if self.resumed {
            options.autoplay
        } else {
            options.infinite()
        };
        self.resumed = false;
        shared.complete_cycle(continue_with)
    }

    fn continued(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.send(ConfettiEvent::Started);
        }
    }
}

/// Handle controlling one confetti animation.
///
/// Cheap to clone and usable from any thread. Every operation takes effect
/// before it returns: once `pause` or `reset` is back, the progress value no
/// longer moves.
#[derive(Debug, Clone)]
pub struct ConfettiController {
    shared: Arc<Shared>,
}

impl ConfettiController {
    /// Build an idle controller and roll the first flake list.
    pub(crate) fn new(
        options: ConfettiOptions,
        mut generator: FlakeGenerator,
        events: Sender<ConfettiEvent>,
    ) -> (Self, Arc<[FlakeParams]>) {
        let flakes: Arc<[FlakeParams]> = generator.generate(options.count, &options.colors).into();
        let progress = Arc::new(ProgressCell::new(options.initial_progress()));

        let controller = Self {
            shared: Arc::new(Shared {
                options,
                progress,
                status: AtomicU8::new(AnimationStatus::Idle as u8),
                closed: AtomicBool::new(false),
                driver: Mutex::new(None),
                generator: Mutex::new(generator),
                events,
            }),
        };
        (controller, flakes)
    }

    pub fn options(&self) -> &ConfettiOptions {
        &self.shared.options
    }

    /// Latest progress value.
    pub fn progress(&self) -> f32 {
        self.shared.progress.get()
    }

    pub(crate) fn progress_cell(&self) -> Arc<ProgressCell> {
        Arc::clone(&self.shared.progress)
    }

    pub fn status(&self) -> AnimationStatus {
        self.shared.status()
    }

    pub fn is_running(&self) -> bool {
        self.status() == AnimationStatus::Running
    }

    /// Start a new cycle from scratch with freshly generated flakes.
    pub fn restart(&self) {
        let mut slot = self.shared.driver();
        self.restart_locked(&mut slot);
    }

    fn restart_locked(&self, slot: &mut Option<Driver>) {
        let shared = &self.shared;
        if let Some(mut driver) = slot.take() {
            driver.cancel();
        }

        shared.regenerate();
        shared.progress.set(shared.initial());
        shared.set_status(AnimationStatus::Running);
        shared.send(ConfettiEvent::Started);
        debug!("confetti restarted");

        *slot = self.spawn(Timeline::cycle(&shared.options), false);
    }

    /// Freeze progress where it is. No-op unless running.
    pub fn pause(&self) {
        let shared = &self.shared;
        let mut slot = shared.driver();
        if shared.status() != AnimationStatus::Running {
            return;
        }
        if let Some(mut driver) = slot.take() {
            driver.cancel();
        }
        // The cycle may have finished on its own while we were waiting.
        let _ = shared.status.compare_exchange(
            AnimationStatus::Running as u8,
            AnimationStatus::Paused as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        debug!(progress = shared.progress.get(), "confetti paused");
    }

    /// Continue from the current progress with the remaining durations.
    /// No-op if already running.
    pub fn resume(&self) {
        let shared = &self.shared;
        let mut slot = shared.driver();
        let previous = shared.status();
        if previous == AnimationStatus::Running {
            return;
        }
        if let Some(mut driver) = slot.take() {
            driver.cancel();
        }

        let progress = shared.progress.get();
        shared.set_status(AnimationStatus::Running);
        if previous == AnimationStatus::Idle {
            shared.send(ConfettiEvent::Started);
        }
        debug!(progress, "confetti resumed");

        *slot = self.spawn(Timeline::resume_from(&shared.options, progress), true);
    }

    /// Stop and snap progress back to its initial value, keeping the flakes.
    pub fn reset(&self) {
        let shared = &self.shared;
        let mut slot = shared.driver();
        if let Some(mut driver) = slot.take() {
            driver.cancel();
        }
        shared.progress.set(shared.initial());
        shared.set_status(AnimationStatus::Idle);
        debug!("confetti reset");
    }

    /// Run the autoplay start: one `restart` after the configured delay,
    /// skipped if something else started the animation first.
    pub(crate) fn schedule_autostart(&self) {
        if !self.shared.options.autoplay {
            return;
        }

        let delay = self.shared.options.auto_start_delay();
        if delay.is_zero() {
            self.autostart();
            return;
        }

        let weak = Arc::downgrade(&self.shared);
        let spawned = thread::Builder::new()
            .name("confetti-autostart".into())
            .spawn(move || {
                thread::sleep(delay);
                if let Some(shared) = weak.upgrade() {
                    ConfettiController { shared }.autostart();
                }
            });
        if let Err(err) = spawned {
            error!(%err, "failed to schedule confetti autostart");
        }
    }

    fn autostart(&self) {
        let mut slot = self.shared.driver();
        if self.shared.closed.load(Ordering::Acquire) || self.is_running() {
            return;
        }
        debug!("confetti autostart");
        self.restart_locked(&mut slot);
    }

    /// Stop everything for good; used when the owning component goes away.
    pub(crate) fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::Release);
        if let Some(mut driver) = self.shared.driver().take() {
            driver.cancel();
        }
    }

    /// Start a driver for `timeline`. After a resume, the first completion
    /// continues only with autoplay; later ones follow `is_infinite`.
    fn spawn(&self, timeline: Timeline, resumed: bool) -> Option<Driver> {
        let hooks = CycleEnd {
            shared: Arc::downgrade(&self.shared),
            resumed,
        };

        match Driver::spawn(timeline, self.progress_cell(), hooks) {
            Ok(driver) => Some(driver),
            Err(err) => {
                error!(%err, "failed to start confetti driver");
                self.shared.set_status(AnimationStatus::Idle);
                None
            }
        }
    }
}
