//! Background thread advancing the progress value along a timeline.

use std::io;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::progress::ProgressCell;
use crate::timeline::Timeline;

/// Tick interval of the driver thread (~60 Hz).
pub(crate) const FRAME: Duration = Duration::from_millis(16);

/// Callbacks run on the driver thread at timeline boundaries.
pub(crate) trait CycleHooks: Send + 'static {
    /// The current timeline finished. Returning another one keeps the
    /// driver going, `None` ends the thread.
    fn completed(&mut self) -> Option<Timeline>;

    /// The timeline returned by `completed` is about to run. Never called
    /// once the driver has been cancelled, and `cancel` waits for it.
    fn continued(&mut self) {}
}

impl<F> CycleHooks for F
where
    F: FnMut() -> Option<Timeline> + Send + 'static,
{
    fn completed(&mut self) -> Option<Timeline> {
        self()
    }
}

/// A running timeline. Dropping it stops the thread.
#[derive(Debug)]
pub(crate) struct Driver {
    /// Flag to signal thread termination.
    stopped: Arc<RwLock<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl Driver {
    /// Start writing `timeline` into `progress` on a new thread.
    ///
    /// `hooks.completed` is not called once the driver has been cancelled.
    pub(crate) fn spawn<H: CycleHooks>(
        timeline: Timeline,
        progress: Arc<ProgressCell>,
        mut hooks: H,
    ) -> io::Result<Self> {
        let stopped = Arc::new(RwLock::new(false));
        let flag = Arc::clone(&stopped);
        let is_stopped = move || *flag.read().unwrap_or_else(PoisonError::into_inner);
        let flag = Arc::clone(&stopped);

        let handle = thread::Builder::new()
            .name("confetti-driver".into())
            .spawn(move || {
                let mut timeline = timeline;
                let mut started = Instant::now();

                loop {
                    if is_stopped() {
                        break;
                    }

                    let sample = timeline.sample(started.elapsed());
                    progress.set(sample.value);
                    trace!(progress = sample.value, "tick");

                    if sample.finished {
                        if is_stopped() {
                            break;
                        }
                        let Some(next) = hooks.completed() else {
                            break;
                        };
                        // Held across `continued` so a cancel cannot slip in
                        // between the check and the notification.
                        let stop = flag.read().unwrap_or_else(PoisonError::into_inner);
                        if *stop {
                            break;
                        }
                        hooks.continued();
                        drop(stop);

                        timeline = next;
                        started = Instant::now();
                        continue;
                    }

                    thread::sleep(FRAME);
                }
            })?;

        Ok(Self {
            stopped,
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it, so no write happens after return.
    pub(crate) fn cancel(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        // The driver can end up owning itself through its hooks; it may be
        // holding the flag and joining would never return there.
        if handle.thread().id() == thread::current().id() {
            if let Ok(mut stopped) = self.stopped.try_write() {
                *stopped = true;
            }
            return;
        }
        *self.stopped.write().unwrap_or_else(PoisonError::into_inner) = true;
        let _ = handle.join();
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    use confetti_core::Easing;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn wait_until(mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() {
            assert!(Instant::now() < deadline, "timed out");
            thread::sleep(ms(5));
        }
    }

    #[test]
    fn test_runs_to_the_end() {
        let progress = Arc::new(ProgressCell::new(1.0));
        let (tx, rx) = mpsc::channel();
        let timeline = Timeline::new(1.0, Easing::Linear).then(2.0, ms(60));

        let driver = Driver::spawn(timeline, Arc::clone(&progress), move || {
            let _ = tx.send(());
            None
        })
        .unwrap();

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        wait_until(|| driver.is_finished());
        assert_eq!(progress.get(), 2.0);
    }

    #[test]
    fn test_cancel_freezes_value() {
        let progress = Arc::new(ProgressCell::new(1.0));
        let timeline = Timeline::new(1.0, Easing::Linear).then(2.0, Duration::from_secs(10));

        let mut driver = Driver::spawn(timeline, Arc::clone(&progress), || None).unwrap();
        wait_until(|| progress.get() > 1.0);
        driver.cancel();

        let frozen = progress.get();
        thread::sleep(FRAME * 4);
        assert_eq!(progress.get(), frozen);
        assert!(driver.is_finished());
    }

    #[test]
    fn test_completion_chains_timelines() {
        let progress = Arc::new(ProgressCell::new(0.0));
        let cycles = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&cycles);
        let timeline = Timeline::new(0.0, Easing::Linear).then(1.0, ms(20));

        let driver = Driver::spawn(timeline, Arc::clone(&progress), move || {
            let mut count = counter.lock().unwrap();
            *count += 1;
            (*count < 3).then(|| Timeline::new(0.0, Easing::Linear).then(1.0, ms(20)))
        })
        .unwrap();

        wait_until(|| driver.is_finished());
        assert_eq!(*cycles.lock().unwrap(), 3);
        assert_eq!(progress.get(), 1.0);
    }

    #[test]
    fn test_drop_stops_thread() {
        let progress = Arc::new(ProgressCell::new(1.0));
        let timeline = Timeline::new(1.0, Easing::Linear).then(2.0, Duration::from_secs(10));
        let driver = Driver::spawn(timeline, Arc::clone(&progress), || None).unwrap();
        wait_until(|| progress.get() > 1.0);
        drop(driver);

        let frozen = progress.get();
        thread::sleep(FRAME * 4);
        assert_eq!(progress.get(), frozen);
    }

    /// Chains timelines a fixed number of times, counting continuations.
    struct Chain {
        remaining: usize,
        continued: Arc<AtomicUsize>,
    }

    impl CycleHooks for Chain {
        fn completed(&mut self) -> Option<Timeline> {
            self.remaining = self.remaining.checked_sub(1)?;
            Some(Timeline::new(0.0, Easing::Linear).then(1.0, ms(20)))
        }

        fn continued(&mut self) {
            self.continued.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_continued_runs_before_each_chained_timeline() {
        let progress = Arc::new(ProgressCell::new(0.0));
        let continued = Arc::new(AtomicUsize::new(0));
        let hooks = Chain {
            remaining: 2,
            continued: Arc::clone(&continued),
        };
        let timeline = Timeline::new(0.0, Easing::Linear).then(1.0, ms(20));

        let driver = Driver::spawn(timeline, Arc::clone(&progress), hooks).unwrap();
        wait_until(|| driver.is_finished());
        assert_eq!(continued.load(Ordering::SeqCst), 2);
    }

    /// Signals when completion starts, then takes a while to hand back the
    /// next timeline.
    struct SlowCompletion {
        entered: mpsc::Sender<()>,
        continued: Arc<AtomicUsize>,
    }

    impl CycleHooks for SlowCompletion {
        fn completed(&mut self) -> Option<Timeline> {
            let _ = self.entered.send(());
            thread::sleep(ms(50));
            Some(Timeline::new(0.0, Easing::Linear).then(1.0, ms(20)))
        }

        fn continued(&mut self) {
            self.continued.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_cancel_during_completion_skips_continuation() {
        let progress = Arc::new(ProgressCell::new(0.0));
        let continued = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        let hooks = SlowCompletion {
            entered: tx,
            continued: Arc::clone(&continued),
        };
        let timeline = Timeline::new(0.0, Easing::Linear).then(1.0, ms(20));

        let mut driver = Driver::spawn(timeline, Arc::clone(&progress), hooks).unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        driver.cancel();

        assert!(driver.is_finished());
        assert_eq!(continued.load(Ordering::SeqCst), 0);
        assert_eq!(progress.get(), 1.0);
    }
}
