//! Fixed-delay periodic scheduler with pause/resume.
//!
//! A single timer task runs the cycle body, waits `interval`, and repeats.
//! The next firing is only armed after the body returns, so bodies never
//! overlap. Pausing skips bodies but leaves the timer running.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{TrackerError, TrackerResult};

/// Lifecycle state of a [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// Never started, or the timer task has ended.
    Idle,
    /// Timer armed, bodies run on every firing.
    Running,
    /// Timer armed, bodies skipped until resumed.
    Paused,
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        };
        f.write_str(s)
    }
}

/// Drives a cycle body on a fixed delay.
///
/// There is no stop operation: once started the timer fires until the
/// scheduler is dropped, which aborts it.
pub struct Scheduler {
    paused: Arc<AtomicBool>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(false)),
            timer: Mutex::new(None),
        }
    }

    /// Current state. A timer whose task has ended (its body panicked)
    /// reports `Idle` and may be started again.
    pub fn state(&self) -> SchedulerState {
        let armed = self
            .timer
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());
        if !armed {
            SchedulerState::Idle
        } else if self.paused.load(Ordering::SeqCst) {
            SchedulerState::Paused
        } else {
            SchedulerState::Running
        }
    }

    /// Arm the timer on the current tokio runtime.
    ///
    /// The first body runs after `initial_delay`, each later one `interval`
    /// after the previous body returned. Fails without effect if `interval`
    /// is zero, if the scheduler was already started, or if called outside
    /// a runtime.
    pub fn start<F, Fut>(
        &self,
        interval: Duration,
        initial_delay: Duration,
        mut body: F,
    ) -> TrackerResult<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if interval.is_zero() {
            return Err(TrackerError::config("interval must be greater than zero"));
        }
        let mut timer = self.timer.lock().expect("lock poisoned");
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(TrackerError::config("scheduler already started"));
        }
        let handle = Handle::try_current()
            .map_err(|e| TrackerError::config(format!("no tokio runtime: {e}")))?;

        self.paused.store(false, Ordering::SeqCst);
        let paused = Arc::clone(&self.paused);
        *timer = Some(handle.spawn(async move {
            tokio::time::sleep(initial_delay).await;
            loop {
                if paused.load(Ordering::SeqCst) {
                    debug!("cycle skipped while paused");
                } else {
                    body().await;
                }
                tokio::time::sleep(interval).await;
            }
        }));

        info!(?interval, ?initial_delay, "scheduler started");
        Ok(())
    }

    /// Skip cycle bodies from the next firing on. An in-flight body is not
    /// interrupted.
    pub fn pause(&self) -> TrackerResult<()> {
        self.set_paused(true)
    }

    /// Run cycle bodies again from the next firing on.
    pub fn resume(&self) -> TrackerResult<()> {
        self.set_paused(false)
    }

    fn set_paused(&self, paused: bool) -> TrackerResult<()> {
        if self.state() == SchedulerState::Idle {
            return Err(TrackerError::config("scheduler has not been started"));
        }
        if self.paused.swap(paused, Ordering::SeqCst) != paused {
            info!(paused, "scheduler toggled");
        }
        Ok(())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_body(count: &Arc<AtomicUsize>) -> impl FnMut() -> std::future::Ready<()> + Send + 'static {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test]
    async fn new_scheduler_is_idle() {
        let s = Scheduler::new();
        assert_eq!(s.state(), SchedulerState::Idle);
        assert_eq!(s.state().to_string(), "idle");
    }

    #[tokio::test]
    async fn zero_interval_rejected() {
        let s = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let err = s
            .start(Duration::ZERO, Duration::ZERO, counting_body(&count))
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn second_start_rejected() {
        let s = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        s.start(Duration::from_secs(10), Duration::ZERO, counting_body(&count))
            .unwrap();
        let err = s
            .start(Duration::from_secs(10), Duration::ZERO, counting_body(&count))
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(s.state(), SchedulerState::Running);
    }

    #[tokio::test]
    async fn pause_and_resume_require_start() {
        let s = Scheduler::new();
        assert!(s.pause().unwrap_err().is_configuration());
        assert!(s.resume().unwrap_err().is_configuration());
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[test]
    fn start_outside_runtime_is_error() {
        let s = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let err = s
            .start(Duration::from_secs(1), Duration::ZERO, counting_body(&count))
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn fires_on_fixed_delay() {
        let s = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        s.start(Duration::from_secs(10), Duration::ZERO, counting_body(&count))
            .unwrap();

        // Firings at t = 0, 10, 20.
        advance(25).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn honours_initial_delay() {
        let s = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        s.start(Duration::from_secs(10), Duration::from_secs(30), counting_body(&count))
            .unwrap();

        advance(29).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        advance(2).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn bodies_never_overlap() {
        let s = Scheduler::new();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        let (a, p, r) = (Arc::clone(&active), Arc::clone(&peak), Arc::clone(&runs));
        s.start(Duration::from_secs(10), Duration::ZERO, move || {
            let (a, p, r) = (Arc::clone(&a), Arc::clone(&p), Arc::clone(&r));
            async move {
                let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                p.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(4)).await;
                a.fetch_sub(1, Ordering::SeqCst);
                r.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

        // Bodies start at t = 0, 14, 28 and each takes 4s.
        advance(33).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_skips_cycles_and_resume_restores_them() {
        let s = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        s.start(Duration::from_secs(10), Duration::from_secs(5), counting_body(&count))
            .unwrap();
        s.pause().unwrap();
        assert_eq!(s.state(), SchedulerState::Paused);

        // Firings at t = 5, 15, 25 are skipped.
        advance(30).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        s.resume().unwrap();
        assert_eq!(s.state(), SchedulerState::Running);
        advance(10).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_toggles_are_noops() {
        let s = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        s.start(Duration::from_secs(60), Duration::from_secs(60), counting_body(&count))
            .unwrap();
        s.resume().unwrap();
        assert_eq!(s.state(), SchedulerState::Running);
        s.pause().unwrap();
        s.pause().unwrap();
        assert_eq!(s.state(), SchedulerState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_body_ends_in_idle_and_can_restart() {
        let s = Scheduler::new();
        s.start(Duration::from_secs(10), Duration::ZERO, || async {
            panic!("cycle body blew up");
        })
        .unwrap();
        advance(1).await;
        assert_eq!(s.state(), SchedulerState::Idle);
        assert!(s.pause().unwrap_err().is_configuration());

        let count = Arc::new(AtomicUsize::new(0));
        s.start(Duration::from_secs(10), Duration::ZERO, counting_body(&count))
            .unwrap();
        advance(1).await;
        assert_eq!(s.state(), SchedulerState::Running);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_timer() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let s = Scheduler::new();
            s.start(Duration::from_secs(10), Duration::ZERO, counting_body(&count))
                .unwrap();
            advance(5).await;
        }
        let before = count.load(Ordering::SeqCst);
        advance(60).await;
        assert_eq!(count.load(Ordering::SeqCst), before);
    }
}
