use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

// ---- Timer state machine ----

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerState<T> {
    Idle,
    Pending { deadline: Instant, args: T },
}

/// Cancel-and-reschedule timer holding the newest arguments.
///
/// Pure state: callers pass the current instant, which keeps it testable
/// without a runtime. `DebouncedPersister` drives it with tokio's clock.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    state: TimerState<T>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: TimerState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> &TimerState<T> {
        &self.state
    }

    /// Replace whatever is pending and restart the quiet window at `now`.
    pub fn request(&mut self, args: T, now: Instant) {
        self.state = TimerState::Pending {
            deadline: now + self.delay,
            args,
        };
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            TimerState::Pending { deadline, .. } => Some(deadline),
            TimerState::Idle => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, TimerState::Pending { .. })
    }

    /// Hand out the pending arguments once the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if deadline <= now => self.cancel(),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, TimerState::Idle) {
            TimerState::Pending { args, .. } => Some(args),
            TimerState::Idle => None,
        }
    }
}

// ---- Async driver ----

struct Shared<T> {
    timer: Mutex<Debouncer<T>>,
    wake: Notify,
}

/// Runs an async action with the newest requested arguments once requests stop
/// arriving for `delay`.
///
/// Actions never overlap: the driver awaits a running action before it looks at
/// the timer again, so a deadline that passed meanwhile fires right after with
/// whatever arguments are newest by then. `cancel` only clears the timer; an
/// action already running is left alone. Dropping the persister stops the
/// driver task.
pub struct DebouncedPersister<T> {
    shared: Arc<Shared<T>>,
    driver: JoinHandle<()>,
}

impl<T: Send + 'static> DebouncedPersister<T> {
    /// Spawn the driver on the current tokio runtime.
    pub fn spawn<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            timer: Mutex::new(Debouncer::new(delay)),
            wake: Notify::new(),
        });
        let driver = tokio::spawn(drive(Arc::clone(&shared), action));
        Self { shared, driver }
    }

    pub fn request(&self, args: T) {
        self.shared
            .timer
            .lock()
            .expect("debounce timer mutex")
            .request(args, Instant::now());
        self.shared.wake.notify_one();
    }

    pub fn cancel(&self) -> Option<T> {
        let cancelled = self
            .shared
            .timer
            .lock()
            .expect("debounce timer mutex")
            .cancel();
        self.shared.wake.notify_one();
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.shared
            .timer
            .lock()
            .expect("debounce timer mutex")
            .is_pending()
    }

    pub fn delay(&self) -> Duration {
        self.shared.timer.lock().expect("debounce timer mutex").delay()
    }
}

impl<T> Drop for DebouncedPersister<T> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive<T, F, Fut>(shared: Arc<Shared<T>>, action: F)
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        let deadline = shared.timer.lock().expect("debounce timer mutex").deadline();
        let Some(deadline) = deadline else {
            shared.wake.notified().await;
            continue;
        };

        tokio::select! {
            _ = sleep_until(deadline) => {
                let due = shared
                    .timer
                    .lock()
                    .expect("debounce timer mutex")
                    .take_due(Instant::now());
                if let Some(args) = due {
                    let run = action(args);
                    run.await;
                }
            }
            // A new request or a cancel moved the deadline; look again.
            _ = shared.wake.notified() => {}
        }
    }
}
