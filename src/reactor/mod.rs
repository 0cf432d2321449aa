//! Debounced Reactor — converts a rapid edit stream into a bounded-rate
//! action stream.
//!
//! A [`Debouncer`] fires its action once per quiescence window, trailing
//! edge: every signal restarts the pending timer, and when signals stop for
//! at least the window, exactly one fire occurs with the most recently
//! signalled state. Intermediate states are overwritten, never delivered.
//!
//! Timer restart and fire share one mutual-exclusion point (the internal
//! mutex), which is what preserves last-write-wins on a multi-threaded
//! host.
//!
//! ## Example
//!
//! ```
//! use std::sync::mpsc;
//! use std::time::Duration;
//! use codepod::reactor::Debouncer;
//!
//! let (tx, rx) = mpsc::channel();
//! let debouncer = Debouncer::new(Duration::from_millis(20), move |state: String| {
//!     tx.send(state).unwrap();
//! });
//!
//! debouncer.signal("a".to_string());
//! debouncer.signal("b".to_string());
//! // Only the trailing state arrives.
//! assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), "b");
//! debouncer.cancel();
//! ```

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

struct Pending<T> {
    latest: Option<T>,
    deadline: Option<Instant>,
    stopped: bool,
}

struct Shared<T> {
    state: Mutex<Pending<T>>,
    wake: Condvar,
}

/// Trailing-edge debouncer with a single `quiescence_window` parameter.
///
/// Backed by one worker thread waiting on a `Mutex` + `Condvar`. The fired
/// action always receives the state observed at fire time, never an
/// overwritten intermediate. `cancel` (or drop) tears the worker down;
/// after it returns, no further fire can occur.
pub struct Debouncer<T: Send + 'static> {
    shared: Arc<Shared<T>>,
    window: Duration,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer firing `action` after `window` of quiescence.
    pub fn new<F>(window: Duration, action: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(Pending {
                latest: None,
                deadline: None,
                stopped: false,
            }),
            wake: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::spawn(move || run_worker(worker_shared, action));

        Debouncer {
            shared,
            window,
            worker: Some(worker),
        }
    }

    /// Record a new edit event, restarting the pending timer.
    ///
    /// The previous unfired state, if any, is overwritten. Signals after
    /// teardown are ignored.
    pub fn signal(&self, value: T) {
        let Ok(mut pending) = self.shared.state.lock() else {
            return;
        };
        if pending.stopped {
            return;
        }
        pending.latest = Some(value);
        pending.deadline = Some(Instant::now() + self.window);
        self.shared.wake.notify_one();
    }

    /// The configured quiescence window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Tear down: discard any pending state and stop the worker.
    ///
    /// Blocks until the worker has exited, so an in-flight fire finishes
    /// before this returns and nothing fires afterwards.
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Ok(mut pending) = self.shared.state.lock() {
            pending.stopped = true;
            pending.latest = None;
            pending.deadline = None;
            self.shared.wake.notify_one();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker<T, F>(shared: Arc<Shared<T>>, mut action: F)
where
    F: FnMut(T),
{
    let Ok(mut pending) = shared.state.lock() else {
        return;
    };
    loop {
        if pending.stopped {
            return;
        }
        match pending.deadline {
            None => {
                pending = match shared.wake.wait(pending) {
                    Ok(guard) => guard,
                    Err(_) => return,
                };
            }
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    let value = pending.latest.take();
                    pending.deadline = None;
                    drop(pending);
                    if let Some(value) = value {
                        action(value);
                    }
                    pending = match shared.state.lock() {
                        Ok(guard) => guard,
                        Err(_) => return,
                    };
                } else {
                    // A fresh signal pushes the deadline; re-check on wake.
                    pending = match shared.wake.wait_timeout(pending, deadline - now) {
                        Ok((guard, _)) => guard,
                        Err(_) => return,
                    };
                }
            }
        }
    }
}
