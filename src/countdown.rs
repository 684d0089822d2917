// Redirect countdown shown after a successful verification. The worker
// thread is owned by the `Countdown` guard: dropping the guard cancels and
// joins it, so no tick arrives after the owning screen is gone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds left before the redirect.
    Remaining(u64),
    Done,
}

pub struct Countdown {
    rx: Receiver<Tick>,
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Report `seconds`, `seconds - 1`, ..., `1`, one `period` apart, then
    /// `Done` one period after the last tick.
    pub fn start(seconds: u64, period: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let worker = thread::spawn(move || {
            for remaining in (1..=seconds).rev() {
                if flag.load(Ordering::SeqCst) || tx.send(Tick::Remaining(remaining)).is_err() {
                    return;
                }
                sleep_unless_cancelled(period, &flag);
            }
            if !flag.load(Ordering::SeqCst) {
                let _ = tx.send(Tick::Done);
            }
        });
        Countdown {
            rx,
            cancelled,
            worker: Some(worker),
        }
    }

    /// Block until the countdown ends. Returns `true` when it ran to
    /// completion, `false` when it was cancelled.
    pub fn wait(&self, mut on_tick: impl FnMut(u64)) -> bool {
        for tick in self.rx.iter() {
            match tick {
                Tick::Remaining(n) => on_tick(n),
                Tick::Done => return true,
            }
        }
        false
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(worker) = &self.worker {
            worker.thread().unpark();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                debug!("countdown worker panicked");
            }
        }
    }
}

fn sleep_unless_cancelled(period: Duration, cancelled: &AtomicBool) {
    let deadline = Instant::now() + period;
    loop {
        if cancelled.load(Ordering::SeqCst) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        // park may wake spuriously; the loop re-checks both conditions
        thread::park_timeout(deadline - now);
    }
}
