use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use photodrop_core::{ExpiryTask, ExpiryTimer};

struct Pending {
    due: Duration,
    seq: u64,
    task: ExpiryTask,
}

#[derive(Default)]
struct ManualState {
    elapsed: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

/// A virtual clock. Scheduled tasks run only from [`ManualTimer::advance`], in due order.
#[derive(Default)]
pub struct ManualTimer {
    state: Mutex<ManualState>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Number of tasks not yet fired.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move the clock forward, running every task that comes due. Returns how many ran.
    ///
    /// Tasks run outside the internal lock, so they may schedule more work; anything
    /// they schedule that falls due within the same advance also runs.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().elapsed + by;
        let mut fired = 0;

        loop {
            let next = {
                let mut state = self.lock();
                let idx = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);
                idx.map(|i| {
                    let pending = state.pending.swap_remove(i);
                    state.elapsed = pending.due;
                    pending.task
                })
            };

            match next {
                Some(task) => {
                    task();
                    fired += 1;
                }
                None => break,
            }
        }

        self.lock().elapsed = target;
        fired
    }
}

impl ExpiryTimer for ManualTimer {
    fn schedule(&self, delay: Duration, task: ExpiryTask) {
        let mut state = self.lock();
        let due = state.elapsed + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push(Pending { due, seq, task });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> ExpiryTask) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |label: &'static str| -> ExpiryTask {
            let sink = Arc::clone(&sink);
            Box::new(move || sink.lock().unwrap().push(label))
        };
        (log, make)
    }

    #[test]
    fn fires_only_when_due() {
        let timer = ManualTimer::new();
        let (log, task) = recorder();

        timer.schedule(Duration::from_secs(15), task("album"));
        assert_eq!(timer.advance(Duration::from_millis(14_999)), 0);
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(timer.advance(Duration::from_millis(1)), 1);
        assert_eq!(*log.lock().unwrap(), vec!["album"]);
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn fires_in_due_order() {
        let timer = ManualTimer::new();
        let (log, task) = recorder();

        timer.schedule(Duration::from_secs(10), task("late"));
        timer.schedule(Duration::from_secs(5), task("early"));
        timer.schedule(Duration::from_secs(5), task("early-second"));

        assert_eq!(timer.advance(Duration::from_secs(20)), 3);
        assert_eq!(*log.lock().unwrap(), vec!["early", "early-second", "late"]);
        assert_eq!(timer.elapsed(), Duration::from_secs(20));
    }

    #[test]
    fn delay_is_relative_to_current_virtual_time() {
        let timer = ManualTimer::new();
        let (log, task) = recorder();

        timer.advance(Duration::from_secs(100));
        timer.schedule(Duration::from_secs(15), task("x"));

        assert_eq!(timer.advance(Duration::from_secs(14)), 0);
        assert_eq!(timer.advance(Duration::from_secs(1)), 1);
        assert_eq!(log.lock().unwrap().len(), 1);
    }
}
