use std::time::Duration;

use photodrop_core::{ExpiryTask, ExpiryTimer};
use tokio::runtime::Handle;
use tracing::trace;

/// Runs each task on a Tokio runtime after its delay elapses.
///
/// The runtime handle is captured at construction, so `schedule` works from
/// any thread, including ones that are not part of the runtime.
#[derive(Debug, Clone)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    /// Bind to the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime. Use [`TokioTimer::with_handle`]
    /// to bind to an explicit runtime instead.
    pub fn new() -> Self {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl ExpiryTimer for TokioTimer {
    fn schedule(&self, delay: Duration, task: ExpiryTask) {
        trace!(delay_ms = delay.as_millis() as u64, "Expiry task scheduled");
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        TokioTimer::new().schedule(
            Duration::from_secs(15),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        tokio::time::sleep(Duration::from_secs(14)).await;
        tokio::task::yield_now().await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn schedules_from_thread_outside_runtime() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let timer = TokioTimer::with_handle(rt.handle().clone());

        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        std::thread::spawn(move || {
            timer.schedule(
                Duration::from_secs(15),
                Box::new(move || flag.store(true, Ordering::SeqCst)),
            );
        })
        .join()
        .unwrap();

        rt.block_on(async {
            tokio::time::sleep(Duration::from_secs(16)).await;
            tokio::task::yield_now().await;
        });
        assert!(fired.load(Ordering::SeqCst));
    }
}
