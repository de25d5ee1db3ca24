// Bookkeeping for in-flight article fetches and the periodic refresh
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Monotonic id handed out per fetch. Higher means newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

/// Makes sure only the newest fetch gets to touch list state
///
/// Starting a fetch aborts the one before it. A completion whose token isn't
/// the latest is reported stale, which also covers a task that sent its
/// result just before it was aborted.
#[derive(Debug, Default)]
pub struct FetchTracker {
    latest: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is running and issue a fresh token
    pub fn begin(&mut self) -> FetchToken {
        self.cancel();
        self.latest += 1;
        FetchToken(self.latest)
    }

    /// Remember the task for the most recent `begin`
    pub fn attach(&mut self, handle: JoinHandle<()>) {
        self.in_flight = Some(handle);
    }

    /// True if `token` is the newest one; the caller may then apply it
    pub fn complete(&mut self, token: FetchToken) -> bool {
        if self.is_current(token) {
            self.in_flight = None;
            true
        } else {
            debug!("Ignoring stale fetch {:?} (latest is {})", token, self.latest);
            false
        }
    }

    pub fn is_current(&self, token: FetchToken) -> bool {
        token.0 == self.latest
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for FetchTracker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Fires `on_tick` every `period` until dropped, or until `on_tick`
/// returns false. The first tick comes one full period after start.
#[derive(Debug)]
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                debug!("Refresh timer fired");
                if !on_tick() {
                    break;
                }
            }
        });

        Self { handle }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_tokens_increase_and_only_latest_completes() {
        let mut tracker = FetchTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(second > first);
        assert!(!tracker.complete(first));
        assert!(tracker.complete(second));
    }

    // Spawns a task that never finishes on its own; the receiver resolves
    // once the task is dropped
    fn parked_task() -> (JoinHandle<()>, tokio::sync::oneshot::Receiver<()>) {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _tx = tx;
            std::future::pending::<()>().await;
        });
        (handle, rx)
    }

    #[tokio::test]
    async fn test_begin_aborts_previous_task() {
        let mut tracker = FetchTracker::new();
        tracker.begin();
        let (handle, dropped) = parked_task();
        tracker.attach(handle);
        assert!(tracker.is_loading());

        tracker.begin();
        assert!(!tracker.is_loading());
        let closed = tokio::time::timeout(Duration::from_secs(5), dropped).await;
        assert!(matches!(closed, Ok(Err(_))));
    }

    #[tokio::test]
    async fn test_drop_aborts_in_flight() {
        let mut tracker = FetchTracker::new();
        tracker.begin();
        let (handle, dropped) = parked_task();
        tracker.attach(handle);

        drop(tracker);
        let closed = tokio::time::timeout(Duration::from_secs(5), dropped).await;
        assert!(matches!(closed, Ok(Err(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_each_period() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ticks);
        let timer = RefreshTimer::start(Duration::from_secs(60), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        drop(timer);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_stops_when_callback_says_so() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ticks);
        let _timer = RefreshTimer::start(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst) < 2
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }
}
