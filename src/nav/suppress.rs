//! Suppression window - keeps scroll-spy quiet during explicit navigation.
//!
//! One writer, many readers:
//!
//! ```text
//! Coordinator --owns--> SuppressionWindow --reader()--> SuppressionReader --> ScrollSpy
//! ```
//!
//! The window is tagged with the generation that opened it, so a stale
//! intent finishing late cannot close a window a newer intent still needs.
//! It also expires on its own, bounding the damage of an intent that never
//! reports back.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Expiry used when `now + duration` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Default)]
struct WindowState {
    /// Generation that opened the window (0 = never opened).
    owner: u64,
    /// Expiry; `None` when closed.
    until: Option<Instant>,
}

/// Writer half. Not `Clone`: only the coordinator holds it.
#[derive(Debug, Default)]
pub struct SuppressionWindow {
    state: Arc<Mutex<WindowState>>,
}

/// Read-only handle handed to observers.
#[derive(Debug, Clone)]
pub struct SuppressionReader {
    state: Arc<Mutex<WindowState>>,
}

impl SuppressionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a read handle.
    pub fn reader(&self) -> SuppressionReader {
        SuppressionReader {
            state: Arc::clone(&self.state),
        }
    }

    /// Open (or re-open) the window for `generation`, lasting `duration`.
    pub fn open(&self, generation: u64, duration: Duration) {
        let mut state = self.state.lock();
        state.owner = generation;
        let now = Instant::now();
        state.until = Some(
            now.checked_add(duration)
                .unwrap_or_else(|| now + FAR_FUTURE),
        );
    }

    /// Close the window if `generation` still owns it.
    ///
    /// Returns false when a newer generation owns the window.
    pub fn close(&self, generation: u64) -> bool {
        let mut state = self.state.lock();
        if state.owner != generation {
            return false;
        }
        state.until = None;
        true
    }

    /// Generation that last opened the window.
    pub fn owner(&self) -> u64 {
        self.state.lock().owner
    }
}

impl SuppressionReader {
    /// Check if scroll-spy writes are currently suppressed.
    pub fn is_active(&self) -> bool {
        self.state
            .lock()
            .until
            .is_some_and(|until| Instant::now() < until)
    }

    /// Time left before the window expires on its own.
    pub fn remaining(&self) -> Option<Duration> {
        let until = self.state.lock().until?;
        let now = Instant::now();
        (now < until).then(|| until - now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_open_and_close() {
        let window = SuppressionWindow::new();
        let reader = window.reader();
        assert!(!reader.is_active());

        window.open(1, Duration::from_secs(1));
        assert!(reader.is_active());

        assert!(window.close(1));
        assert!(!reader.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_cannot_close() {
        let window = SuppressionWindow::new();
        let reader = window.reader();

        window.open(1, Duration::from_secs(1));
        window.open(2, Duration::from_secs(1));

        assert!(!window.close(1));
        assert!(reader.is_active());
        assert!(window.close(2));
        assert!(!reader.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expires() {
        let window = SuppressionWindow::new();
        let reader = window.reader();

        window.open(1, Duration::from_millis(300));
        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(reader.is_active());
        assert_eq!(reader.remaining(), Some(Duration::from_millis(100)));

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!reader.is_active());
        assert_eq!(reader.remaining(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_with_unbounded_duration() {
        let window = SuppressionWindow::new();
        let reader = window.reader();

        window.open(1, Duration::MAX);
        assert!(reader.is_active());
        assert!(reader.remaining().is_some_and(|left| left > Duration::from_secs(86_400)));
        assert!(window.close(1));
    }
}
