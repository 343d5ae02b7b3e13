//! Navigation intent coordinator.
//!
//! The only place where explicit navigation and ambient scroll-spy writes
//! meet. Requesting a navigation, synchronously and in this order:
//!
//! 1. bumps the generation counter (older intents become inert)
//! 2. cancels the previous intent
//! 3. opens the suppression window for `budget + grace`
//!
//! and only then hands the intent to the executor. When the executor is
//! done, the window is closed, unless a newer intent has re-opened it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::{Executor, NavOptions, NavigationIntent, Outcome, SuppressionReader, SuppressionWindow};
use crate::address::Address;

/// Default extra time the suppression window stays open past the retry budget.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(150);

/// Arbitrates between navigation intents.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    executor: Executor,
    generation: Arc<AtomicU64>,
    active: Mutex<Option<Arc<NavigationIntent>>>,
    window: SuppressionWindow,
    grace: Duration,
}

impl Coordinator {
    pub fn new(executor: Executor) -> Self {
        Self::with_grace(executor, DEFAULT_GRACE)
    }

    pub fn with_grace(executor: Executor, grace: Duration) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                executor,
                generation: Arc::new(AtomicU64::new(0)),
                active: Mutex::new(None),
                window: SuppressionWindow::new(),
                grace,
            }),
        }
    }

    /// Read handle for the suppression window.
    pub fn suppression(&self) -> SuppressionReader {
        self.inner.window.reader()
    }

    /// Generation of the most recent intent (0 before the first one).
    pub fn current_generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Check if an intent is still running.
    pub fn is_navigating(&self) -> bool {
        self.inner
            .active
            .lock()
            .as_ref()
            .is_some_and(|intent| intent.is_live() && !intent.state().is_terminal())
    }

    /// The most recent intent, if it has not finished.
    pub fn active_intent(&self) -> Option<Arc<NavigationIntent>> {
        self.inner.active.lock().clone()
    }

    /// Request a navigation and run it in the background.
    ///
    /// Supersession and the suppression window take effect before this
    /// returns; only the retry loop runs on the spawned task.
    pub fn request_navigation(&self, address: Address, options: NavOptions) -> JoinHandle<Outcome> {
        let intent = self.begin(address, options);
        let this = self.clone();
        tokio::spawn(async move { this.drive(&intent).await })
    }

    /// Request a navigation and wait for it.
    pub async fn navigate(&self, address: Address, options: NavOptions) -> Outcome {
        let intent = self.begin(address, options);
        self.drive(&intent).await
    }

    fn begin(&self, address: Address, options: NavOptions) -> Arc<NavigationIntent> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let intent = Arc::new(NavigationIntent::new(
            address,
            options,
            generation,
            Arc::clone(&self.inner.generation),
        ));

        if let Some(previous) = self.inner.active.lock().replace(Arc::clone(&intent)) {
            previous.cancel();
            crate::debug!("nav"; "intent #{} superseded by #{}", previous.generation(), generation);
        }

        let window = options.budget().saturating_add(self.inner.grace);
        self.inner.window.open(generation, window);
        crate::debug!("nav"; "intent #{} -> {} (window {}ms)",
            generation, intent.address(), window.as_millis());

        intent
    }

    async fn drive(&self, intent: &Arc<NavigationIntent>) -> Outcome {
        let outcome = self.inner.executor.execute(intent).await;
        self.finish(intent, outcome);
        outcome
    }

    fn finish(&self, intent: &Arc<NavigationIntent>, outcome: Outcome) {
        let generation = intent.generation();

        match outcome {
            Outcome::Succeeded { attempts } => {
                crate::debug!("nav"; "intent #{} reached {} ({} lookups)",
                    generation, intent.address(), attempts);
            }
            Outcome::Exhausted { attempts } => {
                crate::log!("warning"; "section `{}` not found on {} after {} attempts",
                    intent.address().section().unwrap_or_default(),
                    intent.address().page_path(),
                    attempts);
            }
            Outcome::Superseded => {
                crate::debug!("nav"; "intent #{} dropped", generation);
                return;
            }
        }

        if !self.inner.window.close(generation) {
            crate::debug!("nav"; "window owned by a newer intent, left open");
        }

        let mut active = self.inner.active.lock();
        if active.as_ref().is_some_and(|a| Arc::ptr_eq(a, intent)) {
            *active = None;
        }
    }
}
