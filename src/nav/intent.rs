//! Navigation intents and their lifecycle.
//!
//! ```text
//! Requested --> Locating(1) --> Locating(2) --> ... --> Succeeded
//!     |             |               |                   Exhausted
//!     +-------------+---------------+-----------------> Superseded
//! ```
//!
//! `Superseded` is reachable from every non-terminal state the moment a
//! newer intent is requested. Liveness is checked before every side effect.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use super::NavOptions;
use crate::address::Address;

/// Lifecycle state of one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum IntentState {
    Requested,
    /// Looking for the target element (1-based attempt).
    Locating { attempt: u32 },
    Succeeded,
    Exhausted,
    Superseded,
}

impl IntentState {
    /// True for `Succeeded`, `Exhausted` and `Superseded`.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Exhausted | Self::Superseded)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Locating { .. } => "locating",
            Self::Succeeded => "succeeded",
            Self::Exhausted => "exhausted",
            Self::Superseded => "superseded",
        }
    }
}

/// How a navigation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    /// Target reached after `attempts` lookups (0 when no lookup was needed).
    Succeeded { attempts: u32 },
    /// Target never mounted; `attempts` lookups were made.
    Exhausted { attempts: u32 },
    /// A newer intent took over.
    Superseded,
}

impl Outcome {
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Terminal intent state matching this outcome.
    pub const fn state(&self) -> IntentState {
        match self {
            Self::Succeeded { .. } => IntentState::Succeeded,
            Self::Exhausted { .. } => IntentState::Exhausted,
            Self::Superseded => IntentState::Superseded,
        }
    }
}

/// One requested navigation.
///
/// Created by the coordinator, driven by the executor. It stays live while
/// its generation is the coordinator's current one and nobody cancelled it.
#[derive(Debug)]
pub struct NavigationIntent {
    address: Address,
    options: NavOptions,
    generation: u64,
    cancelled: AtomicBool,
    /// Coordinator's generation counter (shared).
    current: Arc<AtomicU64>,
    state: Mutex<IntentState>,
}

impl NavigationIntent {
    pub(crate) fn new(
        address: Address,
        options: NavOptions,
        generation: u64,
        current: Arc<AtomicU64>,
    ) -> Self {
        Self {
            address,
            options,
            generation,
            cancelled: AtomicBool::new(false),
            current,
            state: Mutex::new(IntentState::Requested),
        }
    }

    /// Standalone intent, not tied to a coordinator.
    pub fn detached(address: Address, options: NavOptions) -> Self {
        Self::new(address, options, 1, Arc::new(AtomicU64::new(1)))
    }

    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }

    #[inline]
    pub fn options(&self) -> &NavOptions {
        &self.options
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark as superseded. Pending timers still fire but do nothing.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether this intent may still cause side effects.
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
            && self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Current lifecycle state.
    pub fn state(&self) -> IntentState {
        *self.state.lock()
    }

    /// Move to `next`. Terminal states are final.
    pub(crate) fn transition(&self, next: IntentState) {
        let mut state = self.state.lock();
        if state.is_terminal() {
            return;
        }
        crate::debug!("nav"; "intent #{} {} -> {}", self.generation, state.label(), next.label());
        *state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_intent_is_live() {
        let intent = NavigationIntent::detached(Address::home(), NavOptions::default());
        assert!(intent.is_live());
        assert_eq!(intent.state(), IntentState::Requested);
    }

    #[test]
    fn test_cancel_kills_intent() {
        let intent = NavigationIntent::detached(Address::home(), NavOptions::default());
        intent.cancel();
        assert!(!intent.is_live());
    }

    #[test]
    fn test_newer_generation_kills_intent() {
        let current = Arc::new(AtomicU64::new(3));
        let intent =
            NavigationIntent::new(Address::home(), NavOptions::default(), 3, current.clone());
        assert!(intent.is_live());

        current.store(4, Ordering::SeqCst);
        assert!(!intent.is_live());
    }

    #[test]
    fn test_terminal_state_is_final() {
        let intent = NavigationIntent::detached(Address::home(), NavOptions::default());
        intent.transition(IntentState::Locating { attempt: 1 });
        intent.transition(IntentState::Succeeded);
        intent.transition(IntentState::Superseded);
        assert_eq!(intent.state(), IntentState::Succeeded);
    }

    #[test]
    fn test_outcome_state() {
        assert!(Outcome::Succeeded { attempts: 2 }.is_success());
        assert!(!Outcome::Exhausted { attempts: 11 }.is_success());
        assert_eq!(Outcome::Superseded.state(), IntentState::Superseded);
        assert!(Outcome::Exhausted { attempts: 1 }.state().is_terminal());
    }
}
