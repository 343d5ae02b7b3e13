//! Navigation engine.
//!
//! # Module Structure
//!
//! - `options` - per-navigation retry/offset settings
//! - `intent` - navigation intents, lifecycle states and outcomes
//! - `suppress` - suppression window (writer) and its readers
//! - `executor` - page switch + retrying scroll
//! - `spy` - scroll-spy rewriting the fragment
//! - `coordinator` - supersession and suppression ownership
//! - `navigator` - facade for link-like components
//!
//! # Concurrency
//!
//! Designed for a single-threaded event loop (tokio current-thread runtime).
//! Retry delays are `tokio::time::sleep`s; superseded intents are not
//! aborted, they wake up, notice a newer generation and stop. Locks are
//! never held across an `.await` or a capability call.

mod coordinator;
mod executor;
mod intent;
mod navigator;
mod options;
mod spy;
mod suppress;

pub use coordinator::{Coordinator, DEFAULT_GRACE};
pub use executor::Executor;
pub use intent::{IntentState, NavigationIntent, Outcome};
pub use navigator::Navigator;
pub use options::NavOptions;
pub use spy::{ObservedSection, ScrollSpy};
pub use suppress::{SuppressionReader, SuppressionWindow};
