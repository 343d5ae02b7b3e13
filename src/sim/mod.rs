//! Navigation scenario replay.
//!
//! # Module Structure
//!
//! - [`scenario`]: scenario file format (layouts + steps)
//! - [`driver`]: replay loop and host event pump
//! - [`report`]: final state, JSON and terminal rendering

pub mod driver;
pub mod report;
pub mod scenario;

pub use driver::{replay, run};
pub use report::{NavRecord, Report};
pub use scenario::{Scenario, ScenarioError, Step};

#[cfg(test)]
mod tests;
