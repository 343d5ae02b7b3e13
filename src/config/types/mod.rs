//! Configuration utility types.
//!
//! | Module  | Purpose                                  |
//! |---------|------------------------------------------|
//! | `error` | `ConfigError` and collected diagnostics  |
//! | `field` | Field paths tagging each diagnostic      |

mod error;
mod field;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use field::FieldPath;
