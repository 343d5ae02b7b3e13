//! Command-line interface module.

mod args;
pub mod check;
pub mod decode;
pub mod init;
pub mod simulate;

pub use args::{Cli, Commands};
