//! Command-line interface module.

mod args;
pub mod fingerprint;
pub mod publish;

pub use args::{Cli, Commands, FingerprintArgs, PublishArgs};
