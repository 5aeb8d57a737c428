//! triage-cli library root.
//!
//! Exposes the config, AWS wiring and interview parsing so integration
//! tests can exercise them without a terminal.

pub mod aws;
pub mod config;
pub mod interview;
