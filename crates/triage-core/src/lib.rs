//! triage-core
//!
//! Pure domain types shared by every triage crate: severity, triage results,
//! risk assessments, survey submissions, patient profiles and emergency
//! events. No I/O and no provider dependency.

pub mod error;
pub mod models;
