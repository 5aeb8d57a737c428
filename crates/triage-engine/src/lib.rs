//! triage-engine
//!
//! Triage decisions and emergency escalation. Combines the completion
//! gateway, the response contract and rule-based risk scores into one
//! severity decision, and fans Red decisions out to escalation listeners
//! exactly once per alert window.

pub mod audit;
pub mod contract;
pub mod decision;
pub mod error;
pub mod escalation;
pub mod followup;
pub mod hospital;
pub mod intake;
pub mod listeners;
pub mod prompt;
