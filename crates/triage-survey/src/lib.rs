//! triage-survey
//!
//! Structured interview definitions and the per-actor survey state machine.
//! Definitions are static data loaded once into a [`registry::SurveyRegistry`];
//! the [`orchestrator::SurveyOrchestrator`] walks an actor through one
//! survey at a time and hands back a submission on completion.

pub mod definition;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod session;
pub mod surveys;
