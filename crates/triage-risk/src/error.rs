use thiserror::Error;

use triage_core::models::risk::RiskFamily;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    #[error("invalid features: {0}")]
    InvalidFeatures(String),

    #[error("scoring task for {family} failed: {message}")]
    TaskFailed { family: RiskFamily, message: String },
}
