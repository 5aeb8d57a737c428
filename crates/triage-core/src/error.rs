use thiserror::Error;

use crate::models::severity::SeverityLevel;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unrecognized severity: {0}")]
    UnknownSeverity(String),

    #[error("unrecognized urgency: {0}")]
    UnknownUrgency(String),

    #[error("emergency events require Red severity, got {0}")]
    NotAnEmergency(SeverityLevel),
}
