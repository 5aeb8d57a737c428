use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EscalationError {
    #[error("listener failed: {0}")]
    Listener(String),

    #[error("no subscribers for {0}")]
    NoSubscribers(&'static str),

    #[error("hospital lookup failed: {0}")]
    Lookup(String),

    #[error("listener task panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error("survey '{0}' is not a risk screening")]
    NotRiskScreening(String),

    #[error("missing answer for '{0}'")]
    MissingAnswer(&'static str),
}
