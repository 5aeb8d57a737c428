use std::time::Duration;

use thiserror::Error;

/// Every way a completion attempt can fail. Returned, never panicked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("provider returned an empty completion")]
    EmptyResponse,
}

impl GatewayFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayFailure::Timeout(_))
    }
}
