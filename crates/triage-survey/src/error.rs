use thiserror::Error;

use triage_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("unknown survey: {0}")]
    UnknownSurvey(String),

    #[error("invalid survey definition '{survey_id}': {message}")]
    InvalidDefinition { survey_id: String, message: String },

    #[error("no survey in progress for actor {0}")]
    NoActiveSession(String),

    #[error("answer is for step '{got}' but the current step is '{expected}'")]
    StepMismatch { expected: String, got: String },

    #[error("step '{step_id}' expects a {expected} answer")]
    KindMismatch {
        step_id: String,
        expected: &'static str,
    },

    #[error("'{value}' is not an option of step '{step_id}'")]
    UnknownOption { step_id: String, value: String },

    #[error("step '{step_id}': {value} is outside range [{min}, {max}]")]
    OutOfRange {
        step_id: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("step '{step_id}' requires an answer")]
    MissingRequiredAnswer { step_id: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
