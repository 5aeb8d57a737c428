use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A recorded answer to one survey step. The variant follows the step kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum AnswerValue {
    Text(String),
    Choice(String),
    /// Selected option values; order is not meaningful.
    MultiChoice(BTreeSet<String>),
    Scale(i64),
}

impl AnswerValue {
    /// Whether the answer carries any content. Blank text and empty
    /// selections count as unanswered.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) | AnswerValue::Choice(s) => s.trim().is_empty(),
            AnswerValue::MultiChoice(set) => set.is_empty(),
            AnswerValue::Scale(_) => false,
        }
    }

    /// Human-readable rendering used in prompts.
    pub fn render(&self) -> String {
        match self {
            AnswerValue::Text(s) | AnswerValue::Choice(s) => s.trim().to_string(),
            AnswerValue::MultiChoice(set) => set.iter().cloned().collect::<Vec<_>>().join(", "),
            AnswerValue::Scale(n) => n.to_string(),
        }
    }
}

/// One answered step, carried in survey order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmittedAnswer {
    pub step_id: String,
    pub prompt: String,
    pub value: AnswerValue,
}

/// A completed survey handed to triage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurveySubmission {
    pub survey_id: String,
    pub actor_id: String,
    /// Free-text chief complaint, when the survey designates one.
    pub chief_complaint: Option<String>,
    pub answers: Vec<SubmittedAnswer>,
    pub submitted_at: jiff::Timestamp,
}

impl SurveySubmission {
    pub fn answer(&self, step_id: &str) -> Option<&AnswerValue> {
        self.answers
            .iter()
            .find(|a| a.step_id == step_id)
            .map(|a| &a.value)
    }
}
