use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::SurveyError;

/// A selectable option of a choice step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChoiceOption {
    /// Stored in answers.
    pub value: String,
    /// Shown to the patient.
    pub label: String,
}

/// What kind of input a step takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum StepKind {
    FreeText,
    SingleChoice { options: Vec<ChoiceOption> },
    MultiChoice { options: Vec<ChoiceOption> },
    /// Integer answer in the closed range `[min, max]`.
    Scale { min: i64, max: i64 },
}

impl StepKind {
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::FreeText => "free text",
            StepKind::SingleChoice { .. } => "single choice",
            StepKind::MultiChoice { .. } => "multi choice",
            StepKind::Scale { .. } => "numeric scale",
        }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            StepKind::SingleChoice { options } | StepKind::MultiChoice { options } => options,
            StepKind::FreeText | StepKind::Scale { .. } => &[],
        }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options().iter().any(|o| o.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurveyStep {
    pub id: String,
    pub kind: StepKind,
    pub prompt: String,
    pub required: bool,
}

/// An ordered interview. Static configuration, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurveyDefinition {
    pub id: String,
    pub title: String,
    pub steps: Vec<SurveyStep>,
    /// Free-text step whose answer becomes the submission's chief complaint.
    pub chief_complaint_step: Option<String>,
}

impl SurveyDefinition {
    pub fn step(&self, id: &str) -> Option<&SurveyStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Structural checks run when a definition is registered.
    pub fn validate(&self) -> Result<(), SurveyError> {
        let invalid = |message: String| SurveyError::InvalidDefinition {
            survey_id: self.id.clone(),
            message,
        };

        if self.steps.is_empty() {
            return Err(invalid("survey has no steps".to_string()));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(invalid(format!("duplicate step id '{}'", step.id)));
            }
            match &step.kind {
                StepKind::SingleChoice { options } | StepKind::MultiChoice { options }
                    if options.is_empty() =>
                {
                    return Err(invalid(format!("choice step '{}' has no options", step.id)));
                }
                StepKind::Scale { min, max } if min > max => {
                    return Err(invalid(format!(
                        "scale step '{}' has min {min} above max {max}",
                        step.id
                    )));
                }
                _ => {}
            }
        }

        if let Some(id) = &self.chief_complaint_step {
            match self.step(id) {
                Some(step) if step.kind == StepKind::FreeText => {}
                Some(_) => return Err(invalid(format!("chief complaint step '{id}' is not free text"))),
                None => return Err(invalid(format!("chief complaint step '{id}' does not exist"))),
            }
        }

        Ok(())
    }
}

/// Shorthand used by the built-in definitions.
pub(crate) fn choices(pairs: &[(&str, &str)]) -> Vec<ChoiceOption> {
    pairs
        .iter()
        .map(|(value, label)| ChoiceOption {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect()
}

pub(crate) fn step(id: &str, kind: StepKind, prompt: &str, required: bool) -> SurveyStep {
    SurveyStep {
        id: id.to_string(),
        kind,
        prompt: prompt.to_string(),
        required,
    }
}
