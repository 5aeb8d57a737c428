use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use triage_core::models::submission::{AnswerValue, SubmittedAnswer, SurveySubmission};

use crate::definition::{StepKind, SurveyDefinition, SurveyStep};
use crate::error::SurveyError;

/// Result of a successful [`SurveySession::next`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the step at this index.
    Moved { step_index: usize },
    /// The last step was accepted; the survey is finished.
    Completed(SurveySubmission),
}

/// One actor's walk through a survey.
#[derive(Debug, Clone)]
pub struct SurveySession {
    definition: Arc<SurveyDefinition>,
    actor_id: String,
    step_index: usize,
    answers: BTreeMap<String, AnswerValue>,
    completed: bool,
    started_at: jiff::Timestamp,
}

/// Serializable form of an in-progress session. The definition is stored by
/// id and resolved again through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub survey_id: String,
    pub actor_id: String,
    pub step_index: usize,
    pub answers: BTreeMap<String, AnswerValue>,
    pub started_at: jiff::Timestamp,
}

impl SurveySession {
    pub fn new(definition: Arc<SurveyDefinition>, actor_id: impl Into<String>) -> Self {
        Self {
            definition,
            actor_id: actor_id.into(),
            step_index: 0,
            answers: BTreeMap::new(),
            completed: false,
            started_at: jiff::Timestamp::now(),
        }
    }

    pub fn definition(&self) -> &SurveyDefinition {
        &self.definition
    }

    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn answers(&self) -> &BTreeMap<String, AnswerValue> {
        &self.answers
    }

    pub fn current_step(&self) -> &SurveyStep {
        &self.definition.steps[self.step_index]
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 == self.definition.steps.len()
    }

    /// Record an answer for the current step. Does not advance.
    pub fn answer(&mut self, step_id: &str, value: AnswerValue) -> Result<(), SurveyError> {
        let step = self.current_step();
        if step.id != step_id {
            return Err(SurveyError::StepMismatch {
                expected: step.id.clone(),
                got: step_id.to_string(),
            });
        }

        check_answer(step, &value)?;
        self.answers.insert(step_id.to_string(), value);
        Ok(())
    }

    /// Validate the current step and move forward, or complete on the last
    /// step. A rejected move leaves the session untouched.
    pub fn next(&mut self) -> Result<Advance, SurveyError> {
        let step = self.current_step();
        let answered = self
            .answers
            .get(&step.id)
            .is_some_and(|value| !value.is_blank());
        if step.required && !answered {
            return Err(SurveyError::MissingRequiredAnswer {
                step_id: step.id.clone(),
            });
        }

        if self.is_last_step() {
            self.completed = true;
            return Ok(Advance::Completed(self.submission()));
        }

        self.step_index += 1;
        Ok(Advance::Moved {
            step_index: self.step_index,
        })
    }

    /// Step back one. No-op on the first step.
    pub fn previous(&mut self) -> usize {
        self.step_index = self.step_index.saturating_sub(1);
        self.step_index
    }

    fn submission(&self) -> SurveySubmission {
        let answers = self
            .definition
            .steps
            .iter()
            .filter_map(|step| {
                self.answers
                    .get(&step.id)
                    .filter(|value| !value.is_blank())
                    .map(|value| SubmittedAnswer {
                        step_id: step.id.clone(),
                        prompt: step.prompt.clone(),
                        value: value.clone(),
                    })
            })
            .collect();

        let chief_complaint = self
            .definition
            .chief_complaint_step
            .as_ref()
            .and_then(|id| self.answers.get(id))
            .filter(|value| !value.is_blank())
            .map(AnswerValue::render);

        SurveySubmission {
            survey_id: self.definition.id.clone(),
            actor_id: self.actor_id.clone(),
            chief_complaint,
            answers,
            submitted_at: jiff::Timestamp::now(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            survey_id: self.definition.id.clone(),
            actor_id: self.actor_id.clone(),
            step_index: self.step_index,
            answers: self.answers.clone(),
            started_at: self.started_at,
        }
    }

    /// Rebuild a session from a snapshot. Answers are checked again against
    /// the current definition and dropped when they no longer fit. The step
    /// index is clamped to the definition and pulled back to the first
    /// required step that lost its answer.
    pub fn from_snapshot(definition: Arc<SurveyDefinition>, snapshot: SessionSnapshot) -> Self {
        let mut answers = snapshot.answers;
        answers.retain(|step_id, value| {
            let Some(step) = definition.steps.iter().find(|s| &s.id == step_id) else {
                warn!(step_id = %step_id, "dropping restored answer for a step that no longer exists");
                return false;
            };
            match check_answer(step, value) {
                Ok(()) => true,
                Err(e) => {
                    warn!(step_id = %step_id, error = %e, "dropping restored answer");
                    false
                }
            }
        });

        let last = definition.steps.len().saturating_sub(1);
        let clamped = snapshot.step_index.min(last);
        let step_index = definition.steps[..clamped]
            .iter()
            .position(|step| {
                step.required && !answers.get(&step.id).is_some_and(|v| !v.is_blank())
            })
            .unwrap_or(clamped);

        Self {
            step_index,
            definition,
            actor_id: snapshot.actor_id,
            answers,
            completed: false,
            started_at: snapshot.started_at,
        }
    }
}

fn check_answer(step: &SurveyStep, value: &AnswerValue) -> Result<(), SurveyError> {
    let mismatch = || SurveyError::KindMismatch {
        step_id: step.id.clone(),
        expected: step.kind.name(),
    };
    let unknown = |v: &str| SurveyError::UnknownOption {
        step_id: step.id.clone(),
        value: v.to_string(),
    };

    match (&step.kind, value) {
        (StepKind::FreeText, AnswerValue::Text(_)) => Ok(()),
        (StepKind::SingleChoice { .. }, AnswerValue::Choice(choice)) => {
            if step.kind.has_option(choice) {
                Ok(())
            } else {
                Err(unknown(choice))
            }
        }
        (StepKind::MultiChoice { .. }, AnswerValue::MultiChoice(selected)) => {
            match selected.iter().find(|v| !step.kind.has_option(v)) {
                Some(v) => Err(unknown(v)),
                None => Ok(()),
            }
        }
        (StepKind::Scale { min, max }, AnswerValue::Scale(n)) => {
            if (*min..=*max).contains(n) {
                Ok(())
            } else {
                Err(SurveyError::OutOfRange {
                    step_id: step.id.clone(),
                    value: *n,
                    min: *min,
                    max: *max,
                })
            }
        }
        _ => Err(mismatch()),
    }
}
