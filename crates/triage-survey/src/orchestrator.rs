use std::collections::HashMap;

use tracing::{debug, info};

use triage_core::models::submission::AnswerValue;
use triage_storage::state::{load_state, save_state};
use triage_storage::store::KeyValueStore;

use crate::error::SurveyError;
use crate::registry::SurveyRegistry;
use crate::session::{Advance, SessionSnapshot, SurveySession};

/// Externally visible state of an actor's survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyState {
    NotStarted,
    InProgress { step_index: usize },
    Completed,
}

enum Slot {
    InProgress(SurveySession),
    Completed,
}

/// Drives at most one survey session per actor.
///
/// Not synchronized: callers serialize operations for a given actor.
pub struct SurveyOrchestrator {
    registry: SurveyRegistry,
    slots: HashMap<String, Slot>,
}

fn session_key(actor_id: &str) -> String {
    format!("surveys/sessions/{actor_id}")
}

impl SurveyOrchestrator {
    pub fn new(registry: SurveyRegistry) -> Self {
        Self {
            registry,
            slots: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &SurveyRegistry {
        &self.registry
    }

    pub fn state(&self, actor_id: &str) -> SurveyState {
        match self.slots.get(actor_id) {
            None => SurveyState::NotStarted,
            Some(Slot::InProgress(session)) => SurveyState::InProgress {
                step_index: session.step_index(),
            },
            Some(Slot::Completed) => SurveyState::Completed,
        }
    }

    pub fn session(&self, actor_id: &str) -> Option<&SurveySession> {
        match self.slots.get(actor_id) {
            Some(Slot::InProgress(session)) => Some(session),
            _ => None,
        }
    }

    /// Start a survey at step 0. An in-progress session for the same actor
    /// is replaced.
    pub fn start(&mut self, actor_id: &str, survey_id: &str) -> Result<&SurveySession, SurveyError> {
        let definition = self
            .registry
            .get(survey_id)
            .ok_or_else(|| SurveyError::UnknownSurvey(survey_id.to_string()))?;

        if let Some(Slot::InProgress(previous)) = self.slots.get(actor_id) {
            info!(
                actor_id,
                replaced = %previous.definition().id,
                survey_id,
                "survey restarted; previous session discarded"
            );
        }

        let slot = Slot::InProgress(SurveySession::new(definition, actor_id));
        self.slots.insert(actor_id.to_string(), slot);
        debug!(actor_id, survey_id, "survey started");

        self.session(actor_id)
            .ok_or_else(|| SurveyError::NoActiveSession(actor_id.to_string()))
    }

    pub fn answer(
        &mut self,
        actor_id: &str,
        step_id: &str,
        value: AnswerValue,
    ) -> Result<(), SurveyError> {
        self.active_mut(actor_id)?.answer(step_id, value)
    }

    /// Advance the actor's survey. On completion the session is discarded
    /// and the submission returned.
    pub fn next(&mut self, actor_id: &str) -> Result<Advance, SurveyError> {
        let advance = self.active_mut(actor_id)?.next()?;
        match &advance {
            Advance::Moved { step_index } => {
                debug!(actor_id, step_index, "survey advanced");
            }
            Advance::Completed(submission) => {
                info!(
                    actor_id,
                    survey_id = %submission.survey_id,
                    answers = submission.answers.len(),
                    "survey completed"
                );
                self.slots.insert(actor_id.to_string(), Slot::Completed);
            }
        }
        Ok(advance)
    }

    pub fn previous(&mut self, actor_id: &str) -> Result<usize, SurveyError> {
        Ok(self.active_mut(actor_id)?.previous())
    }

    /// Drop whatever the actor had; the actor is back to `NotStarted`.
    pub fn cancel(&mut self, actor_id: &str) {
        if self.slots.remove(actor_id).is_some() {
            debug!(actor_id, "survey cancelled");
        }
    }

    /// Save the actor's in-progress session, or clear the stored copy when
    /// nothing is in progress.
    pub async fn persist(
        &self,
        actor_id: &str,
        store: &dyn KeyValueStore,
    ) -> Result<(), SurveyError> {
        let key = session_key(actor_id);
        match self.session(actor_id) {
            Some(session) => save_state(store, &key, &session.snapshot()).await?,
            None => store.remove(&key).await?,
        }
        Ok(())
    }

    /// Reload a persisted session. Returns `false` when nothing usable was
    /// stored (missing key or a survey that is no longer registered).
    pub async fn restore(
        &mut self,
        actor_id: &str,
        store: &dyn KeyValueStore,
    ) -> Result<bool, SurveyError> {
        let Some(snapshot) = load_state::<SessionSnapshot>(store, &session_key(actor_id)).await?
        else {
            return Ok(false);
        };

        let Some(definition) = self.registry.get(&snapshot.survey_id) else {
            info!(actor_id, survey_id = %snapshot.survey_id, "stored session references an unknown survey");
            return Ok(false);
        };

        let session = SurveySession::from_snapshot(definition, snapshot);
        debug!(actor_id, step_index = session.step_index(), "survey session restored");
        self.slots
            .insert(actor_id.to_string(), Slot::InProgress(session));
        Ok(true)
    }

    fn active_mut(&mut self, actor_id: &str) -> Result<&mut SurveySession, SurveyError> {
        match self.slots.get_mut(actor_id) {
            Some(Slot::InProgress(session)) => Ok(session),
            _ => Err(SurveyError::NoActiveSession(actor_id.to_string())),
        }
    }
}
