//! Audit trail for the escalation lifecycle.
//!
//! Records go out through `tracing` with `audit.*` fields so any subscriber
//! can route or filter them.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use triage_core::models::emergency::{DedupKey, EmergencyEvent};

/// What happened to an emergency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationAction {
    /// First raise for the key; listeners were notified.
    Raised,
    /// A raise arrived while the key was active.
    Suppressed,
    Dismissed,
    /// Dropped after the retention period without a dismissal.
    Expired,
}

impl EscalationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationAction::Raised => "emergency.raised",
            EscalationAction::Suppressed => "emergency.suppressed",
            EscalationAction::Dismissed => "emergency.dismissed",
            EscalationAction::Expired => "emergency.expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationAudit {
    pub action: EscalationAction,
    pub actor_id: String,
    pub dedup_key: DedupKey,
    /// Present when the record was produced from a concrete event.
    pub event_id: Option<Uuid>,
    pub diagnosis: Option<String>,
    pub at: jiff::Timestamp,
}

impl EscalationAudit {
    pub fn raised(event: &EmergencyEvent) -> Self {
        Self::from_event(EscalationAction::Raised, event)
    }

    pub fn suppressed(event: &EmergencyEvent) -> Self {
        Self::from_event(EscalationAction::Suppressed, event)
    }

    /// Record for a key with no event at hand (dismissal, expiry).
    pub fn for_key(action: EscalationAction, key: &DedupKey, at: jiff::Timestamp) -> Self {
        Self {
            action,
            actor_id: key.actor_id().to_string(),
            dedup_key: key.clone(),
            event_id: None,
            diagnosis: None,
            at,
        }
    }

    fn from_event(action: EscalationAction, event: &EmergencyEvent) -> Self {
        Self {
            action,
            actor_id: event.actor_id.clone(),
            dedup_key: event.dedup_key.clone(),
            event_id: Some(event.id),
            diagnosis: Some(event.diagnosis.clone()),
            at: event.timestamp,
        }
    }

    pub fn emit(&self) {
        let event_id = self.event_id.map(|id| id.to_string());
        info!(
            audit.action = self.action.as_str(),
            audit.actor_id = %self.actor_id,
            audit.dedup_key = %self.dedup_key,
            audit.event_id = event_id.as_deref(),
            audit.diagnosis = self.diagnosis.as_deref(),
            audit.at = %self.at,
            "audit event"
        );
    }
}
