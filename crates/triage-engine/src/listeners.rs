//! Built-in escalation listeners.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use triage_core::models::emergency::EmergencyEvent;

use crate::audit::EscalationAudit;
use crate::error::EscalationError;
use crate::escalation::{BoxFuture, EscalationListener};
use crate::hospital::{Facility, HospitalLookup};

const CHANNEL_CAPACITY: usize = 64;

/// Records every raised emergency as an audit event.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogListener;

impl EscalationListener for AuditLogListener {
    fn name(&self) -> &str {
        "audit_log"
    }

    fn notify<'a>(
        &'a self,
        event: &'a EmergencyEvent,
    ) -> BoxFuture<'a, Result<(), EscalationError>> {
        Box::pin(async move {
            EscalationAudit::raised(event).emit();
            Ok(())
        })
    }
}

/// User-facing emergency notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyAlert {
    pub event_id: Uuid,
    pub actor_id: String,
    pub title: String,
    pub message: String,
    pub recommended_action: String,
    pub timestamp: jiff::Timestamp,
}

impl EmergencyAlert {
    fn from_event(event: &EmergencyEvent) -> Self {
        Self {
            event_id: event.id,
            actor_id: event.actor_id.clone(),
            title: "Emergency: seek immediate care".to_string(),
            message: event.diagnosis.clone(),
            recommended_action: event.recommended_action.clone(),
            timestamp: event.timestamp,
        }
    }
}

/// Publishes alerts on a broadcast channel for UI consumers.
///
/// Fails when nobody is subscribed, so an unheard alert shows up in the
/// fan-out report.
pub struct AlertListener {
    sender: broadcast::Sender<EmergencyAlert>,
}

impl AlertListener {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EmergencyAlert> {
        self.sender.subscribe()
    }
}

impl Default for AlertListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EscalationListener for AlertListener {
    fn name(&self) -> &str {
        "alert"
    }

    fn notify<'a>(
        &'a self,
        event: &'a EmergencyEvent,
    ) -> BoxFuture<'a, Result<(), EscalationError>> {
        Box::pin(async move {
            let receivers = self
                .sender
                .send(EmergencyAlert::from_event(event))
                .map_err(|_| EscalationError::NoSubscribers("emergency alerts"))?;
            debug!(event_id = %event.id, receivers, "emergency alert published");
            Ok(())
        })
    }
}

/// Nearby facilities for an emergency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalReferral {
    pub event_id: Uuid,
    pub actor_id: String,
    pub facilities: Vec<Facility>,
}

/// Looks up facilities near the event and publishes a referral.
pub struct HospitalLookupListener {
    lookup: Arc<dyn HospitalLookup>,
    sender: broadcast::Sender<HospitalReferral>,
    limit: usize,
}

impl HospitalLookupListener {
    pub fn new(lookup: Arc<dyn HospitalLookup>, limit: usize) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            lookup,
            sender,
            limit,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HospitalReferral> {
        self.sender.subscribe()
    }
}

impl EscalationListener for HospitalLookupListener {
    fn name(&self) -> &str {
        "hospital_lookup"
    }

    fn notify<'a>(
        &'a self,
        event: &'a EmergencyEvent,
    ) -> BoxFuture<'a, Result<(), EscalationError>> {
        Box::pin(async move {
            let coordinates = event
                .coordinates
                .ok_or_else(|| EscalationError::Lookup("event has no coordinates".to_string()))?;

            let mut facilities = self
                .lookup
                .find_by_severity(event.severity, coordinates)
                .await?;
            facilities.truncate(self.limit);
            debug!(event_id = %event.id, found = facilities.len(), "hospital lookup finished");

            self.sender
                .send(HospitalReferral {
                    event_id: event.id,
                    actor_id: event.actor_id.clone(),
                    facilities,
                })
                .map_err(|_| EscalationError::NoSubscribers("hospital referrals"))?;
            Ok(())
        })
    }
}
