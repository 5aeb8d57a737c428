use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

use super::severity::SeverityLevel;

/// Latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Identifies one alert window for one actor: `{actor_id}:{bucket}` where
/// `bucket` is the Unix second divided by the window length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn for_actor(actor_id: &str, at: jiff::Timestamp, window: Duration) -> Self {
        let window_secs = window.as_secs().max(1) as i64;
        let bucket = at.as_second().div_euclid(window_secs);
        DedupKey(format!("{actor_id}:{bucket}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The actor part, everything before the last `:`.
    pub fn actor_id(&self) -> &str {
        self.0.rsplit_once(':').map_or(&self.0, |(actor, _)| actor)
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DedupKey {
    fn from(s: &str) -> Self {
        DedupKey(s.to_string())
    }
}

/// Advisory signal produced alongside a Red triage decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmergencyEvent {
    pub id: Uuid,
    pub actor_id: String,
    pub severity: SeverityLevel,
    pub diagnosis: String,
    pub recommended_action: String,
    pub timestamp: jiff::Timestamp,
    pub dedup_key: DedupKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl EmergencyEvent {
    /// Build an event for a Red decision. Any other severity is rejected.
    pub fn new(
        actor_id: impl Into<String>,
        severity: SeverityLevel,
        diagnosis: impl Into<String>,
        recommended_action: impl Into<String>,
        timestamp: jiff::Timestamp,
        window: Duration,
    ) -> Result<Self, CoreError> {
        if severity != SeverityLevel::Red {
            return Err(CoreError::NotAnEmergency(severity));
        }
        let actor_id = actor_id.into();
        let dedup_key = DedupKey::for_actor(&actor_id, timestamp, window);
        Ok(Self {
            id: Uuid::new_v4(),
            actor_id,
            severity,
            diagnosis: diagnosis.into(),
            recommended_action: recommended_action.into(),
            timestamp,
            dedup_key,
            coordinates: None,
        })
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}
