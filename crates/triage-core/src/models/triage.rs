use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

use super::severity::SeverityLevel;

/// Whether a result came from the generative provider or from the safe
/// fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Provenance {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Emergency,
}

impl Urgency {
    /// The lowest urgency compatible with a severity.
    pub fn floor_for(severity: SeverityLevel) -> Urgency {
        match severity {
            SeverityLevel::Green => Urgency::Low,
            SeverityLevel::Yellow => Urgency::Medium,
            SeverityLevel::Red => Urgency::Emergency,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" | "moderate" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "emergency" | "critical" => Ok(Urgency::Emergency),
            _ => Err(CoreError::UnknownUrgency(s.to_string())),
        }
    }
}

/// The outcome of one triage invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriageResult {
    pub severity: SeverityLevel,
    pub preliminary_diagnosis: String,
    pub recommended_action: String,
    pub clinical_questions: Vec<String>,
    pub urgency: Urgency,
    pub provenance: Provenance,
    /// Provider-reported confidence (0–100), when the provider gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

/// The outcome of a free-text symptom analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SymptomAnalysis {
    pub severity: SeverityLevel,
    pub diagnosis: String,
    pub recommendations: Vec<String>,
    pub doctor_type: String,
    pub provenance: Provenance,
}
