use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::severity::SeverityLevel;

/// The chronic-disease scoring domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskFamily {
    Diabetes,
    Hypertension,
    Cardiovascular,
}

impl RiskFamily {
    pub const ALL: [RiskFamily; 3] = [
        RiskFamily::Diabetes,
        RiskFamily::Hypertension,
        RiskFamily::Cardiovascular,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            RiskFamily::Diabetes => "diabetes",
            RiskFamily::Hypertension => "hypertension",
            RiskFamily::Cardiovascular => "cardiovascular",
        }
    }
}

impl fmt::Display for RiskFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Discretized risk. Labels are the clinical vocabulary shown to patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RiskLevel {
    Rendah,
    Sedang,
    Tinggi,
    #[serde(rename = "Sangat Tinggi")]
    SangatTinggi,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Rendah => "Rendah",
            RiskLevel::Sedang => "Sedang",
            RiskLevel::Tinggi => "Tinggi",
            RiskLevel::SangatTinggi => "Sangat Tinggi",
        }
    }

    /// Severity implied by a risk level when reconciling with triage.
    pub fn severity(&self) -> SeverityLevel {
        match self {
            RiskLevel::Rendah => SeverityLevel::Green,
            RiskLevel::Sedang => SeverityLevel::Yellow,
            RiskLevel::Tinggi | RiskLevel::SangatTinggi => SeverityLevel::Red,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the rule-based scoring engine. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskAssessment {
    pub family: RiskFamily,
    pub condition: String,
    /// Clamped to `[0, 1]`.
    pub score: f64,
    pub level: RiskLevel,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    pub fn severity(&self) -> SeverityLevel {
        self.level.severity()
    }
}
