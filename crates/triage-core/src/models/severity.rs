use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Triage severity. Variant order is the escalation order: `Green < Yellow < Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SeverityLevel {
    /// Self-manageable at home.
    Green,
    /// Needs medical attention within roughly 24–48 hours.
    Yellow,
    /// Emergency, immediate care.
    Red,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Green => "Green",
            SeverityLevel::Yellow => "Yellow",
            SeverityLevel::Red => "Red",
        }
    }

    pub fn is_emergency(&self) -> bool {
        *self == SeverityLevel::Red
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single normalization point for severity strings coming from outside
/// the engine (provider output, stored records, host input).
///
/// Accepts any casing of the canonical names plus the Indonesian labels
/// (`hijau`, `kuning`, `merah`) that providers sometimes answer with.
impl FromStr for SeverityLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" | "hijau" => Ok(SeverityLevel::Green),
            "yellow" | "kuning" => Ok(SeverityLevel::Yellow),
            "red" | "merah" => Ok(SeverityLevel::Red),
            _ => Err(CoreError::UnknownSeverity(s.to_string())),
        }
    }
}
