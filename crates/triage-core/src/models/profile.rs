use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    Male,
    Female,
    Other,
}

/// Patient profile as held by the account collaborator.
///
/// Contact fields stay here and never reach a prompt; use [`redacted`]
/// before anything leaves the engine.
///
/// [`redacted`]: PatientProfile::redacted
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub blood_type: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
}

/// The clinically relevant subset of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RedactedProfile {
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub blood_type: Option<String>,
    pub allergies: Vec<String>,
    pub chronic_conditions: Vec<String>,
}

impl PatientProfile {
    pub fn redacted(&self) -> RedactedProfile {
        RedactedProfile {
            age: self.age,
            sex: self.sex,
            blood_type: self.blood_type.clone(),
            allergies: self.allergies.clone(),
            chronic_conditions: self.chronic_conditions.clone(),
        }
    }
}
