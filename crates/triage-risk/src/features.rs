use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Inputs to a scoring call. Built once per call and never persisted.
///
/// Flags accept `true`/`false` or `0`/`1`, and the camel-case names used by
/// intake forms are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFeatureVector {
    /// Age in years.
    #[serde(alias = "umur")]
    pub age: f64,
    pub bmi: f64,
    #[serde(default, alias = "isMale", deserialize_with = "flag")]
    pub is_male: bool,
    #[serde(default, alias = "familyHistory", deserialize_with = "flag")]
    pub family_history: bool,
    #[serde(default, deserialize_with = "flag")]
    pub smoker: bool,
    #[serde(default, alias = "poorDiet", deserialize_with = "flag")]
    pub poor_diet: bool,
    #[serde(default, alias = "physicallyInactive", deserialize_with = "flag")]
    pub physically_inactive: bool,
    #[serde(default, alias = "highCholesterol", deserialize_with = "flag")]
    pub high_cholesterol: bool,
    #[serde(default, alias = "highBP", deserialize_with = "flag")]
    pub high_blood_pressure: bool,
}

impl RiskFeatureVector {
    pub fn new(age: f64, bmi: f64) -> Self {
        Self {
            age,
            bmi,
            ..Self::default()
        }
    }

    /// Age and BMI are mandatory and must be positive.
    pub fn validate(&self) -> Result<(), RiskError> {
        // `!(x > 0)` also rejects NaN.
        if !(self.age > 0.0) {
            return Err(RiskError::InvalidFeatures(format!(
                "age must be positive, got {}",
                self.age
            )));
        }
        if !(self.bmi > 0.0) {
            return Err(RiskError::InvalidFeatures(format!(
                "bmi must be positive, got {}",
                self.bmi
            )));
        }
        Ok(())
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(de::Error::custom(format!("flag must be 0 or 1, got {n}"))),
    }
}
