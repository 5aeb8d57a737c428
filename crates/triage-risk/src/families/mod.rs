pub mod cardiovascular;
pub mod diabetes;
pub mod hypertension;

use crate::features::RiskFeatureVector;

/// Lifestyle advice shared by every family, added only when the matching
/// factor is present.
fn lifestyle_advice(features: &RiskFeatureVector, out: &mut Vec<String>) {
    if features.smoker {
        out.push("Stop smoking; ask a clinic about a cessation programme.".to_string());
    }
    if features.bmi > 25.0 {
        out.push("Aim for gradual weight loss towards a BMI below 25.".to_string());
    }
    if features.physically_inactive {
        out.push("Build up to 150 minutes of moderate activity per week.".to_string());
    }
}
