use triage_core::models::risk::{RiskFamily, RiskLevel};

use crate::RiskModel;
use crate::features::RiskFeatureVector;
use crate::scoring::FactorRule;

/// Cardiovascular disease point table. The age threshold is sex-specific
/// (men over 45, women over 55).
pub struct Cardiovascular;

static RULES: &[FactorRule] = &[
    FactorRule {
        description: "Age over 45 (men) or 55 (women)",
        points: 20,
        applies: |f| f.age > if f.is_male { 45.0 } else { 55.0 },
    },
    FactorRule {
        description: "Age over 65",
        points: 10,
        applies: |f| f.age > 65.0,
    },
    FactorRule {
        description: "Obesity (BMI over 30)",
        points: 15,
        applies: |f| f.bmi > 30.0,
    },
    FactorRule {
        description: "Family history of heart disease",
        points: 20,
        applies: |f| f.family_history,
    },
    FactorRule {
        description: "Smoker",
        points: 20,
        applies: |f| f.smoker,
    },
    FactorRule {
        description: "Physically inactive",
        points: 10,
        applies: |f| f.physically_inactive,
    },
    FactorRule {
        description: "High cholesterol",
        points: 15,
        applies: |f| f.high_cholesterol,
    },
    FactorRule {
        description: "High blood pressure",
        points: 15,
        applies: |f| f.high_blood_pressure,
    },
];

impl RiskModel for Cardiovascular {
    fn family(&self) -> RiskFamily {
        RiskFamily::Cardiovascular
    }

    fn condition(&self) -> &str {
        "Cardiovascular Disease"
    }

    fn rules(&self) -> &[FactorRule] {
        RULES
    }

    fn recommendations(&self, level: RiskLevel, features: &RiskFeatureVector) -> Vec<String> {
        let mut out = vec![
            match level {
                RiskLevel::Rendah => "Keep an active lifestyle and review heart health every few years.",
                RiskLevel::Sedang => "Check cholesterol and blood pressure within the next year.",
                RiskLevel::Tinggi => "See a doctor for a cardiovascular risk review and ECG.",
                RiskLevel::SangatTinggi => {
                    "See a cardiologist soon; seek emergency care for chest pain or breathlessness."
                }
            }
            .to_string(),
        ];
        if features.high_cholesterol {
            out.push("Limit saturated fat and ask about cholesterol-lowering therapy.".to_string());
        }
        if features.high_blood_pressure {
            out.push("Keep blood pressure under 140/90 with regular monitoring.".to_string());
        }
        super::lifestyle_advice(features, &mut out);
        out
    }
}
