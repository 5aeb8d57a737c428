use triage_core::models::risk::{RiskFamily, RiskLevel};

use crate::RiskModel;
use crate::features::RiskFeatureVector;
use crate::scoring::FactorRule;

/// Hypertension point table.
pub struct Hypertension;

static RULES: &[FactorRule] = &[
    FactorRule {
        description: "Age over 45",
        points: 20,
        applies: |f| f.age > 45.0,
    },
    FactorRule {
        description: "Age over 60",
        points: 10,
        applies: |f| f.age > 60.0,
    },
    FactorRule {
        description: "Overweight (BMI over 25)",
        points: 15,
        applies: |f| f.bmi > 25.0,
    },
    FactorRule {
        description: "Obesity (BMI over 30)",
        points: 15,
        applies: |f| f.bmi > 30.0,
    },
    FactorRule {
        description: "Family history of hypertension",
        points: 20,
        applies: |f| f.family_history,
    },
    FactorRule {
        description: "Smoker",
        points: 20,
        applies: |f| f.smoker,
    },
    FactorRule {
        description: "High-salt diet",
        points: 15,
        applies: |f| f.poor_diet,
    },
    FactorRule {
        description: "Physically inactive",
        points: 10,
        applies: |f| f.physically_inactive,
    },
    FactorRule {
        description: "High cholesterol",
        points: 10,
        applies: |f| f.high_cholesterol,
    },
];

impl RiskModel for Hypertension {
    fn family(&self) -> RiskFamily {
        RiskFamily::Hypertension
    }

    fn condition(&self) -> &str {
        "Hypertension"
    }

    fn rules(&self) -> &[FactorRule] {
        RULES
    }

    fn recommendations(&self, level: RiskLevel, features: &RiskFeatureVector) -> Vec<String> {
        let mut out = vec![
            match level {
                RiskLevel::Rendah => "Have your blood pressure checked once a year.",
                RiskLevel::Sedang => "Check your blood pressure every 3 to 6 months.",
                RiskLevel::Tinggi => "Measure blood pressure weekly and see a doctor this month.",
                RiskLevel::SangatTinggi => {
                    "See a doctor promptly to confirm blood pressure and discuss treatment."
                }
            }
            .to_string(),
        ];
        if features.poor_diet {
            out.push("Keep salt intake under one teaspoon (5 g) a day.".to_string());
        }
        if features.high_cholesterol {
            out.push("Ask for a lipid panel at your next visit.".to_string());
        }
        super::lifestyle_advice(features, &mut out);
        out
    }
}
