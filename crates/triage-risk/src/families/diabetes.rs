use triage_core::models::risk::{RiskFamily, RiskLevel};

use crate::RiskModel;
use crate::features::RiskFeatureVector;
use crate::scoring::FactorRule;

/// Type 2 diabetes point table.
pub struct Diabetes;

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
        description: "Family history of diabetes",
        points: 20,
        applies: |f| f.family_history,
    },
    FactorRule {
        description: "Smoker",
        points: 15,
        applies: |f| f.smoker,
    },
    FactorRule {
        description: "High-sugar or high-fat diet",
        points: 10,
        applies: |f| f.poor_diet,
    },
    FactorRule {
        description: "Physically inactive",
        points: 10,
        applies: |f| f.physically_inactive,
    },
    FactorRule {
        description: "High blood pressure",
        points: 10,
        applies: |f| f.high_blood_pressure,
    },
];

impl RiskModel for Diabetes {
    fn family(&self) -> RiskFamily {
        RiskFamily::Diabetes
    }

    fn condition(&self) -> &str {
        "Type 2 Diabetes"
    }

    fn rules(&self) -> &[FactorRule] {
        RULES
    }

    fn recommendations(&self, level: RiskLevel, features: &RiskFeatureVector) -> Vec<String> {
        let mut out = vec![
            match level {
                RiskLevel::Rendah => "Keep up a balanced diet and check fasting glucose every 3 years.",
                RiskLevel::Sedang => "Check fasting glucose or HbA1c within the next year.",
                RiskLevel::Tinggi => "Arrange an HbA1c test with a general practitioner within a month.",
                RiskLevel::SangatTinggi => {
                    "See a doctor soon for HbA1c and an oral glucose tolerance test."
                }
            }
            .to_string(),
        ];
        if features.poor_diet {
            out.push("Cut down on sugary drinks and refined carbohydrates.".to_string());
        }
        if features.family_history && level >= RiskLevel::Sedang {
            out.push("Tell your doctor about diabetes in close relatives.".to_string());
        }
        super::lifestyle_advice(features, &mut out);
        out
    }
}
