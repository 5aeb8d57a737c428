use crate::definition::{SurveyDefinition, StepKind, choices, step};

pub const ID: &str = "chronic_risk_screening";

fn yes_no() -> StepKind {
    StepKind::SingleChoice {
        options: choices(&[("yes", "Yes"), ("no", "No")]),
    }
}

/// Lifestyle questionnaire whose answers feed the risk scoring engine.
pub fn definition() -> SurveyDefinition {
    SurveyDefinition {
        id: ID.to_string(),
        title: "Chronic Disease Risk Screening".to_string(),
        chief_complaint_step: None,
        steps: vec![
            step("age", StepKind::Scale { min: 1, max: 120 }, "How old are you?", true),
            step(
                "sex",
                StepKind::SingleChoice {
                    options: choices(&[("male", "Male"), ("female", "Female")]),
                },
                "What is your sex?",
                true,
            ),
            step(
                "weight_kg",
                StepKind::Scale { min: 2, max: 400 },
                "What is your weight in kilograms?",
                true,
            ),
            step(
                "height_cm",
                StepKind::Scale { min: 40, max: 250 },
                "What is your height in centimetres?",
                true,
            ),
            step(
                "family_history",
                StepKind::MultiChoice {
                    options: choices(&[
                        ("diabetes", "Diabetes"),
                        ("hypertension", "High blood pressure"),
                        ("heart_disease", "Heart disease or stroke"),
                        ("none", "None of these"),
                    ]),
                },
                "Do close relatives have any of these conditions?",
                true,
            ),
            step("smoker", yes_no(), "Do you smoke?", true),
            step(
                "poor_diet",
                yes_no(),
                "Do you often eat salty, sugary or fried food?",
                true,
            ),
            step(
                "physically_inactive",
                yes_no(),
                "Do you exercise less than 30 minutes on most days?",
                true,
            ),
            step(
                "high_cholesterol",
                yes_no(),
                "Has a doctor told you your cholesterol is high?",
                false,
            ),
            step(
                "high_blood_pressure",
                yes_no(),
                "Has a doctor told you your blood pressure is high?",
                false,
            ),
        ],
    }
}
