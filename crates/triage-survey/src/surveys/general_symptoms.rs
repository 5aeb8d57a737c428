use crate::definition::{SurveyDefinition, StepKind, choices, step};

pub const ID: &str = "general_symptoms";

/// Clinical intake interview feeding triage.
pub fn definition() -> SurveyDefinition {
    SurveyDefinition {
        id: ID.to_string(),
        title: "Symptom Check".to_string(),
        chief_complaint_step: Some("main_complaint".to_string()),
        steps: vec![
            step(
                "main_complaint",
                StepKind::FreeText,
                "Describe your main complaint in your own words.",
                true,
            ),
            step(
                "onset",
                StepKind::SingleChoice {
                    options: choices(&[
                        ("today", "Today"),
                        ("1_3_days", "1 to 3 days ago"),
                        ("4_7_days", "4 to 7 days ago"),
                        ("over_week", "More than a week ago"),
                    ]),
                },
                "When did it start?",
                true,
            ),
            step(
                "intensity",
                StepKind::Scale { min: 1, max: 10 },
                "How strong is the discomfort, from 1 (mild) to 10 (worst imaginable)?",
                true,
            ),
            step(
                "associated_symptoms",
                StepKind::MultiChoice {
                    options: choices(&[
                        ("fever", "Fever"),
                        ("cough", "Cough"),
                        ("shortness_of_breath", "Shortness of breath"),
                        ("chest_pain", "Chest pain"),
                        ("headache", "Headache"),
                        ("nausea", "Nausea or vomiting"),
                        ("dizziness", "Dizziness"),
                        ("rash", "Rash"),
                    ]),
                },
                "Do you have any of these symptoms as well?",
                false,
            ),
            step(
                "warning_signs",
                StepKind::MultiChoice {
                    options: choices(&[
                        ("fainting", "Fainting or loss of consciousness"),
                        ("heavy_bleeding", "Bleeding that will not stop"),
                        ("confusion", "Sudden confusion"),
                        ("one_sided_weakness", "Weakness on one side of the body"),
                        ("none", "None of these"),
                    ]),
                },
                "Have you noticed any of these warning signs?",
                true,
            ),
            step(
                "medications",
                StepKind::FreeText,
                "List any medicines you have taken for this.",
                false,
            ),
        ],
    }
}
