use std::collections::BTreeSet;

use triage_core::models::risk::{RiskFamily, RiskLevel};
use triage_core::models::submission::AnswerValue;
use triage_engine::error::IntakeError;
use triage_engine::intake::risk_requests_from;
use triage_survey::orchestrator::SurveyOrchestrator;
use triage_survey::registry::SurveyRegistry;
use triage_survey::session::Advance;
use triage_survey::surveys::{chronic_risk_screening, general_symptoms};

fn choice(value: &str) -> AnswerValue {
    AnswerValue::Choice(value.to_string())
}

fn complete_screening() -> triage_core::models::submission::SurveySubmission {
    let mut orchestrator = SurveyOrchestrator::new(SurveyRegistry::builtin());
    let actor = "patient-8";
    orchestrator
        .start(actor, chronic_risk_screening::ID)
        .expect("survey starts");

    let answers = [
        ("age", AnswerValue::Scale(50)),
        ("sex", choice("male")),
        ("weight_kg", AnswerValue::Scale(93)),
        ("height_cm", AnswerValue::Scale(170)),
        (
            "family_history",
            AnswerValue::MultiChoice(BTreeSet::from(["heart_disease".to_string()])),
        ),
        ("smoker", choice("no")),
        ("poor_diet", choice("yes")),
        ("physically_inactive", choice("no")),
        ("high_cholesterol", choice("yes")),
        ("high_blood_pressure", choice("yes")),
    ];

    for (step_id, value) in answers {
        orchestrator.answer(actor, step_id, value).expect("answer accepted");
        if let Advance::Completed(submission) = orchestrator.next(actor).expect("advance") {
            return submission;
        }
    }
    panic!("screening did not complete");
}

#[test]
fn screening_maps_to_one_request_per_family() {
    let submission = complete_screening();
    let requests = risk_requests_from(&submission).expect("requests");

    let families: Vec<RiskFamily> = requests.iter().map(|(family, _)| *family).collect();
    assert_eq!(families, RiskFamily::ALL.to_vec());

    for (family, features) in &requests {
        assert_eq!(features.age, 50.0);
        assert!((features.bmi - 93.0 / (1.7 * 1.7)).abs() < 1e-9);
        assert!(features.is_male);
        assert!(!features.smoker);
        assert!(features.poor_diet);
        assert!(features.high_cholesterol);
        assert!(features.high_blood_pressure);
        assert_eq!(features.family_history, *family == RiskFamily::Cardiovascular);
    }
}

#[test]
fn screening_reproduces_the_reference_cardiovascular_case() {
    let submission = complete_screening();
    let requests = risk_requests_from(&submission).expect("requests");
    let (_, cardio) = requests
        .iter()
        .find(|(family, _)| *family == RiskFamily::Cardiovascular)
        .expect("cardiovascular request");

    let assessment = triage_risk::score(RiskFamily::Cardiovascular, cardio).expect("scored");
    assert_eq!(assessment.score, 0.85);
    assert_eq!(assessment.level, RiskLevel::SangatTinggi);
}

#[test]
fn other_surveys_are_rejected() {
    let submission = triage_core::models::submission::SurveySubmission {
        survey_id: general_symptoms::ID.to_string(),
        actor_id: "patient-8".to_string(),
        chief_complaint: None,
        answers: vec![],
        submitted_at: jiff::Timestamp::now(),
    };
    assert_eq!(
        risk_requests_from(&submission),
        Err(IntakeError::NotRiskScreening("general_symptoms".to_string()))
    );
}

#[test]
fn missing_measurements_are_reported() {
    let submission = triage_core::models::submission::SurveySubmission {
        survey_id: chronic_risk_screening::ID.to_string(),
        actor_id: "patient-8".to_string(),
        chief_complaint: None,
        answers: vec![],
        submitted_at: jiff::Timestamp::now(),
    };
    assert_eq!(
        risk_requests_from(&submission).map(|r| r.len()),
        Err(IntakeError::MissingAnswer("age"))
    );
}
