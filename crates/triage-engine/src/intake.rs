//! Mapping from a completed risk-screening survey to scoring requests.

use triage_core::models::risk::RiskFamily;
use triage_core::models::submission::{AnswerValue, SurveySubmission};
use triage_risk::features::RiskFeatureVector;
use triage_survey::surveys::chronic_risk_screening;

use crate::error::IntakeError;

/// Build one scoring request per risk family. Family history is taken per
/// family from the multi-choice answer.
pub fn risk_requests_from(
    submission: &SurveySubmission,
) -> Result<Vec<(RiskFamily, RiskFeatureVector)>, IntakeError> {
    if submission.survey_id != chronic_risk_screening::ID {
        return Err(IntakeError::NotRiskScreening(submission.survey_id.clone()));
    }

    let age = scale(submission, "age")?;
    let weight_kg = scale(submission, "weight_kg")?;
    let height_m = scale(submission, "height_cm")? / 100.0;
    let bmi = weight_kg / (height_m * height_m);

    let mut base = RiskFeatureVector::new(age, bmi);
    base.is_male = choice(submission, "sex").is_some_and(|s| s == "male");
    base.smoker = yes(submission, "smoker");
    base.poor_diet = yes(submission, "poor_diet");
    base.physically_inactive = yes(submission, "physically_inactive");
    base.high_cholesterol = yes(submission, "high_cholesterol");
    base.high_blood_pressure = yes(submission, "high_blood_pressure");

    let relatives = match submission.answer("family_history") {
        Some(AnswerValue::MultiChoice(selected)) => selected.clone(),
        _ => Default::default(),
    };

    Ok(RiskFamily::ALL
        .into_iter()
        .map(|family| {
            let option = match family {
                RiskFamily::Diabetes => "diabetes",
                RiskFamily::Hypertension => "hypertension",
                RiskFamily::Cardiovascular => "heart_disease",
            };
            let features = RiskFeatureVector {
                family_history: relatives.contains(option),
                ..base.clone()
            };
            (family, features)
        })
        .collect())
}

fn scale(submission: &SurveySubmission, step_id: &'static str) -> Result<f64, IntakeError> {
    match submission.answer(step_id) {
        Some(AnswerValue::Scale(n)) => Ok(*n as f64),
        _ => Err(IntakeError::MissingAnswer(step_id)),
    }
}

fn choice<'a>(submission: &'a SurveySubmission, step_id: &str) -> Option<&'a str> {
    match submission.answer(step_id) {
        Some(AnswerValue::Choice(c)) => Some(c.as_str()),
        _ => None,
    }
}

fn yes(submission: &SurveySubmission, step_id: &str) -> bool {
    choice(submission, step_id) == Some("yes")
}
