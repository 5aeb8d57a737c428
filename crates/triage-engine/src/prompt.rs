//! Prompt assembly for triage requests.
//!
//! Only the redacted profile is ever embedded; contact fields never reach
//! the provider.

use triage_core::models::profile::{RedactedProfile, Sex};
use triage_core::models::risk::RiskAssessment;
use triage_core::models::submission::SurveySubmission;

pub const CLINICAL_TRIAGE_INSTRUCTION: &str = "\
You are a clinical triage assistant. Classify the patient's reported symptoms \
and answer with a single JSON object and nothing else, using exactly these fields:
{
  \"severity\": \"Green\" | \"Yellow\" | \"Red\",
  \"preliminary_diagnosis\": string,
  \"recommended_action\": string,
  \"clinical_questions\": [string],
  \"urgency\": \"low\" | \"medium\" | \"high\" | \"emergency\",
  \"confidence\": number between 0 and 100
}
Green means self-care at home, Yellow means see a doctor within 24 to 48 hours, \
Red means emergency care now. When unsure between two levels, choose the higher one.";

pub const SYMPTOM_ANALYSIS_INSTRUCTION: &str = "\
You are a clinical triage assistant. Analyse the symptoms the patient describes \
and answer with a single JSON object and nothing else, using exactly these fields:
{
  \"severity\": \"Green\" | \"Yellow\" | \"Red\",
  \"diagnosis\": string,
  \"recommendations\": [string],
  \"doctor_type\": string
}
Green means self-care at home, Yellow means see a doctor within 24 to 48 hours, \
Red means emergency care now.";

fn sex_label(sex: Sex) -> &'static str {
    match sex {
        Sex::Male => "male",
        Sex::Female => "female",
        Sex::Other => "other",
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none reported".to_string()
    } else {
        items.join(", ")
    }
}

/// Render the clinically relevant profile as a prompt block.
pub fn profile_block(profile: &RedactedProfile) -> String {
    let mut block = String::from("<patient_profile>\n");
    if let Some(age) = profile.age {
        block.push_str(&format!("Age: {age}\n"));
    }
    if let Some(sex) = profile.sex {
        block.push_str(&format!("Sex: {}\n", sex_label(sex)));
    }
    if let Some(blood_type) = &profile.blood_type {
        block.push_str(&format!("Blood type: {blood_type}\n"));
    }
    block.push_str(&format!("Allergies: {}\n", list_or_none(&profile.allergies)));
    block.push_str(&format!(
        "Chronic conditions: {}\n",
        list_or_none(&profile.chronic_conditions)
    ));
    block.push_str("</patient_profile>");
    block
}

fn risk_block(risk: &[RiskAssessment]) -> String {
    if risk.is_empty() {
        return String::new();
    }
    let mut block = String::from("<risk_screening>\n");
    for assessment in risk {
        block.push_str(&format!(
            "- {}: {} (score {:.2})\n",
            assessment.condition, assessment.level, assessment.score
        ));
    }
    block.push_str("</risk_screening>\n");
    block
}

/// Prompt for a completed survey.
pub fn triage_prompt(
    submission: &SurveySubmission,
    profile: &RedactedProfile,
    risk: &[RiskAssessment],
) -> String {
    let mut prompt = String::new();

    let complaint = submission
        .chief_complaint
        .as_deref()
        .unwrap_or("(not stated)");
    prompt.push_str(&format!("Chief complaint: {complaint}\n\n"));

    prompt.push_str("<survey_answers>\n");
    for answer in &submission.answers {
        prompt.push_str(&format!("- {}: {}\n", answer.prompt, answer.value.render()));
    }
    prompt.push_str("</survey_answers>\n\n");

    prompt.push_str(&profile_block(profile));
    prompt.push_str("\n\n");
    prompt.push_str(&risk_block(risk));
    prompt.push_str("Classify this patient.");
    prompt
}

/// Prompt for a free-text symptom description.
pub fn symptom_prompt(symptoms: &str, profile: &RedactedProfile) -> String {
    format!(
        "Symptoms described by the patient:\n{}\n\n{}\n\nAnalyse these symptoms.",
        symptoms.trim(),
        profile_block(profile)
    )
}
