use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use triage_core::models::emergency::EmergencyEvent;
use triage_core::models::profile::PatientProfile;
use triage_core::models::risk::RiskAssessment;
use triage_core::models::severity::SeverityLevel;
use triage_core::models::submission::SurveySubmission;
use triage_core::models::triage::{SymptomAnalysis, TriageResult, Urgency};
use triage_gateway::context::{ChatMessage, DEFAULT_TURN_CHAR_LIMIT, trim_context};
use triage_gateway::gateway::{CompletionOptions, TextCompletionGateway};

use crate::contract::{
    ClinicalSurveyShape, ContractViolation, Parsed, ResponseShape, SymptomAnalysisShape,
    parse_structured,
};
use crate::prompt;

/// Default alert window used to build dedup keys.
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSettings {
    pub options: CompletionOptions,
    /// Per-turn cap applied to conversation history.
    pub context_char_limit: usize,
    #[serde(with = "window_secs", rename = "dedup_window_secs")]
    pub dedup_window: Duration,
}

impl Default for DecisionSettings {
    fn default() -> Self {
        Self {
            options: CompletionOptions::default(),
            context_char_limit: DEFAULT_TURN_CHAR_LIMIT,
            dedup_window: DEFAULT_DEDUP_WINDOW,
        }
    }
}

/// Outcome of [`TriageDecisionService::decide`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub result: TriageResult,
    /// Present exactly when the final severity is Red.
    pub emergency: Option<EmergencyEvent>,
    /// Why the provider answer was not used, when it was not.
    pub fallback_reason: Option<ContractViolation>,
}

/// Outcome of [`TriageDecisionService::analyze_symptoms`].
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomDecision {
    pub analysis: SymptomAnalysis,
    pub emergency: Option<EmergencyEvent>,
    pub fallback_reason: Option<ContractViolation>,
}

/// Turns a completed survey into a severity decision.
///
/// Stateless apart from its configuration, so one instance can serve
/// concurrent callers. Exactly one provider call is made per decision and
/// dropping the returned future cancels it.
#[derive(Clone)]
pub struct TriageDecisionService {
    gateway: TextCompletionGateway,
    settings: DecisionSettings,
}

impl TriageDecisionService {
    pub fn new(gateway: TextCompletionGateway, settings: DecisionSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> &DecisionSettings {
        &self.settings
    }

    pub async fn decide(
        &self,
        submission: &SurveySubmission,
        profile: &PatientProfile,
        risk: &[RiskAssessment],
    ) -> Decision {
        let prompt = prompt::triage_prompt(submission, &profile.redacted(), risk);
        let parsed = self
            .ask::<ClinicalSurveyShape>(&prompt, prompt::CLINICAL_TRIAGE_INSTRUCTION, &[])
            .await;
        let (mut result, fallback_reason) = parsed.into_parts();

        let ai_severity = result.severity;
        let severity = reconcile_severity(ai_severity, risk);
        if severity > ai_severity {
            result.recommended_action =
                format!("{} {}", escalation_note(severity), result.recommended_action);
            info!(
                actor_id = %submission.actor_id,
                from = %ai_severity,
                to = %severity,
                "severity raised by risk screening"
            );
        }
        result.severity = severity;
        result.urgency = result.urgency.max(Urgency::floor_for(severity));

        let emergency = self.emergency_for(
            &submission.actor_id,
            severity,
            &result.preliminary_diagnosis,
            &result.recommended_action,
        );

        info!(
            actor_id = %submission.actor_id,
            survey_id = %submission.survey_id,
            severity = %result.severity,
            urgency = %result.urgency,
            provenance = ?result.provenance,
            emergency = emergency.is_some(),
            "triage decided"
        );

        Decision {
            result,
            emergency,
            fallback_reason,
        }
    }

    /// Classify a free-text symptom description, optionally within an
    /// ongoing conversation.
    pub async fn analyze_symptoms(
        &self,
        actor_id: &str,
        symptoms: &str,
        history: &[ChatMessage],
        profile: &PatientProfile,
        risk: &[RiskAssessment],
    ) -> SymptomDecision {
        let context = trim_context(history, self.settings.context_char_limit);
        let prompt = prompt::symptom_prompt(symptoms, &profile.redacted());
        let parsed = self
            .ask::<SymptomAnalysisShape>(&prompt, prompt::SYMPTOM_ANALYSIS_INSTRUCTION, &context)
            .await;
        let (mut analysis, fallback_reason) = parsed.into_parts();

        let severity = reconcile_severity(analysis.severity, risk);
        if severity > analysis.severity {
            analysis
                .recommendations
                .insert(0, escalation_note(severity).to_string());
        }
        analysis.severity = severity;

        let action = analysis
            .recommendations
            .first()
            .cloned()
            .unwrap_or_default();
        let emergency = self.emergency_for(actor_id, severity, &analysis.diagnosis, &action);

        info!(
            actor_id,
            severity = %analysis.severity,
            provenance = ?analysis.provenance,
            emergency = emergency.is_some(),
            "symptoms analysed"
        );

        SymptomDecision {
            analysis,
            emergency,
            fallback_reason,
        }
    }

    async fn ask<S: ResponseShape>(
        &self,
        prompt: &str,
        instruction: &str,
        context: &[ChatMessage],
    ) -> Parsed<S::Output> {
        match self
            .gateway
            .complete(prompt, instruction, context, &self.settings.options)
            .await
        {
            Ok(completion) => {
                debug!(request_id = %completion.request_id, shape = S::NAME, "parsing completion");
                parse_structured::<S>(&completion.text)
            }
            Err(failure) => {
                warn!(shape = S::NAME, error = %failure, "provider unavailable; using fallback");
                Parsed::Fallback {
                    value: S::fallback(),
                    reason: ContractViolation::Gateway(failure.to_string()),
                }
            }
        }
    }

    fn emergency_for(
        &self,
        actor_id: &str,
        severity: SeverityLevel,
        diagnosis: &str,
        action: &str,
    ) -> Option<EmergencyEvent> {
        EmergencyEvent::new(
            actor_id,
            severity,
            diagnosis,
            action,
            jiff::Timestamp::now(),
            self.settings.dedup_window,
        )
        .ok()
    }
}

/// The highest of the provider severity and every risk-derived severity.
pub fn reconcile_severity(ai: SeverityLevel, risk: &[RiskAssessment]) -> SeverityLevel {
    risk.iter()
        .map(RiskAssessment::severity)
        .fold(ai, SeverityLevel::max)
}

fn escalation_note(severity: SeverityLevel) -> &'static str {
    match severity {
        SeverityLevel::Red => {
            "Your risk screening indicates a high chronic disease risk; seek medical care promptly."
        }
        _ => "Your risk screening indicates an elevated chronic disease risk; book a doctor's visit.",
    }
}

mod window_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
