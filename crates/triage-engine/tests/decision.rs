use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use triage_core::models::profile::{PatientProfile, Sex};
use triage_core::models::risk::{RiskAssessment, RiskFamily, RiskLevel};
use triage_core::models::severity::SeverityLevel;
use triage_core::models::submission::{AnswerValue, SubmittedAnswer, SurveySubmission};
use triage_core::models::triage::{Provenance, Urgency};
use triage_engine::contract::ContractViolation;
use triage_engine::decision::{DecisionSettings, TriageDecisionService, reconcile_severity};
use triage_gateway::context::ChatMessage;
use triage_gateway::error::GatewayFailure;
use triage_gateway::gateway::TextCompletionGateway;
use triage_gateway::provider::{BoxFuture, CompletionProvider, ProviderReply, ProviderRequest};

enum Behavior {
    Reply(String),
    Fail(GatewayFailure),
    Hang,
}

struct ScriptedProvider {
    behavior: Behavior,
    calls: AtomicUsize,
    last_request: Mutex<Option<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn replying(text: &str) -> Arc<Self> {
        Self::new(Behavior::Reply(text.to_string()))
    }
}

impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> BoxFuture<'a, Result<ProviderReply, GatewayFailure>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().await = Some(request.clone());
            match &self.behavior {
                Behavior::Reply(text) => Ok(ProviderReply {
                    text: text.clone(),
                    model_id: "scripted-model".to_string(),
                    usage: None,
                }),
                Behavior::Fail(failure) => Err(failure.clone()),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3_600)).await;
                    Err(GatewayFailure::EmptyResponse)
                }
            }
        })
    }
}

fn service(provider: Arc<ScriptedProvider>) -> TriageDecisionService {
    TriageDecisionService::new(
        TextCompletionGateway::new(provider),
        DecisionSettings::default(),
    )
}

fn submission() -> SurveySubmission {
    SurveySubmission {
        survey_id: "general_symptoms".to_string(),
        actor_id: "patient-17".to_string(),
        chief_complaint: Some("Chest pain spreading to the left arm".to_string()),
        answers: vec![
            SubmittedAnswer {
                step_id: "main_complaint".to_string(),
                prompt: "What is your main complaint?".to_string(),
                value: AnswerValue::Text("Chest pain spreading to the left arm".to_string()),
            },
            SubmittedAnswer {
                step_id: "intensity".to_string(),
                prompt: "How severe is it from 1 to 10?".to_string(),
                value: AnswerValue::Scale(8),
            },
        ],
        submitted_at: jiff::Timestamp::now(),
    }
}

fn profile() -> PatientProfile {
    PatientProfile {
        name: Some("Budi Santoso".to_string()),
        email: Some("budi@example.com".to_string()),
        phone: Some("+62 812 0000 0000".to_string()),
        age: Some(58),
        sex: Some(Sex::Male),
        blood_type: Some("O+".to_string()),
        allergies: vec!["penicillin".to_string()],
        chronic_conditions: vec![],
    }
}

fn assessment(family: RiskFamily, level: RiskLevel) -> RiskAssessment {
    RiskAssessment {
        family,
        condition: family.id().to_string(),
        score: 0.5,
        level,
        factors: vec![],
        recommendations: vec![],
    }
}

const GREEN_REPLY: &str = r#"{"severity":"Green","preliminary_diagnosis":"Muscle strain","recommended_action":"Rest and take paracetamol","clinical_questions":[],"urgency":"low"}"#;

#[tokio::test]
async fn red_reply_in_prose_yields_ai_emergency() {
    let reply = "Assessment follows.\n```json\n{\"severity\":\"Red\",\"preliminary_diagnosis\":\"Possible myocardial infarction\",\"recommended_action\":\"Call emergency services\",\"urgency\":\"emergency\"}\n```\nStay safe.";
    let provider = ScriptedProvider::replying(reply);
    let decision = service(provider.clone())
        .decide(&submission(), &profile(), &[])
        .await;

    assert_eq!(decision.result.provenance, Provenance::Ai);
    assert_eq!(decision.result.severity, SeverityLevel::Red);
    assert!(decision.fallback_reason.is_none());

    let event = decision.emergency.expect("red decision carries an event");
    assert_eq!(event.severity, SeverityLevel::Red);
    assert_eq!(event.actor_id, "patient-17");
    assert!(event.dedup_key.as_str().starts_with("patient-17:"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn provider_timeout_yields_yellow_fallback() {
    let provider = ScriptedProvider::new(Behavior::Hang);
    let decision = service(provider).decide(&submission(), &profile(), &[]).await;

    assert_eq!(decision.result.provenance, Provenance::Fallback);
    assert_eq!(decision.result.severity, SeverityLevel::Yellow);
    assert!(decision.emergency.is_none());
    assert!(matches!(
        decision.fallback_reason,
        Some(ContractViolation::Gateway(_))
    ));
}

#[tokio::test]
async fn provider_failure_is_not_retried() {
    let provider = ScriptedProvider::new(Behavior::Fail(GatewayFailure::Status {
        status: 503,
        message: "unavailable".to_string(),
    }));
    let decision = service(provider.clone())
        .decide(&submission(), &profile(), &[])
        .await;

    assert_eq!(decision.result.provenance, Provenance::Fallback);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn risk_screening_raises_severity_and_urgency() {
    let provider = ScriptedProvider::replying(GREEN_REPLY);
    let risk = [assessment(RiskFamily::Cardiovascular, RiskLevel::SangatTinggi)];
    let decision = service(provider).decide(&submission(), &profile(), &risk).await;

    assert_eq!(decision.result.provenance, Provenance::Ai);
    assert_eq!(decision.result.severity, SeverityLevel::Red);
    assert_eq!(decision.result.urgency, Urgency::Emergency);
    assert!(decision.result.recommended_action.ends_with("Rest and take paracetamol"));
    assert_ne!(decision.result.recommended_action, "Rest and take paracetamol");
    assert!(decision.emergency.is_some());
}

#[tokio::test]
async fn lower_risk_never_lowers_ai_severity() {
    let reply = r#"{"severity":"Red","preliminary_diagnosis":"Stroke suspected","recommended_action":"Call an ambulance"}"#;
    let provider = ScriptedProvider::replying(reply);
    let risk = [assessment(RiskFamily::Diabetes, RiskLevel::Rendah)];
    let decision = service(provider).decide(&submission(), &profile(), &risk).await;

    assert_eq!(decision.result.severity, SeverityLevel::Red);
    assert_eq!(decision.result.recommended_action, "Call an ambulance");
}

#[test]
fn reconciled_severity_is_never_below_any_input() {
    let severities = [SeverityLevel::Green, SeverityLevel::Yellow, SeverityLevel::Red];
    let levels = [
        RiskLevel::Rendah,
        RiskLevel::Sedang,
        RiskLevel::Tinggi,
        RiskLevel::SangatTinggi,
    ];

    for ai in severities {
        for first in levels {
            for second in levels {
                let risk = [
                    assessment(RiskFamily::Diabetes, first),
                    assessment(RiskFamily::Hypertension, second),
                ];
                let resolved = reconcile_severity(ai, &risk);
                assert!(resolved >= ai);
                assert!(resolved >= first.severity());
                assert!(resolved >= second.severity());
                assert!(resolved == ai || resolved == first.severity() || resolved == second.severity());
            }
        }
    }
}

#[tokio::test]
async fn prompt_carries_redacted_profile_only() {
    let provider = ScriptedProvider::replying(GREEN_REPLY);
    service(provider.clone())
        .decide(&submission(), &profile(), &[])
        .await;

    let request = provider.last_request.lock().await.clone().expect("request recorded");
    let prompt = &request.messages.last().expect("prompt turn").content;
    assert!(prompt.contains("Chest pain spreading to the left arm"));
    assert!(prompt.contains("penicillin"));
    assert!(!prompt.contains("budi@example.com"));
    assert!(!prompt.contains("Budi Santoso"));
    assert!(!prompt.contains("+62 812"));
    assert_eq!(request.top_k, 40);
}

#[tokio::test]
async fn symptom_analysis_trims_history() {
    let reply = r#"{"severity":"Yellow","diagnosis":"Gastroenteritis","recommendations":["Drink oral rehydration salts"],"doctor_type":"General Practitioner"}"#;
    let provider = ScriptedProvider::replying(reply);
    let settings = DecisionSettings {
        context_char_limit: 10,
        ..DecisionSettings::default()
    };
    let service = TriageDecisionService::new(TextCompletionGateway::new(provider.clone()), settings);

    let history = vec![
        ChatMessage::user("I have had diarrhoea since yesterday evening"),
        ChatMessage::assistant("How many times today?"),
    ];
    let decision = service
        .analyze_symptoms("patient-3", "Five times, with cramps", &history, &profile(), &[])
        .await;

    assert_eq!(decision.analysis.provenance, Provenance::Ai);
    assert_eq!(decision.analysis.severity, SeverityLevel::Yellow);
    assert!(decision.emergency.is_none());

    let request = provider.last_request.lock().await.clone().expect("request recorded");
    assert_eq!(request.messages.len(), 3);
    assert_eq!(request.messages[0].content, "I have had");
    assert!(request.messages[2].content.contains("Five times, with cramps"));
}

#[tokio::test]
async fn symptom_analysis_escalates_on_high_risk() {
    let reply = r#"{"severity":"Green","diagnosis":"Mild headache","recommendations":["Rest"],"doctor_type":"General Practitioner"}"#;
    let provider = ScriptedProvider::replying(reply);
    let risk = [assessment(RiskFamily::Hypertension, RiskLevel::Tinggi)];
    let decision = service(provider)
        .analyze_symptoms("patient-9", "Headache", &[], &profile(), &risk)
        .await;

    assert_eq!(decision.analysis.severity, SeverityLevel::Red);
    assert_eq!(decision.analysis.recommendations.len(), 2);
    assert_eq!(decision.analysis.recommendations[1], "Rest");
    assert!(decision.emergency.is_some());
}
