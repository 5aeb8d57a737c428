//! Strict JSON contract over free-form provider output.
//!
//! Providers are asked for JSON but routinely wrap it in prose or code
//! fences. [`parse_structured`] strips fences, takes the span from the first
//! `{` to the last `}`, parses it and checks the shape's required fields.
//! Any failure yields the shape's conservative fallback (Yellow severity)
//! instead of an error.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use triage_core::models::severity::SeverityLevel;
use triage_core::models::triage::{Provenance, SymptomAnalysis, TriageResult, Urgency};

pub const FALLBACK_DIAGNOSIS: &str =
    "Your symptoms require further evaluation by a medical professional.";
pub const FALLBACK_ACTION: &str =
    "Please see a general practitioner for an in-person examination.";
pub const FALLBACK_DOCTOR: &str = "General Practitioner";

/// Why a provider answer was not accepted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("no JSON object in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is invalid: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("provider call failed: {0}")]
    Gateway(String),
}

/// A parse outcome: the provider's answer, or the safe default with the
/// reason it was used.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Ai(T),
    Fallback { value: T, reason: ContractViolation },
}

impl<T> Parsed<T> {
    pub fn value(&self) -> &T {
        match self {
            Parsed::Ai(value) | Parsed::Fallback { value, .. } => value,
        }
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            Parsed::Ai(_) => Provenance::Ai,
            Parsed::Fallback { .. } => Provenance::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Parsed::Fallback { .. })
    }

    pub fn into_parts(self) -> (T, Option<ContractViolation>) {
        match self {
            Parsed::Ai(value) => (value, None),
            Parsed::Fallback { value, reason } => (value, Some(reason)),
        }
    }
}

/// A response contract: the minimal field list, the conversion and the safe
/// default.
pub trait ResponseShape {
    type Output;

    /// Name used in logs.
    const NAME: &'static str;

    /// Fields that must be present, non-null and non-empty.
    const REQUIRED_FIELDS: &'static [&'static str];

    fn from_object(object: &Map<String, Value>) -> Result<Self::Output, ContractViolation>;

    fn fallback() -> Self::Output;
}

/// Parse `raw` against `S`, falling back on any violation. Never fails.
pub fn parse_structured<S: ResponseShape>(raw: &str) -> Parsed<S::Output> {
    match try_parse::<S>(raw) {
        Ok(value) => Parsed::Ai(value),
        Err(reason) => {
            warn!(shape = S::NAME, %reason, raw_len = raw.len(), "provider response rejected; using fallback");
            Parsed::Fallback {
                value: S::fallback(),
                reason,
            }
        }
    }
}

fn try_parse<S: ResponseShape>(raw: &str) -> Result<S::Output, ContractViolation> {
    let span = extract_json_span(strip_code_fences(raw)).ok_or(ContractViolation::NoJsonObject)?;
    let value: Value =
        serde_json::from_str(span).map_err(|e| ContractViolation::InvalidJson(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ContractViolation::InvalidJson("top-level value is not an object".to_string()))?;

    for field in S::REQUIRED_FIELDS {
        if is_absent(object.get(*field)) {
            return Err(ContractViolation::MissingField(*field));
        }
    }

    S::from_object(object)
}

/// Remove an opening code-fence line (with or without a language tag) and a
/// closing fence, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(newline) => &text[newline + 1..],
            None => text.trim_start_matches('`'),
        };
    }
    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }
    text.trim()
}

/// Greedy span from the first `{` to the last `}`.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ContractViolation> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .ok_or_else(|| ContractViolation::InvalidField {
            field,
            message: "expected a string".to_string(),
        })
}

fn severity_field(object: &Map<String, Value>) -> Result<SeverityLevel, ContractViolation> {
    required_str(object, "severity")?
        .parse()
        .map_err(|e: triage_core::error::CoreError| ContractViolation::InvalidField {
            field: "severity",
            message: e.to_string(),
        })
}

/// A list of strings, also accepting a single string.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Confidence as 0–100. Only float fractions in `[0, 1]` are scaled up; an
/// integer is already a percentage, so `1` means 1%.
fn confidence(value: Option<&Value>) -> Option<u8> {
    let number = value?.as_number()?;
    let n = number.as_f64()?;
    let percent = if number.is_f64() && (0.0..=1.0).contains(&n) {
        n * 100.0
    } else {
        n
    };
    (0.0..=100.0)
        .contains(&percent)
        .then(|| percent.round() as u8)
}

/// Answer to a completed clinical survey.
pub struct ClinicalSurveyShape;

impl ResponseShape for ClinicalSurveyShape {
    type Output = TriageResult;

    const NAME: &'static str = "clinical_survey";

    const REQUIRED_FIELDS: &'static [&'static str] =
        &["severity", "preliminary_diagnosis", "recommended_action"];

    fn from_object(object: &Map<String, Value>) -> Result<TriageResult, ContractViolation> {
        let severity = severity_field(object)?;
        // Urgency is optional; an unreadable value is treated as absent.
        let urgency = object
            .get("urgency")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Urgency>().ok())
            .unwrap_or_else(|| Urgency::floor_for(severity));

        Ok(TriageResult {
            severity,
            preliminary_diagnosis: required_str(object, "preliminary_diagnosis")?.to_string(),
            recommended_action: required_str(object, "recommended_action")?.to_string(),
            clinical_questions: string_list(object.get("clinical_questions")),
            urgency,
            provenance: Provenance::Ai,
            confidence: confidence(object.get("confidence")),
        })
    }

    fn fallback() -> TriageResult {
        TriageResult {
            severity: SeverityLevel::Yellow,
            preliminary_diagnosis: FALLBACK_DIAGNOSIS.to_string(),
            recommended_action: FALLBACK_ACTION.to_string(),
            clinical_questions: vec![
                "How long have you had these symptoms?".to_string(),
                "Have the symptoms been getting worse?".to_string(),
            ],
            urgency: Urgency::Medium,
            provenance: Provenance::Fallback,
            confidence: None,
        }
    }
}

/// Answer to a free-text symptom description.
pub struct SymptomAnalysisShape;

impl ResponseShape for SymptomAnalysisShape {
    type Output = SymptomAnalysis;

    const NAME: &'static str = "symptom_analysis";

    const REQUIRED_FIELDS: &'static [&'static str] =
        &["severity", "diagnosis", "recommendations", "doctor_type"];

    fn from_object(object: &Map<String, Value>) -> Result<SymptomAnalysis, ContractViolation> {
        let recommendations = string_list(object.get("recommendations"));
        if recommendations.is_empty() {
            return Err(ContractViolation::InvalidField {
                field: "recommendations",
                message: "expected at least one recommendation".to_string(),
            });
        }

        Ok(SymptomAnalysis {
            severity: severity_field(object)?,
            diagnosis: required_str(object, "diagnosis")?.to_string(),
            recommendations,
            doctor_type: required_str(object, "doctor_type")?.to_string(),
            provenance: Provenance::Ai,
        })
    }

    fn fallback() -> SymptomAnalysis {
        SymptomAnalysis {
            severity: SeverityLevel::Yellow,
            diagnosis: FALLBACK_DIAGNOSIS.to_string(),
            recommendations: vec![FALLBACK_ACTION.to_string()],
            doctor_type: FALLBACK_DOCTOR.to_string(),
            provenance: Provenance::Fallback,
        }
    }
}
