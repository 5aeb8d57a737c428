pub mod chronic_risk_screening;
pub mod general_symptoms;
