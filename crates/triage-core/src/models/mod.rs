pub mod emergency;
pub mod profile;
pub mod risk;
pub mod severity;
pub mod submission;
pub mod triage;
