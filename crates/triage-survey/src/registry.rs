use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::SurveyDefinition;
use crate::error::SurveyError;
use crate::surveys;

/// The set of surveys an orchestrator can start. Loaded once and injected.
#[derive(Debug, Clone, Default)]
pub struct SurveyRegistry {
    surveys: HashMap<String, Arc<SurveyDefinition>>,
}

impl SurveyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in survey.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for definition in [
            surveys::general_symptoms::definition(),
            surveys::chronic_risk_screening::definition(),
        ] {
            // Built-ins are covered by tests; a broken one is skipped, not fatal.
            if let Err(e) = registry.register(definition) {
                tracing::error!(error = %e, "built-in survey rejected");
            }
        }
        registry
    }

    /// Validate and add a definition, replacing any with the same id.
    pub fn register(&mut self, definition: SurveyDefinition) -> Result<(), SurveyError> {
        definition.validate()?;
        self.surveys
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<SurveyDefinition>> {
        self.surveys.get(id).cloned()
    }

    /// Registered survey ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.surveys.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
