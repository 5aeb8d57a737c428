//! triage-risk
//!
//! Rule-based chronic disease risk scoring. Pure data and arithmetic: every
//! score is a transparent sum of declared factor points, clamped to `[0, 1]`
//! and discretized with fixed breakpoints.

pub mod error;
pub mod families;
pub mod features;
pub mod parallel;
pub mod scoring;

use triage_core::models::risk::{RiskAssessment, RiskFamily, RiskLevel};

use error::RiskError;
use features::RiskFeatureVector;
use scoring::{FactorRule, MAX_POINTS};

/// Trait implemented by each risk family's point table.
pub trait RiskModel: Send + Sync {
    fn family(&self) -> RiskFamily;

    /// Display name of the condition (e.g. "Type 2 Diabetes").
    fn condition(&self) -> &str;

    /// The additive point table, in display order.
    fn rules(&self) -> &[FactorRule];

    /// Static recommendation lookup for a level and the factors present.
    fn recommendations(&self, level: RiskLevel, features: &RiskFeatureVector) -> Vec<String>;
}

/// Return the model for a family.
pub fn model_for(family: RiskFamily) -> &'static dyn RiskModel {
    match family {
        RiskFamily::Diabetes => &families::diabetes::Diabetes,
        RiskFamily::Hypertension => &families::hypertension::Hypertension,
        RiskFamily::Cardiovascular => &families::cardiovascular::Cardiovascular,
    }
}

/// Sum of matched factor points before clamping, in hundredths.
pub fn raw_points(family: RiskFamily, features: &RiskFeatureVector) -> Result<u32, RiskError> {
    features.validate()?;
    Ok(matched_rules(model_for(family), features)
        .map(|rule| rule.points)
        .sum())
}

/// Score one family. Fails with [`RiskError::InvalidFeatures`] when age or
/// BMI is not positive.
pub fn score(family: RiskFamily, features: &RiskFeatureVector) -> Result<RiskAssessment, RiskError> {
    features.validate()?;
    let model = model_for(family);

    let mut raw = 0u32;
    let mut factors = Vec::new();
    for rule in matched_rules(model, features) {
        raw += rule.points;
        factors.push(rule.description.to_string());
    }

    let points = raw.min(MAX_POINTS);
    let level = scoring::level_for_points(points);

    Ok(RiskAssessment {
        family,
        condition: model.condition().to_string(),
        score: scoring::points_to_score(points),
        level,
        factors,
        recommendations: model.recommendations(level, features),
    })
}

fn matched_rules<'a>(
    model: &'a dyn RiskModel,
    features: &'a RiskFeatureVector,
) -> impl Iterator<Item = &'a FactorRule> {
    model
        .rules()
        .iter()
        .filter(move |rule| (rule.applies)(features))
}
