use triage_core::models::risk::RiskLevel;

use crate::features::RiskFeatureVector;

/// Score ceiling in hundredths. Sums above it are clamped, never scaled.
pub const MAX_POINTS: u32 = 100;

/// One additive row of a point table.
pub struct FactorRule {
    pub description: &'static str,
    /// Contribution in hundredths of the score.
    pub points: u32,
    pub applies: fn(&RiskFeatureVector) -> bool,
}

pub fn points_to_score(points: u32) -> f64 {
    f64::from(points.min(MAX_POINTS)) / 100.0
}

/// Fixed breakpoints: < 0.30 Rendah, < 0.60 Sedang, < 0.80 Tinggi.
pub fn level_for_points(points: u32) -> RiskLevel {
    match points {
        0..30 => RiskLevel::Rendah,
        30..60 => RiskLevel::Sedang,
        60..80 => RiskLevel::Tinggi,
        _ => RiskLevel::SangatTinggi,
    }
}
