use triage_core::models::risk::{RiskFamily, RiskLevel};
use triage_risk::error::RiskError;
use triage_risk::features::RiskFeatureVector;
use triage_risk::parallel::score_all;

#[tokio::test]
async fn scores_three_families_in_request_order() {
    let features = RiskFeatureVector {
        family_history: true,
        ..RiskFeatureVector::new(50.0, 27.0)
    };
    let results = score_all(vec![
        (RiskFamily::Diabetes, features.clone()),
        (RiskFamily::Hypertension, features.clone()),
        (RiskFamily::Cardiovascular, features),
    ])
    .await;

    let families: Vec<_> = results.iter().map(|r| r.family).collect();
    assert_eq!(
        families,
        vec![
            RiskFamily::Diabetes,
            RiskFamily::Hypertension,
            RiskFamily::Cardiovascular
        ]
    );
    assert!(results.iter().all(|r| r.result.is_ok()));
    assert_eq!(results[0].result.as_ref().unwrap().level, RiskLevel::Sedang);
}

#[tokio::test]
async fn one_failure_keeps_the_others() {
    let good = RiskFeatureVector::new(40.0, 22.0);
    let bad = RiskFeatureVector::new(40.0, 0.0);

    let results = score_all(vec![
        (RiskFamily::Diabetes, good.clone()),
        (RiskFamily::Hypertension, bad),
        (RiskFamily::Cardiovascular, good),
    ])
    .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].result.is_ok());
    assert!(matches!(
        results[1].result,
        Err(RiskError::InvalidFeatures(_))
    ));
    assert!(results[2].result.is_ok());
}

#[tokio::test]
async fn empty_request_returns_nothing() {
    assert!(score_all(Vec::new()).await.is_empty());
}
