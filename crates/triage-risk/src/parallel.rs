use tokio::task::JoinSet;
use tracing::{debug, warn};

use triage_core::models::risk::{RiskAssessment, RiskFamily};

use crate::error::RiskError;
use crate::features::RiskFeatureVector;

/// One family's outcome from [`score_all`].
#[derive(Debug, Clone)]
pub struct FamilyScore {
    pub family: RiskFamily,
    pub result: Result<RiskAssessment, RiskError>,
}

/// Score several families concurrently on the blocking pool and join them.
///
/// Results come back in request order. A failing family carries its own
/// error; the others are still returned.
pub async fn score_all(requests: Vec<(RiskFamily, RiskFeatureVector)>) -> Vec<FamilyScore> {
    let families: Vec<RiskFamily> = requests.iter().map(|(family, _)| *family).collect();
    let mut slots: Vec<Option<Result<RiskAssessment, RiskError>>> = vec![None; requests.len()];

    let mut tasks = JoinSet::new();
    for (index, (family, features)) in requests.into_iter().enumerate() {
        tasks.spawn_blocking(move || (index, crate::score(family, &features)));
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => warn!(error = %e, "risk scoring task did not complete"),
        }
    }

    families
        .into_iter()
        .zip(slots)
        .map(|(family, slot)| {
            let result = slot.unwrap_or_else(|| {
                Err(RiskError::TaskFailed {
                    family,
                    message: "scoring task aborted".to_string(),
                })
            });
            debug!(%family, ok = result.is_ok(), "risk family scored");
            FamilyScore { family, result }
        })
        .collect()
}
