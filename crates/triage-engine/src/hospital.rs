use serde::{Deserialize, Serialize};

use triage_core::models::emergency::Coordinates;
use triage_core::models::severity::SeverityLevel;

use crate::error::EscalationError;
use crate::escalation::BoxFuture;

const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub coordinates: Coordinates,
    /// Whether the facility runs a 24-hour emergency department.
    pub emergency_capable: bool,
    /// Distance from the query point, filled in by the lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Facility search collaborator.
pub trait HospitalLookup: Send + Sync {
    /// Facilities suitable for `severity`, nearest first.
    fn find_by_severity<'a>(
        &'a self,
        severity: SeverityLevel,
        coordinates: Coordinates,
    ) -> BoxFuture<'a, Result<Vec<Facility>, EscalationError>>;
}

/// Fixed in-memory facility list.
#[derive(Debug, Clone, Default)]
pub struct StaticHospitalDirectory {
    facilities: Vec<Facility>,
}

impl StaticHospitalDirectory {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Synchronous form of [`HospitalLookup::find_by_severity`].
    pub fn nearest(&self, severity: SeverityLevel, origin: Coordinates) -> Vec<Facility> {
        let mut found: Vec<Facility> = self
            .facilities
            .iter()
            .filter(|f| !severity.is_emergency() || f.emergency_capable)
            .map(|f| Facility {
                distance_km: Some(haversine_km(origin, f.coordinates)),
                ..f.clone()
            })
            .collect();
        found.sort_by(|a, b| {
            a.distance_km
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
        });
        found
    }
}

impl HospitalLookup for StaticHospitalDirectory {
    fn find_by_severity<'a>(
        &'a self,
        severity: SeverityLevel,
        coordinates: Coordinates,
    ) -> BoxFuture<'a, Result<Vec<Facility>, EscalationError>> {
        Box::pin(async move { Ok(self.nearest(severity, coordinates)) })
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
