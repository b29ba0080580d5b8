//! Wildfire risk report payload
//!
//! Mirrors the burnt-area bundle schema: each incident is a burnt area with a
//! centroid, burned surface and fire date; a report aggregates the incidents
//! near a query point into a 0-100 risk score.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::geo::GeoPoint;

/// A single burnt-area incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurntArea {
    pub id: String,
    /// Centroid latitude.
    pub lat: f64,
    /// Centroid longitude.
    pub lon: f64,
    pub area_hectares: f64,
    pub fire_date: Option<NaiveDate>,
    pub season_year: i32,
}

impl BurntArea {
    /// Distance from this incident's centroid to a query point, in km.
    ///
    /// Incidents with out-of-range centroids never match anything.
    pub fn distance_km(&self, point: &GeoPoint) -> f64 {
        match GeoPoint::new(self.lat, self.lon) {
            Ok(centroid) => centroid.distance_km(point),
            Err(_) => f64::INFINITY,
        }
    }
}

/// Coarse banding of a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 75.0 => Self::Extreme,
            s if s >= 50.0 => Self::High,
            s if s >= 25.0 => Self::Moderate,
            _ => Self::Low,
        }
    }
}

/// The point-data payload handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireRiskReport {
    /// Aggregate risk score in [0, 100].
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub incidents: Vec<BurntArea>,
    pub issued_at: DateTime<Utc>,
}

impl FireRiskReport {
    pub fn new(risk_score: f64, incidents: Vec<BurntArea>, issued_at: DateTime<Utc>) -> Self {
        let risk_score = risk_score.clamp(0.0, 100.0);
        Self {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            incidents,
            issued_at,
        }
    }
}
