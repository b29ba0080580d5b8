//! Terminal fallback tier backed by a bundled incident list
//!
//! The bundle is statically defined data shipped with the application; the
//! source filters it to the query point's surroundings and derives a risk
//! score. No I/O, no failure modes.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::geo::GeoPoint;
use crate::domain::{BurntArea, Clock, FireRiskReport, ProviderId, StaticSource};

/// Days after which an incident stops counting as recent.
const RECENT_WINDOW_DAYS: i64 = 365;

/// Never-failing data source over a fixed burnt-area bundle.
#[derive(Debug)]
pub struct StaticBundleSource {
    id: ProviderId,
    clock: Arc<dyn Clock>,
    areas: Vec<BurntArea>,
    radius_km: f64,
}

impl StaticBundleSource {
    pub fn new(clock: Arc<dyn Clock>, areas: Vec<BurntArea>) -> Self {
        Self {
            id: ProviderId::new("static-bundle"),
            clock,
            areas,
            radius_km: 150.0,
        }
    }

    /// Narrows or widens the neighborhood considered around a query point.
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km.max(1.0);
        self
    }

    /// Contribution of one incident at `distance_km` to the overall score.
    fn score_for(&self, incident: &BurntArea, distance_km: f64, now: DateTime<Utc>) -> f64 {
        let proximity = 1.0 - (distance_km / self.radius_km);
        let size = (incident.area_hectares / 500.0).min(1.0);
        let recency = match incident.fire_date {
            Some(date) if (now.date_naive() - date).num_days() <= RECENT_WINDOW_DAYS => 1.0,
            _ => 0.4,
        };

        25.0 * proximity * (0.5 + size) * recency
    }
}

impl StaticSource<FireRiskReport> for StaticBundleSource {
    fn id(&self) -> ProviderId {
        self.id.clone()
    }

    fn resolve(&self, point: GeoPoint) -> FireRiskReport {
        let now = self.clock.now();

        let mut nearby: Vec<(f64, &BurntArea)> = self
            .areas
            .iter()
            .map(|area| (area.distance_km(&point), area))
            .filter(|(distance, _)| *distance <= self.radius_km)
            .collect();
        nearby.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let score: f64 = nearby
            .iter()
            .map(|(distance, area)| self.score_for(area, *distance, now))
            .sum();
        let incidents = nearby.into_iter().map(|(_, area)| area.clone()).collect();

        FireRiskReport::new(score, incidents, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskLevel;
    use crate::domain::clock::mock::ManualClock;
    use chrono::NaiveDate;

    fn area(id: &str, lat: f64, lon: f64, hectares: f64, date: Option<NaiveDate>) -> BurntArea {
        BurntArea {
            id: id.to_string(),
            lat,
            lon,
            area_hectares: hectares,
            fire_date: date,
            season_year: 2025,
        }
    }

    fn source_with(areas: Vec<BurntArea>) -> StaticBundleSource {
        StaticBundleSource::new(Arc::new(ManualClock::fixed()), areas)
    }

    #[test]
    fn test_empty_bundle_resolves_to_low_risk() {
        let source = source_with(vec![]);
        let report = source.resolve(GeoPoint::new(55.95, -3.19).unwrap());

        assert_eq!(report.risk_score, 0.0);
        assert_eq!(report.risk_level, RiskLevel::Low);
        assert!(report.incidents.is_empty());
    }

    #[test]
    fn test_distant_incidents_are_filtered_out() {
        // Sydney is nowhere near Edinburgh
        let source = source_with(vec![area("far", -33.87, 151.21, 900.0, None)]);
        let report = source.resolve(GeoPoint::new(55.95, -3.19).unwrap());

        assert!(report.incidents.is_empty());
        assert_eq!(report.risk_score, 0.0);
    }

    #[test]
    fn test_recent_large_nearby_fire_scores_highest() {
        let recent = NaiveDate::from_ymd_opt(2025, 5, 20);
        let old = NaiveDate::from_ymd_opt(2019, 7, 1);

        let near_recent = source_with(vec![area("a", 55.96, -3.20, 600.0, recent)]);
        let near_old = source_with(vec![area("b", 55.96, -3.20, 600.0, old)]);
        let far_recent = source_with(vec![area("c", 56.9, -4.5, 600.0, recent)]);

        let point = GeoPoint::new(55.95, -3.19).unwrap();
        let s1 = near_recent.resolve(point).risk_score;
        let s2 = near_old.resolve(point).risk_score;
        let s3 = far_recent.resolve(point).risk_score;

        assert!(s1 > s2, "recency should raise the score ({} vs {})", s1, s2);
        assert!(s1 > s3, "proximity should raise the score ({} vs {})", s1, s3);
    }

    #[test]
    fn test_incidents_sorted_by_distance() {
        let source = source_with(vec![
            area("farther", 56.3, -3.5, 50.0, None),
            area("nearest", 55.96, -3.20, 50.0, None),
        ]);

        let report = source.resolve(GeoPoint::new(55.95, -3.19).unwrap());
        assert_eq!(report.incidents.len(), 2);
        assert_eq!(report.incidents[0].id, "nearest");
    }

    #[test]
    fn test_score_is_capped_at_100() {
        let recent = NaiveDate::from_ymd_opt(2025, 5, 20);
        let areas = (0..40)
            .map(|i| area(&format!("ba-{}", i), 55.96, -3.20, 800.0, recent))
            .collect();

        let report = source_with(areas).resolve(GeoPoint::new(55.95, -3.19).unwrap());
        assert_eq!(report.risk_score, 100.0);
        assert_eq!(report.risk_level, RiskLevel::Extreme);
    }

    #[test]
    fn test_report_issued_at_comes_from_clock() {
        let clock = Arc::new(ManualClock::fixed());
        let source = StaticBundleSource::new(clock.clone(), vec![]);

        let report = source.resolve(GeoPoint::new(55.95, -3.19).unwrap());
        assert_eq!(report.issued_at, clock.now());
    }
}
