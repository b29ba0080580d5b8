use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A validated geographic point.
///
/// Construction fails on non-finite values or coordinates outside
/// latitude [-90, 90] / longitude [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::validation(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::validation(format!(
                "longitude {} outside [-180, 180]",
                lon
            )));
        }

        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to another point in kilometres (haversine).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Result<Self, DomainError> {
        if lat_min > lat_max || lon_min > lon_max {
            return Err(DomainError::validation(format!(
                "inverted bounds: lat {}..{}, lon {}..{}",
                lat_min, lat_max, lon_min, lon_max
            )));
        }

        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat() >= self.lat_min
            && point.lat() <= self.lat_max
            && point.lon() >= self.lon_min
            && point.lon() <= self.lon_max
    }

    /// Centre of the box; valid because the constructor enforced ordering.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(55.95, -3.19).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(90.1, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_distance_km() {
        // Edinburgh to Glasgow, roughly 67 km
        let edinburgh = GeoPoint::new(55.9533, -3.1883).unwrap();
        let glasgow = GeoPoint::new(55.8642, -4.2518).unwrap();

        let d = edinburgh.distance_km(&glasgow);
        assert!((60.0..75.0).contains(&d), "unexpected distance {}", d);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(51.5, -0.12).unwrap();
        assert!(p.distance_km(&p) < 1e-9);
    }

    #[test]
    fn test_bounds_validation() {
        assert!(GeoBounds::new(49.0, 62.0, -12.0, 3.0).is_ok());
        assert!(GeoBounds::new(62.0, 49.0, -12.0, 3.0).is_err());
        assert!(GeoBounds::new(49.0, 62.0, 3.0, -12.0).is_err());
    }

    #[test]
    fn test_bounds_contains() {
        let uk = GeoBounds::new(49.0, 62.0, -12.0, 3.0).unwrap();

        assert!(uk.contains(&GeoPoint::new(55.95, -3.19).unwrap()));
        assert!(!uk.contains(&GeoPoint::new(40.4, -3.7).unwrap())); // Madrid
    }

    #[test]
    fn test_bounds_center() {
        let b = GeoBounds::new(0.0, 10.0, -20.0, 0.0).unwrap();
        assert_eq!(b.center(), (5.0, -10.0));
    }
}
