//! Geodesy helpers
//!
//! Great-circle distance on a spherical Earth and a lat/lon bounding box
//! used to prefilter candidates before the exact distance check.

use thiserror::Error;

/// Mean Earth radius (IUGG), in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Miles per kilometre
pub const MILES_PER_KM: f64 = 0.621371192;

pub fn miles_to_km(miles: f64) -> f64 {
    miles / MILES_PER_KM
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),

    #[error("longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Rejects NaN, infinities and out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self, other)
    }
}

/// Haversine great-circle distance in kilometres
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

// ============================================================================
// Bounding box
// ============================================================================

/// Lat/lon rectangle enclosing every point within a radius of a center
///
/// When `min_longitude > max_longitude` the box crosses the antimeridian
/// and covers `[min_longitude, 180] ∪ [-180, max_longitude]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn around(center: &GeoPoint, radius_km: f64) -> Self {
        let radius_km = radius_km.max(0.0);
        let angular = radius_km / EARTH_RADIUS_KM;
        let d_lat = angular.to_degrees();

        let min_latitude = (center.latitude - d_lat).max(-90.0);
        let max_latitude = (center.latitude + d_lat).min(90.0);

        // A box reaching a pole covers every longitude.
        let reaches_pole = min_latitude <= -90.0 || max_latitude >= 90.0;
        let cos_lat = center.latitude.to_radians().cos();
        let ratio = if cos_lat > 0.0 {
            angular.sin() / cos_lat
        } else {
            f64::INFINITY
        };

        if reaches_pole || angular >= std::f64::consts::FRAC_PI_2 || ratio >= 1.0 {
            return Self {
                min_latitude,
                max_latitude,
                min_longitude: -180.0,
                max_longitude: 180.0,
            };
        }

        let d_lon = ratio.asin().to_degrees();
        let mut min_longitude = center.longitude - d_lon;
        let mut max_longitude = center.longitude + d_lon;
        if min_longitude < -180.0 {
            min_longitude += 360.0;
        }
        if max_longitude > 180.0 {
            max_longitude -= 360.0;
        }

        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.min_longitude > self.max_longitude
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        if point.latitude < self.min_latitude || point.latitude > self.max_latitude {
            return false;
        }
        if self.crosses_antimeridian() {
            point.longitude >= self.min_longitude || point.longitude <= self.max_longitude
        } else {
            point.longitude >= self.min_longitude && point.longitude <= self.max_longitude
        }
    }
}
