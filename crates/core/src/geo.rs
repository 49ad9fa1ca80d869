//! Geographic primitives and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl ValueObject for GeoPoint {}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within ±90 latitude / ±180 longitude.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "coordinates out of range (lat={}, lng={})",
                self.lat, self.lng
            )))
        }
    }

    /// Rounded great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }
}

/// How a location was obtained.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LocationSource {
    Gps,
    Network,
    Manual,
}

/// A point plus its human-readable address parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<LocationSource>,
}

impl ValueObject for Location {}

impl Location {
    pub fn at(point: GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
            address: None,
            state: None,
            city: None,
            pincode: None,
            source: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }

    pub fn with_source(mut self, source: LocationSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Address label, or `"lat, lng"` when none was recorded.
    pub fn label(&self) -> String {
        match &self.address {
            Some(a) if !a.trim().is_empty() => a.clone(),
            _ => format!("{:.4}, {:.4}", self.lat, self.lng),
        }
    }
}

/// Great-circle distance between two points in kilometers, rounded to one
/// decimal place.
///
/// No range validation happens here: out-of-range or non-finite input yields
/// `NaN` (or a meaningless number), which callers must screen with
/// [`GeoPoint::is_valid`] if they care.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Near-antipodal rounding can push `h` past 1; NaN must fall through untouched.
    let h = if h > 1.0 { 1.0 } else { h };

    round_to_tenth(2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt()))
}

/// Round to one decimal place (half away from zero).
pub fn round_to_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BENGALURU: GeoPoint = GeoPoint::new(12.9716, 77.5946);
    const MYSURU: GeoPoint = GeoPoint::new(12.2958, 76.6394);

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(haversine_km(BENGALURU, BENGALURU), 0.0);
    }

    #[test]
    fn known_city_pair_distance() {
        // Straight-line Bengaluru–Mysuru is roughly 128 km.
        let d = haversine_km(BENGALURU, MYSURU);
        assert!((d - 128.0).abs() < 2.0, "unexpected distance {d}");
    }

    #[test]
    fn result_has_one_decimal_place() {
        let d = haversine_km(BENGALURU, GeoPoint::new(12.98, 77.60));
        assert_eq!(d, round_to_tenth(d));
    }

    #[test]
    fn invalid_input_propagates_nan() {
        let d = haversine_km(BENGALURU, GeoPoint::new(f64::NAN, 77.0));
        assert!(d.is_nan());
        assert!(!GeoPoint::new(f64::NAN, 77.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
    }

    #[test]
    fn validate_reports_out_of_range_coordinates() {
        let err = GeoPoint::new(120.0, 10.0).validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn location_source_uses_uppercase_tags() {
        let loc = Location::at(BENGALURU).with_source(LocationSource::Gps);
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["source"], "GPS");
        assert!(json.get("address").is_none());
    }

    #[test]
    fn label_falls_back_to_coordinates() {
        let loc = Location::at(GeoPoint::new(12.5, 77.25));
        assert_eq!(loc.label(), "12.5000, 77.2500");
        assert_eq!(loc.with_address("MG Road").label(), "MG Road");
    }

    fn point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| GeoPoint::new(lat, lng))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            .. ProptestConfig::default()
        })]

        /// Property: distance is symmetric.
        #[test]
        fn distance_is_symmetric(a in point(), b in point()) {
            prop_assert_eq!(haversine_km(a, b), haversine_km(b, a));
        }

        /// Property: distance from a point to itself is zero.
        #[test]
        fn distance_identity(a in point()) {
            prop_assert_eq!(haversine_km(a, a), 0.0);
        }

        /// Property: distance never exceeds half the circumference.
        #[test]
        fn distance_is_bounded(a in point(), b in point()) {
            let d = haversine_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= (core::f64::consts::PI * EARTH_RADIUS_KM).ceil());
        }
    }
}
