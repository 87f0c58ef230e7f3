//! Core type definitions used throughout the codebase

use geo::{HaversineBearing, HaversineDistance, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a place on the map
///
/// Seed landmarks use readable ids (`base-1`); items added during play get
/// short random ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh 9-character id
    pub fn generate() -> Self {
        let raw = Uuid::new_v4().simple().to_string();
        Self(raw[..9].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for visitors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitorId(pub Uuid);

impl VisitorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VisitorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Geographic position in degrees
///
/// Arithmetic treats (lat, lng) as a planar vector, which is what the visitor
/// stepper works in. Use [`LatLng::distance_meters`] when a real ground
/// distance is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar distance in degrees
    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }

    pub fn length(&self) -> f64 {
        (self.lat * self.lat + self.lng * self.lng).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                lat: self.lat / len,
                lng: self.lng / len,
            }
        } else {
            Self::default()
        }
    }

    /// Great-circle distance in metres
    pub fn distance_meters(&self, other: &Self) -> f64 {
        self.to_point().haversine_distance(&other.to_point())
    }

    /// Initial bearing towards `other`, degrees clockwise from north
    pub fn bearing_to(&self, other: &Self) -> f64 {
        self.to_point().haversine_bearing(other.to_point())
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

impl std::ops::Add for LatLng {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { lat: self.lat + rhs.lat, lng: self.lng + rhs.lng }
    }
}

impl std::ops::Sub for LatLng {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { lat: self.lat - rhs.lat, lng: self.lng - rhs.lng }
    }
}

impl std::ops::Mul<f64> for LatLng {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self { lat: self.lat * rhs, lng: self.lng * rhs }
    }
}

impl std::ops::AddAssign for LatLng {
    fn add_assign(&mut self, rhs: Self) {
        self.lat += rhs.lat;
        self.lng += rhs.lng;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_item_ids_are_short_and_distinct() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert_eq!(a.as_str().len(), 9);
        assert_ne!(a, b);
    }

    #[test]
    fn test_item_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ItemId::new("base-1")).unwrap();
        assert_eq!(json, "\"base-1\"");
    }

    #[test]
    fn test_planar_distance() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let v = LatLng::default().normalize();
        assert_eq!(v, LatLng::default());
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = LatLng::new(0.003, -0.004).normalize();
        assert!((v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_meters_matches_spawn_radius_scale() {
        // 0.008 degrees of latitude is roughly 890 m
        let a = LatLng::new(35.70, 140.60);
        let b = LatLng::new(35.708, 140.60);
        let d = a.distance_meters(&b);
        assert!(d > 850.0 && d < 920.0, "got {d}");
    }

    #[test]
    fn test_bearing_due_north_and_east() {
        let origin = LatLng::new(35.70, 140.60);
        let north = origin.bearing_to(&LatLng::new(35.71, 140.60));
        let east = origin.bearing_to(&LatLng::new(35.70, 140.61));
        assert!(north.abs() < 0.01, "north bearing {north}");
        assert!((east - 90.0).abs() < 0.1, "east bearing {east}");
    }
}
