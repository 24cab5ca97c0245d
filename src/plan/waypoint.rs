use serde::{Deserialize, Serialize};

/// A single position of a flight path.
///
/// Construction never validates; use [`Waypoint::is_valid`] to check the ranges.
/// `radius` is the distance in meters within which the waypoint counts as reached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub orientation: f64,
    pub radius: f64,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64, altitude: f64, orientation: f64, radius: f64) -> Self {
        Waypoint {
            latitude,
            longitude,
            altitude,
            orientation,
            radius,
        }
    }

    /// Altitude is relative to the launch point and not checked.
    pub fn is_valid(&self) -> bool {
        (-90_f64..=90_f64).contains(&self.latitude)
            && (-180_f64..=180_f64).contains(&self.longitude)
            && (0_f64..=360_f64).contains(&self.orientation)
            && self.radius >= 0_f64
    }

    /// JSON has no representation for NaN or infinity.
    pub fn is_finite(&self) -> bool {
        [self.latitude, self.longitude, self.altitude, self.orientation, self.radius]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn position(&self) -> PointOfInterest {
        PointOfInterest::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub lat: f64,
    #[serde(rename = "lng", alias = "lon")]
    pub lon: f64,
}

impl PointOfInterest {
    pub fn new(lat: f64, lon: f64) -> Self {
        PointOfInterest { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}
