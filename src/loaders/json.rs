use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::FlightplanResult;
use crate::plan::{PointOfInterest, Waypoint};

use super::FlightplanParts;

/// On-disk shape of `<name>.flightplan.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightplanDocument {
    #[serde(default)]
    pub name: String,
    /// Empty when no mavlink had been generated.
    #[serde(default)]
    pub mavlink: String,
    #[serde(default)]
    pub take_off_position: Option<Waypoint>,
    #[serde(default)]
    pub touch_down_position: Option<Waypoint>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
}

impl FlightplanDocument {
    pub fn from_parts(parts: FlightplanParts, mavlink: Option<String>) -> Self {
        FlightplanDocument {
            name: parts.name,
            mavlink: mavlink.unwrap_or_default(),
            take_off_position: parts.take_off_position,
            touch_down_position: parts.touch_down_position,
            waypoints: parts.waypoints,
            points_of_interest: parts.points_of_interest,
        }
    }

    pub fn into_parts(self) -> (FlightplanParts, Option<String>) {
        let mavlink = Some(self.mavlink).filter(|m| !m.is_empty());
        let parts = FlightplanParts {
            name: self.name,
            take_off_position: self.take_off_position,
            touch_down_position: self.touch_down_position,
            waypoints: self.waypoints,
            points_of_interest: self.points_of_interest,
        };
        (parts, mavlink)
    }

    pub fn parse(json: &str) -> FlightplanResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty printed with 4 space indentation.
    pub fn to_string_pretty(&self) -> FlightplanResult<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let doc = FlightplanDocument {
            name: "field".to_string(),
            mavlink: String::new(),
            take_off_position: Some(Waypoint::new(47.0, 8.0, 5.0, 0.0, 0.0)),
            touch_down_position: None,
            waypoints: vec![Waypoint::new(47.1, 8.1, 5.0, 90.0, 2.0)],
            points_of_interest: vec![PointOfInterest::new(47.05, 8.05)],
        };
        let text = doc.to_string_pretty().unwrap();

        assert!(text.contains("\n    \"name\": \"field\""));
        assert!(text.contains("\"takeOffPosition\""));
        assert!(text.contains("\"touchDownPosition\": null"));
        assert!(text.contains("\"pointsOfInterest\""));
        assert!(text.contains("\"lng\": 8.05"));

        assert_eq!(FlightplanDocument::parse(&text).unwrap(), doc);
    }

    #[test]
    fn test_mavlink_empty_means_stale() {
        let (_, mavlink) = FlightplanDocument::parse(r#"{"name": "a", "mavlink": ""}"#).unwrap().into_parts();
        assert!(mavlink.is_none());
    }
}
