use std::path::Path;

use crate::error::{FlightplanResult, ParseError};
use crate::plan::Waypoint;

use super::FlightplanParts;

const COORDINATES_TAG: &str = "<coordinates>";

/// Reads the path of a Google Earth export.
///
/// Only the line right after the first `<coordinates>` tag is looked at. It holds
/// whitespace separated `lon,lat,alt` triples. Take-off and touch-down are copies of
/// the first and last point.
pub fn read_kmz(content: &str, name: &str, bearing: f64, radius: f64) -> FlightplanResult<FlightplanParts> {
    let mut lines = content.lines().skip_while(|line| !line.contains(COORDINATES_TAG));
    lines.next().ok_or(ParseError::MissingCoordinates)?;
    let path = lines.next().ok_or(ParseError::MissingCoordinates)?;

    let mut waypoints = Vec::new();
    for token in path.split_whitespace() {
        let coords = token.split(',').collect::<Vec<_>>();
        if coords.len() != 3 {
            return Err(ParseError::InvalidCoordinate(token.to_owned()).into());
        }
        let number = |s: &str| -> FlightplanResult<f64> {
            s.parse::<f64>()
                .map_err(|_| ParseError::InvalidCoordinate(token.to_owned()).into())
        };
        waypoints.push(Waypoint::new(number(coords[1])?, number(coords[0])?, number(coords[2])?, bearing, radius));
    }

    if waypoints.len() < 2 {
        return Err(ParseError::TooFewWaypoints.into());
    }

    tracing::debug!(waypoints = waypoints.len(), "Read kmz coordinates");

    Ok(FlightplanParts {
        name: name.to_owned(),
        take_off_position: waypoints.first().copied(),
        touch_down_position: waypoints.last().copied(),
        waypoints,
        points_of_interest: Vec::new(),
    })
}

/// Plan name derived from a kmz file name: the file name with `.kmz` removed.
pub fn kmz_plan_name(file: impl AsRef<Path>) -> String {
    let file_name = file
        .as_ref()
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    file_name.replacen(".kmz", "", 1)
}
