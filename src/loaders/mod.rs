use crate::plan::{PointOfInterest, Waypoint};

pub mod json;
pub mod kmz;
pub mod mavlink;

/// Plan contents produced by a loader, ready to be installed into a
/// [`Flightplan`](crate::plan::Flightplan).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightplanParts {
    pub name: String,
    pub take_off_position: Option<Waypoint>,
    pub touch_down_position: Option<Waypoint>,
    pub waypoints: Vec<Waypoint>,
    pub points_of_interest: Vec<PointOfInterest>,
}
