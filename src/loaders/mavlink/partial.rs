use crate::{
    error::{Error, ParseError},
    loaders::FlightplanParts,
    plan::Waypoint,
};

/// Plan fields collected line by line; any of them may still be missing.
#[derive(Debug, Default)]
pub struct PartialFlightplan {
    pub name: Option<String>,
    pub take_off_position: Option<Waypoint>,
    pub touch_down_position: Option<Waypoint>,
    pub waypoints: Vec<Waypoint>,
}

impl PartialFlightplan {
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.trim().to_owned());
    }
}

impl TryFrom<PartialFlightplan> for FlightplanParts {
    type Error = Error;

    fn try_from(value: PartialFlightplan) -> Result<Self, Self::Error> {
        let name = value.name.filter(|name| !name.is_empty()).ok_or(ParseError::MissingName)?;

        Ok(FlightplanParts {
            name,
            take_off_position: value.take_off_position,
            touch_down_position: value.touch_down_position,
            waypoints: value.waypoints,
            points_of_interest: Vec::new(),
        })
    }
}
