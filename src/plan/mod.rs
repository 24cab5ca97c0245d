use crate::config::MissionConfig;
use crate::error::{Error, FlightplanResult, ParseError};
use crate::loaders::{json::FlightplanDocument, kmz, mavlink::{MavlinkReader, MavlinkWriter}, FlightplanParts};

mod events;
pub mod geo;
pub mod map;
mod waypoint;

pub use events::{ChangeEvent, ChangeStream, EventChannel, Listener, ListenerId};
pub use waypoint::{PointOfInterest, Waypoint};

/// Upper bound on the route length produced by [`Flightplan::add_waypoints`].
pub const MAX_ROUTE_WAYPOINTS: usize = 100_000;

/// A survey flight plan.
///
/// Holds take-off and touch-down positions, the route in between and a list of points
/// of interest. Every mutator validates its arguments before touching any state and
/// publishes a [`ChangeEvent`] to the registered listeners before returning.
///
/// The mavlink text is cached and dropped whenever the name or a position changes;
/// call [`Flightplan::update_mavlink`] to regenerate it.
#[derive(Debug, Default)]
pub struct Flightplan {
    name: String,
    mavlink: Option<String>,
    take_off_position: Option<Waypoint>,
    touch_down_position: Option<Waypoint>,
    waypoints: Vec<Waypoint>,
    points_of_interest: Vec<PointOfInterest>,
    events: EventChannel,
}

impl Flightplan {
    /// An empty, invalid plan.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mavlink(mavlink: &str) -> FlightplanResult<Self> {
        let mut plan = Self::new();
        plan.parse_mavlink(mavlink)?;
        Ok(plan)
    }

    pub fn from_kmz(kmz: &str, name: &str, bearing: f64, waypoint_radius: f64) -> FlightplanResult<Self> {
        let mut plan = Self::new();
        plan.parse_kmz(kmz, name, bearing, waypoint_radius)?;
        Ok(plan)
    }

    pub fn from_json(json: &str) -> FlightplanResult<Self> {
        let mut plan = Self::new();
        plan.load_json(json)?;
        Ok(plan)
    }

    // Subscriptions

    pub fn subscribe(&mut self, stream: ChangeStream, listener: impl FnMut(&ChangeEvent<'_>) + 'static) -> ListenerId {
        self.events.subscribe(Some(stream), Box::new(listener))
    }

    pub fn subscribe_all(&mut self, listener: impl FnMut(&ChangeEvent<'_>) + 'static) -> ListenerId {
        self.events.subscribe(None, Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // Accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cached mavlink text, `None` if it has to be regenerated.
    pub fn mavlink(&self) -> Option<&str> {
        self.mavlink.as_deref()
    }

    pub fn take_off_position(&self) -> Option<&Waypoint> {
        self.take_off_position.as_ref()
    }

    pub fn touch_down_position(&self) -> Option<&Waypoint> {
        self.touch_down_position.as_ref()
    }

    /// Route waypoints, without take-off and touch-down.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn num_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    pub fn points_of_interest(&self) -> &[PointOfInterest] {
        &self.points_of_interest
    }

    /// A cleared plan is never valid. A plan without route waypoints is.
    pub fn is_valid(&self) -> bool {
        let endpoint_ok = |wp: &Option<Waypoint>| wp.as_ref().is_some_and(Waypoint::is_valid);

        endpoint_ok(&self.take_off_position)
            && endpoint_ok(&self.touch_down_position)
            && !self.name.is_empty()
            && self.waypoints.iter().all(Waypoint::is_valid)
    }

    /// Total great-circle length over take-off, route and touch-down.
    pub fn route_length_m(&self) -> f64 {
        let path = self.path().map(|wp| wp.position()).collect::<Vec<_>>();
        path.windows(2).map(|leg| geo::distance_m(&leg[0], &leg[1])).sum()
    }

    pub(crate) fn path(&self) -> impl Iterator<Item = &Waypoint> {
        self.take_off_position
            .iter()
            .chain(self.waypoints.iter())
            .chain(self.touch_down_position.iter())
    }

    pub fn mavlink_file_name(&self) -> String {
        format!("{}.mavlink", self.name)
    }

    pub fn json_file_name(&self) -> String {
        format!("{}.flightplan.json", self.name)
    }

    pub fn geojson_file_name(&self) -> String {
        format!("{}.geojson", self.name)
    }

    // Mutators

    /// Reset to the empty state. Listeners receive a generic change.
    pub fn clear(&mut self) {
        self.reset();
        self.events.emit(ChangeEvent::Changed);
    }

    fn reset(&mut self) {
        self.name.clear();
        self.mavlink = None;
        self.take_off_position = None;
        self.touch_down_position = None;
        self.waypoints.clear();
        self.points_of_interest.clear();
    }

    pub fn set_name(&mut self, name: &str) -> FlightplanResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidArgument("Flight plan name must not be empty"));
        }
        self.name = name.to_owned();
        self.mavlink = None;
        self.events.emit(ChangeEvent::Name(&self.name));
        Ok(())
    }

    /// Replace the route. Take-off and touch-down are not part of `route`.
    pub fn set_waypoints(&mut self, route: Vec<Waypoint>) -> FlightplanResult<()> {
        if route.is_empty() || !route.iter().all(Waypoint::is_finite) {
            return Err(Error::InvalidArgument("Invalid waypoint data passed to set_waypoints"));
        }
        self.waypoints = route;
        self.mavlink = None;
        self.events.emit(ChangeEvent::Waypoints(&self.waypoints));
        Ok(())
    }

    pub fn set_waypoint(&mut self, wp: Waypoint, index: usize) -> FlightplanResult<()> {
        if !wp.is_finite() {
            return Err(Error::InvalidArgument("Invalid waypoint data passed to set_waypoint"));
        }
        let len = self.waypoints.len();
        let slot = self.waypoints.get_mut(index).ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = wp;
        self.mavlink = None;
        self.events.emit(ChangeEvent::Waypoints(&self.waypoints));
        Ok(())
    }

    pub fn set_takeoff(&mut self, wp: Waypoint) -> FlightplanResult<()> {
        if !wp.is_finite() {
            return Err(Error::InvalidArgument("Invalid take-off position"));
        }
        self.mavlink = None;
        let stored = self.take_off_position.insert(wp);
        self.events.emit(ChangeEvent::TakeOff(stored));
        Ok(())
    }

    pub fn set_touchdown(&mut self, wp: Waypoint) -> FlightplanResult<()> {
        if !wp.is_finite() {
            return Err(Error::InvalidArgument("Invalid touch-down position"));
        }
        self.mavlink = None;
        let stored = self.touch_down_position.insert(wp);
        self.events.emit(ChangeEvent::TouchDown(stored));
        Ok(())
    }

    pub fn set_waypoint_radius(&mut self, radius: f64) -> FlightplanResult<()> {
        self.apply_to_all(radius, |wp, r| wp.radius = r)
    }

    pub fn set_altitude(&mut self, altitude: f64) -> FlightplanResult<()> {
        self.apply_to_all(altitude, |wp, a| wp.altitude = a)
    }

    /// Point every waypoint, take-off and touch-down included, in the same direction.
    pub fn set_bearing(&mut self, bearing: f64) -> FlightplanResult<()> {
        self.apply_to_all(bearing, |wp, b| wp.orientation = b)
    }

    fn apply_to_all(&mut self, value: f64, apply: impl Fn(&mut Waypoint, f64)) -> FlightplanResult<()> {
        if !value.is_finite() {
            return Err(Error::InvalidArgument("Value must be a finite number"));
        }
        let (Some(take_off), Some(touch_down)) = (self.take_off_position.as_mut(), self.touch_down_position.as_mut()) else {
            return Err(Error::PreconditionViolation("Take-off and touch-down positions are required"));
        };

        apply(take_off, value);
        apply(touch_down, value);
        for wp in self.waypoints.iter_mut() {
            apply(wp, value);
        }

        self.mavlink = None;
        self.events.emit(ChangeEvent::Changed);
        Ok(())
    }

    /// Turn every route waypoint towards the center of the route's bounding box.
    /// Take-off and touch-down keep their orientation.
    pub fn set_bearing_to_center(&mut self) -> FlightplanResult<()> {
        let center = geo::center_of_bounds(&self.waypoints.iter().map(Waypoint::position).collect::<Vec<_>>())
            .ok_or(Error::PreconditionViolation("Flight path needs at least one waypoint"))?;

        for wp in self.waypoints.iter_mut() {
            wp.orientation = geo::initial_bearing_deg(&wp.position(), &center);
        }
        tracing::debug!(lat = center.lat, lon = center.lon, "Set bearing to center");

        self.mavlink = None;
        self.events.emit(ChangeEvent::Changed);
        Ok(())
    }

    /// Insert waypoints every `step_size` meters along each leg of the route.
    ///
    /// Latitude, longitude and altitude are interpolated linearly, which is close enough
    /// on survey-sized legs. Radius and orientation come from the waypoint starting the leg.
    pub fn add_waypoints(&mut self, step_size: f64) -> FlightplanResult<()> {
        if !(step_size.is_finite() && step_size > 0_f64) {
            return Err(Error::InvalidArgument("Step size must be a positive number of meters"));
        }
        if self.waypoints.len() < 2 {
            return Err(Error::PreconditionViolation("Flight path needs to have at least 2 waypoints"));
        }

        let leg_steps = self
            .waypoints
            .windows(2)
            .map(|leg| (geo::distance_m(&leg[0].position(), &leg[1].position()) / step_size).floor())
            .collect::<Vec<_>>();
        // Every leg contributes its start plus the inserted points, the last waypoint closes the route.
        let projected = leg_steps.iter().map(|steps| steps.max(1_f64)).sum::<f64>() + 1_f64;
        if projected > MAX_ROUTE_WAYPOINTS as f64 {
            return Err(Error::InvalidArgument("Step size too small, the route would exceed the waypoint limit"));
        }

        let old = std::mem::take(&mut self.waypoints);
        let mut route = Vec::with_capacity(projected as usize);

        for (leg, steps) in old.windows(2).zip(leg_steps) {
            let (from, to) = (&leg[0], &leg[1]);
            let num_steps = steps as usize;

            route.push(*from);
            if num_steps > 1 {
                let steps = num_steps as f64;
                let lat_step = (to.latitude - from.latitude) / steps;
                let lon_step = (to.longitude - from.longitude) / steps;
                let alt_step = (to.altitude - from.altitude) / steps;

                for j in 1..num_steps {
                    let j = j as f64;
                    route.push(Waypoint::new(
                        from.latitude + j * lat_step,
                        from.longitude + j * lon_step,
                        from.altitude + j * alt_step,
                        from.orientation,
                        from.radius,
                    ));
                }
            }
        }
        if let Some(last) = old.last() {
            route.push(*last);
        }

        tracing::debug!(before = old.len(), after = route.len(), step_size, "Densified route");

        self.waypoints = route;
        self.mavlink = None;
        self.events.emit(ChangeEvent::Waypoints(&self.waypoints));
        Ok(())
    }

    pub fn add_point_of_interest(&mut self, poi: PointOfInterest) -> FlightplanResult<()> {
        if !poi.is_finite() {
            return Err(Error::InvalidArgument("Invalid point of interest"));
        }
        self.points_of_interest.push(poi);
        self.events.emit(ChangeEvent::PointsOfInterest(&self.points_of_interest));
        Ok(())
    }

    pub fn remove_point_of_interest(&mut self, index: usize) -> FlightplanResult<PointOfInterest> {
        let len = self.points_of_interest.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let removed = self.points_of_interest.remove(index);
        self.events.emit(ChangeEvent::PointsOfInterest(&self.points_of_interest));
        Ok(removed)
    }

    pub fn set_point_of_interest(&mut self, poi: PointOfInterest, index: usize) -> FlightplanResult<()> {
        if !poi.is_finite() {
            return Err(Error::InvalidArgument("Invalid point of interest"));
        }
        let len = self.points_of_interest.len();
        let slot = self.points_of_interest.get_mut(index).ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = poi;
        self.events.emit(ChangeEvent::PointsOfInterest(&self.points_of_interest));
        Ok(())
    }

    // Serialization

    /// Regenerate the mavlink text from the current positions.
    pub fn update_mavlink(&mut self, config: &MissionConfig) -> FlightplanResult<&str> {
        let text = MavlinkWriter::new(*config).write(
            &self.name,
            self.take_off_position.as_ref(),
            self.touch_down_position.as_ref(),
            &self.waypoints,
        )?;
        let stored = self.mavlink.insert(text).as_str();
        self.events.emit(ChangeEvent::Mavlink(stored));
        Ok(stored)
    }

    /// [`Flightplan::update_mavlink`] with 2 m/s and 1 s hold time.
    pub fn update_mavlink_default(&mut self) -> FlightplanResult<&str> {
        self.update_mavlink(&MissionConfig::default())
    }

    /// Replace the plan with the contents of a QGC WPL 120 document.
    ///
    /// An empty document leaves a cleared plan. On error the plan is cleared as well.
    pub fn parse_mavlink(&mut self, mavlink: &str) -> FlightplanResult<()> {
        self.load_with(|| {
            if mavlink.is_empty() {
                return Ok(None);
            }
            let parts = MavlinkReader::new(mavlink).try_read()?;
            Ok(Some((parts, Some(mavlink.to_owned()))))
        })
    }

    /// Replace the plan with the path of a kmz coordinate list.
    pub fn parse_kmz(&mut self, kmz: &str, name: &str, bearing: f64, waypoint_radius: f64) -> FlightplanResult<()> {
        self.load_with(|| {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidArgument("Flight plan name must not be empty"));
            }
            if kmz.is_empty() {
                return Ok(None);
            }
            Ok(Some((kmz::read_kmz(kmz, name, bearing, waypoint_radius)?, None)))
        })
    }

    /// Replace the plan with a JSON document. The result is not validated.
    pub fn load_json(&mut self, json: &str) -> FlightplanResult<()> {
        self.reset();
        match FlightplanDocument::parse(json) {
            Ok(doc) => {
                let (parts, mavlink) = doc.into_parts();
                self.install(parts, mavlink);
                self.events.emit(ChangeEvent::Changed);
                Ok(())
            }
            Err(e) => {
                self.events.emit(ChangeEvent::Changed);
                Err(e)
            }
        }
    }

    pub fn to_json(&self) -> FlightplanResult<String> {
        FlightplanDocument::from_parts(self.to_parts(), self.mavlink.clone()).to_string_pretty()
    }

    pub fn to_parts(&self) -> FlightplanParts {
        FlightplanParts {
            name: self.name.clone(),
            take_off_position: self.take_off_position,
            touch_down_position: self.touch_down_position,
            waypoints: self.waypoints.clone(),
            points_of_interest: self.points_of_interest.clone(),
        }
    }

    fn install(&mut self, parts: FlightplanParts, mavlink: Option<String>) {
        self.name = parts.name;
        self.mavlink = mavlink;
        self.take_off_position = parts.take_off_position;
        self.touch_down_position = parts.touch_down_position;
        self.waypoints = parts.waypoints;
        self.points_of_interest = parts.points_of_interest;
    }

    /// Clear, load, validate. Any failure leaves the plan cleared.
    fn load_with(
        &mut self,
        load: impl FnOnce() -> FlightplanResult<Option<(FlightplanParts, Option<String>)>>,
    ) -> FlightplanResult<()> {
        self.reset();

        let result = load().and_then(|loaded| {
            if let Some((parts, mavlink)) = loaded {
                self.install(parts, mavlink);
                if !self.is_valid() {
                    return Err(ParseError::InvalidPlan.into());
                }
            }
            Ok(())
        });

        if let Err(e) = &result {
            tracing::debug!(error = %e, "Could not load flight plan");
            self.reset();
        }
        self.events.emit(ChangeEvent::Changed);
        result
    }
}

impl PartialEq for Flightplan {
    /// Listeners do not take part in equality.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.mavlink == other.mavlink
            && self.take_off_position == other.take_off_position
            && self.touch_down_position == other.touch_down_position
            && self.waypoints == other.waypoints
            && self.points_of_interest == other.points_of_interest
    }
}

impl Clone for Flightplan {
    /// The copy starts without listeners.
    fn clone(&self) -> Self {
        Flightplan {
            name: self.name.clone(),
            mavlink: self.mavlink.clone(),
            take_off_position: self.take_off_position,
            touch_down_position: self.touch_down_position,
            waypoints: self.waypoints.clone(),
            points_of_interest: self.points_of_interest.clone(),
            events: EventChannel::default(),
        }
    }
}

