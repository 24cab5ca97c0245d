use std::fmt::Write;

use crate::config::MissionConfig;
use crate::error::{Error, FlightplanResult};
use crate::plan::Waypoint;

use super::{MavCommand, MissionItem, FORMAT_MARKER, HEADER_TOKEN};

/// Camera pitch (deg) and yaw offset (deg) sent ahead of the route.
const CAMERA_PITCH: f64 = -90_f64;
const CAMERA_YAW: f64 = 30_f64;
/// Image format selector of the start-capture command.
const CAPTURE_FORMAT: f64 = 0.000108;

#[derive(Debug, Clone, Default)]
pub struct MavlinkWriter {
    config: MissionConfig,
    items: Vec<MissionItem>,
}

impl MavlinkWriter {
    pub fn new(config: MissionConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
        }
    }

    pub fn write(
        mut self,
        name: &str,
        take_off: Option<&Waypoint>,
        touch_down: Option<&Waypoint>,
        waypoints: &[Waypoint],
    ) -> FlightplanResult<String> {
        let (take_off, touch_down) = match (take_off, touch_down) {
            (Some(t), Some(d)) if !waypoints.is_empty() => (t, d),
            _ => {
                return Err(Error::PreconditionViolation(
                    "Flight path has invalid positions, cannot write flight plan",
                ))
            }
        };

        self.push_position(MavCommand::Takeoff, [0_f64, 0_f64, 0_f64, take_off.orientation], take_off);
        self.push(MavCommand::ChangeSpeed, [0_f64, self.config.velocity, -1_f64, 0_f64]);
        self.push(MavCommand::CameraOrientation, [0_f64, CAMERA_PITCH, 0_f64, CAMERA_YAW]);
        self.push_capture();

        for wp in waypoints {
            self.push_position(MavCommand::Waypoint, [self.config.hold_time, wp.radius, 0_f64, wp.orientation], wp);
            // Re-trigger recording after every waypoint, some cameras stop on their own.
            self.push_capture();
        }

        self.push_position(MavCommand::Land, [0_f64, 0_f64, 0_f64, touch_down.orientation], touch_down);

        let mut out = format!("{} WPL {} {}\n", HEADER_TOKEN, FORMAT_MARKER, name);
        for item in &self.items {
            // Writing into a String cannot fail
            let _ = writeln!(out, "{}", item);
        }

        tracing::debug!(records = self.items.len(), "Wrote mavlink flight plan");
        Ok(out)
    }

    fn push(&mut self, command: MavCommand, params: [f64; 4]) {
        let seq = self.items.len();
        self.items.push(MissionItem::new(seq, command, params));
    }

    fn push_position(&mut self, command: MavCommand, params: [f64; 4], wp: &Waypoint) {
        let seq = self.items.len();
        self.items.push(MissionItem::new(seq, command, params).at(wp.latitude, wp.longitude, wp.altitude));
    }

    fn push_capture(&mut self) {
        self.push(MavCommand::StartCapture, [self.config.capture_interval, 0_f64, CAPTURE_FORMAT, 0_f64]);
    }
}
