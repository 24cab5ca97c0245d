use std::{fs::File, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::FlightplanResult;
use crate::plan::Flightplan;

/// Parameters baked into the generated mavlink mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MissionConfig {
    /// Cruise speed in m/s.
    pub velocity: f64,
    /// Seconds to hold at each waypoint.
    pub hold_time: f64,
    /// Seconds between two camera captures.
    pub capture_interval: f64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        MissionConfig {
            velocity: 2_f64,
            hold_time: 1_f64,
            capture_interval: 1_f64,
        }
    }
}

/// Defaults applied when importing and editing plans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Orientation given to imported kmz waypoints.
    pub bearing: f64,
    /// Radius given to imported kmz waypoints.
    pub waypoint_radius: f64,
    /// Altitude forced onto every position, left alone when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Distance in meters used when densifying a route, no densifying when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoint_distance: Option<f64>,
    pub mission: MissionConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            bearing: 0_f64,
            waypoint_radius: 2_f64,
            altitude: None,
            waypoint_distance: None,
            mission: MissionConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn try_new_from_file(file: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = file.as_ref();
        let reader = File::open(path).with_context(|| format!("Could not open config file {}", path.display()))?;
        let config: PlannerConfig = serde_json::from_reader(reader).context("Invalid planner config JSON")?;

        Ok(config)
    }

    /// Force the configured altitude, then densify with the configured waypoint distance.
    pub fn apply_edits(&self, plan: &mut Flightplan) -> FlightplanResult<()> {
        if let Some(altitude) = self.altitude {
            plan.set_altitude(altitude)?;
        }
        if let Some(step) = self.waypoint_distance {
            plan.add_waypoints(step)?;
            tracing::debug!(waypoints = plan.num_waypoints(), step, "Densified route from config");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.waypoint_radius, 2.0);
        assert_eq!(cfg.altitude, None);
        assert_eq!(cfg.waypoint_distance, None);
        assert_eq!(cfg.mission.velocity, 2.0);
        assert_eq!(cfg.mission.hold_time, 1.0);
    }

    #[test]
    fn test_partial_override() {
        let cfg: PlannerConfig = serde_json::from_str(r#"{"altitude": 25.0, "mission": {"holdTime": 3.0}}"#).unwrap();
        assert_eq!(cfg.altitude, Some(25.0));
        assert_eq!(cfg.waypoint_distance, None);
        assert_eq!(cfg.bearing, 0.0);
        assert_eq!(cfg.mission.hold_time, 3.0);
        assert_eq!(cfg.mission.velocity, 2.0);
    }
}
