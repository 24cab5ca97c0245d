#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod config;
pub mod error;
pub mod loaders;
pub mod plan;

pub use config::{MissionConfig, PlannerConfig};
pub use error::{Error, FlightplanResult, ParseError};
pub use plan::{ChangeEvent, ChangeStream, Flightplan, ListenerId, PointOfInterest, Waypoint};

#[cfg(test)]
mod tests;
