use std::fmt::Display;

pub mod reader;
pub mod writer;
pub(crate) mod partial;

pub use reader::MavlinkReader;
pub use writer::MavlinkWriter;

/// Header token of the QGC waypoint list format.
pub const HEADER_TOKEN: &str = "QGC";
/// Format version marker following the header token; the plan name comes after it.
pub const FORMAT_MARKER: &str = "120";
pub const FIELD_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MavCommand {
    Waypoint,
    Land,
    Takeoff,
    ChangeSpeed,
    StartCapture,
    CameraOrientation,
    Other(u16),
}

impl MavCommand {
    pub fn code(&self) -> u16 {
        match self {
            MavCommand::Waypoint => 16,
            MavCommand::Land => 21,
            MavCommand::Takeoff => 22,
            MavCommand::ChangeSpeed => 178,
            MavCommand::StartCapture => 2000,
            MavCommand::CameraOrientation => 2800,
            MavCommand::Other(code) => *code,
        }
    }
}

impl From<u16> for MavCommand {
    fn from(value: u16) -> Self {
        match value {
            16 => Self::Waypoint,
            21 => Self::Land,
            22 => Self::Takeoff,
            178 => Self::ChangeSpeed,
            2000 => Self::StartCapture,
            2800 => Self::CameraOrientation,
            code => Self::Other(code),
        }
    }
}

/// One command record: `seq 0 3 cmd p1 p2 p3 p4 lat lon alt 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionItem {
    pub seq: usize,
    pub command: MavCommand,
    pub params: [f64; 4],
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl MissionItem {
    pub fn new(seq: usize, command: MavCommand, params: [f64; 4]) -> Self {
        MissionItem {
            seq,
            command,
            params,
            latitude: 0_f64,
            longitude: 0_f64,
            altitude: 0_f64,
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64, altitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self.altitude = altitude;
        self
    }
}

struct Fixed6(f64);

impl Display for Fixed6 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // No "-0.000000" in the output
        let value = if self.0 == 0_f64 { 0_f64 } else { self.0 };
        write!(f, "{:.6}", value)
    }
}

impl Display for MissionItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t0\t3\t{}", self.seq, self.command.code())?;
        for param in self.params {
            write!(f, "\t{}", Fixed6(param))?;
        }
        write!(
            f,
            "\t{}\t{}\t{}\t1",
            Fixed6(self.latitude),
            Fixed6(self.longitude),
            Fixed6(self.altitude)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        for code in [16_u16, 21, 22, 178, 2000, 2800, 99] {
            assert_eq!(MavCommand::from(code).code(), code);
        }
        assert_eq!(MavCommand::from(99), MavCommand::Other(99));
    }

    #[test]
    fn test_item_format() {
        let item = MissionItem::new(4, MavCommand::Waypoint, [1.0, 2.5, -0.0, 90.0]).at(47.1234567, 8.5, -3.0);
        assert_eq!(
            item.to_string(),
            "4\t0\t3\t16\t1.000000\t2.500000\t0.000000\t90.000000\t47.123457\t8.500000\t-3.000000\t1"
        );
    }
}
