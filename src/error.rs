use thiserror::Error;

pub type FlightplanResult<T> = Result<T, Error>;

/// Errors raised by [`Flightplan`](crate::plan::Flightplan) mutators and the loaders.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Precondition violated: {0}")]
    PreconditionViolation(&'static str),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::Json(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Less than 3 mavlink statements could be parsed")]
    TooFewLines,

    #[error("Invalid flight plan name, check that \"QGC WPL 120 <name>\" is present")]
    InvalidNameMarker,

    #[error("No flight plan name found")]
    MissingName,

    #[error("Line {line} must end in \"1\"")]
    InvalidTerminator { line: usize },

    #[error("Invalid number on line {line}")]
    InvalidNumber { line: usize },

    #[error("Parsed flight plan is not valid")]
    InvalidPlan,

    #[error("No <coordinates> section found")]
    MissingCoordinates,

    #[error("Waypoint with invalid number of coordinates: {0:?}")]
    InvalidCoordinate(String),

    #[error("Less than two waypoints could be extracted")]
    TooFewWaypoints,
}
