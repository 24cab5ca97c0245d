use crate::error::{FlightplanResult, ParseError};
use crate::loaders::FlightplanParts;
use crate::plan::Waypoint;

use super::{partial::PartialFlightplan, MavCommand, FIELD_COUNT, FORMAT_MARKER, HEADER_TOKEN};

/// Reads a QGC WPL 120 document.
///
/// Records with a field count other than 12 and unknown command codes are skipped,
/// a 12-field record that does not end in `1` fails the whole read. Only spaces and
/// carriage returns are stripped from a line, tabs always delimit a field.
pub struct MavlinkReader<'a> {
    source: &'a str,
    partial: PartialFlightplan,
}

impl<'a> MavlinkReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            partial: PartialFlightplan::default(),
        }
    }

    pub fn try_read(mut self) -> FlightplanResult<FlightplanParts> {
        let lines = self.source.split('\n').collect::<Vec<_>>();
        if lines.len() < 3 {
            return Err(ParseError::TooFewLines.into());
        }

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;

            if line.contains(HEADER_TOKEN) {
                self.parse_header(line)?;
                continue;
            }
            if line.contains("//") {
                continue;
            }

            self.parse_record(line.trim_matches(|c| c == ' ' || c == '\r'), line_number)?;
        }

        tracing::debug!(
            name = ?self.partial.name,
            waypoints = self.partial.waypoints.len(),
            "Read mavlink flight plan"
        );

        self.partial.try_into()
    }

    fn parse_header(&mut self, line: &str) -> FlightplanResult<()> {
        let marker = line.find(FORMAT_MARKER).ok_or(ParseError::InvalidNameMarker)?;
        let name = line[marker + FORMAT_MARKER.len()..].trim();
        if name.is_empty() {
            return Err(ParseError::InvalidNameMarker.into());
        }
        self.partial.set_name(name);
        Ok(())
    }

    fn parse_record(&mut self, line: &str, line_number: usize) -> FlightplanResult<()> {
        let fields = line.split('\t').collect::<Vec<_>>();
        if fields.len() != FIELD_COUNT {
            if !line.is_empty() {
                tracing::trace!(line_number, fields = fields.len(), "Skipping mavlink line");
            }
            return Ok(());
        }

        if leading_integer(fields[11]) != Some(1) {
            return Err(ParseError::InvalidTerminator { line: line_number }.into());
        }

        let command = match leading_integer(fields[3]).and_then(|code| u16::try_from(code).ok()) {
            Some(code) => MavCommand::from(code),
            None => return Ok(()),
        };

        let number = |idx: usize| -> FlightplanResult<f64> {
            fields[idx]
                .trim()
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber { line: line_number }.into())
        };

        match command {
            MavCommand::Takeoff => {
                self.partial.take_off_position = Some(Waypoint::new(number(8)?, number(9)?, number(10)?, number(7)?, 0_f64));
            }
            MavCommand::Land => {
                self.partial.touch_down_position = Some(Waypoint::new(number(8)?, number(9)?, number(10)?, number(7)?, 0_f64));
            }
            MavCommand::Waypoint => {
                self.partial.waypoints.push(Waypoint::new(number(8)?, number(9)?, number(10)?, number(7)?, number(5)?));
            }
            _ => {}
        }

        Ok(())
    }
}

/// Integer value of the digits a field starts with, trailing text is ignored (`"22x"` reads as 22).
fn leading_integer(field: &str) -> Option<i64> {
    let field = field.trim();
    let (negative, digits) = match field.as_bytes().first().copied() {
        Some(b'-') => (true, &field[1..]),
        Some(b'+') => (false, &field[1..]),
        _ => (false, field),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
