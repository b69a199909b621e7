//! Local-time parsing and hourly window iteration.
//!
//! All timestamps entered by the operator and shown in the report are wall
//! clock times in one named zone. Windows advance in absolute time, so a DST
//! transition never produces a window shorter or longer than an hour.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::model::{HourlyWindow, InputError, LOCAL_TIME_FORMAT};

// ---------------------------------------------------------------------------
// Zone and timestamp resolution
// ---------------------------------------------------------------------------

/// Looks up an IANA zone name. Unknown names are an input error rather than
/// a silent fallback to UTC.
pub fn resolve_timezone(name: &str) -> Result<Tz, InputError> {
    name.parse::<Tz>()
        .map_err(|_| InputError::UnknownTimezone(name.to_string()))
}

/// Parses `YYYY-MM-DD HH:MM:SS` as a wall-clock time in `zone`.
///
/// `which` names the input ("start" / "end") for the error message.
/// Ambiguous times (DST fall-back) resolve to the earlier instant.
/// Surrounding whitespace is rejected, not trimmed.
pub fn parse_local(which: &'static str, value: &str, zone: Tz) -> Result<DateTime<Tz>, InputError> {
    if value.trim() != value {
        return Err(InputError::PaddedDate {
            which,
            value: value.to_string(),
        });
    }
    let naive = NaiveDateTime::parse_from_str(value, LOCAL_TIME_FORMAT).map_err(|source| {
        InputError::InvalidDate {
            which,
            value: value.to_string(),
            source,
        }
    })?;

    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(InputError::NonexistentLocalTime {
            which,
            value: value.to_string(),
            zone,
        }),
    }
}

// ---------------------------------------------------------------------------
// Window iteration
// ---------------------------------------------------------------------------

/// Iterator over consecutive one-hour windows starting at `start`, yielding
/// while the window start is strictly before `end`.
#[derive(Debug, Clone)]
pub struct HourlyWindows {
    current: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl Iterator for HourlyWindows {
    type Item = HourlyWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.end {
            return None;
        }
        let window = HourlyWindow::starting_at(self.current);
        self.current = window.end;
        Some(window)
    }
}

pub fn hourly_windows(start: DateTime<Tz>, end: DateTime<Tz>) -> HourlyWindows {
    HourlyWindows { current: start, end }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
