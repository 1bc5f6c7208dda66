//! Wall-clock time definitions.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
pub use time::Weekday;

/// Wall-clock time of a day, with a minute resolution.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DayTime(u16);

impl DayTime {
    /// [`DayTime`] representing midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Creates a new [`DayTime`] from the provided hour and minute.
    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60)
            .then(|| Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Returns the hour of this [`DayTime`].
    #[expect(clippy::cast_possible_truncation, reason = "`0..24` fits")]
    #[must_use]
    pub const fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    /// Returns the minute of this [`DayTime`].
    #[expect(clippy::cast_possible_truncation, reason = "`0..60` fits")]
    #[must_use]
    pub const fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Returns this [`DayTime`] as a number of minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for DayTime {
    type Err = ParseError;

    /// Parses a [`DayTime`] out of a `HH:MM` or `HH:MM:SS` string.
    ///
    /// Seconds are truncated, the resolution is a minute.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn component(s: &str) -> Result<u8, ParseError> {
            ((1..=2).contains(&s.len())
                && s.bytes().all(|b| b.is_ascii_digit()))
            .then(|| s.parse().ok())
            .flatten()
            .ok_or(ParseError::Format)
        }

        let mut parts = s.split(':');
        let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
            return Err(ParseError::Format);
        };
        let second = parts.next();
        if parts.next().is_some() {
            return Err(ParseError::Format);
        }

        if let Some(second) = second {
            if component(second)? > 59 {
                return Err(ParseError::Range);
            }
        }

        Self::new(component(hour)?, component(minute)?)
            .ok_or(ParseError::Range)
    }
}

/// Error of parsing a [`DayTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Input is not a `HH:MM` or `HH:MM:SS` time.
    #[display("invalid time, expected `HH:MM[:SS]`")]
    Format,

    /// A time component is out of its range.
    #[display("time component is out of range")]
    Range,
}

/// A [`Weekday`] paired with a [`DayTime`]: the "now" of a schedule lookup.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Moment {
    /// Day of the week.
    pub day: Weekday,

    /// Wall-clock time of that day.
    pub time: DayTime,
}
