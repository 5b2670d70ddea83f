//! Notatable note lengths
//!
//! Durations run from Whole down to ThirtySecond. All arithmetic is done in
//! elementary units (thirty-second notes), so a Whole is 32 units and a
//! ThirtySecond is 1.

use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

use crate::errors::NotationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Duration {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

/// Ordinal table, longest first. Rank = index into this table.
pub const DURATION_ORDER: [Duration; 6] = [
    Duration::Whole,
    Duration::Half,
    Duration::Quarter,
    Duration::Eighth,
    Duration::Sixteenth,
    Duration::ThirtySecond,
];

/// Elementary units in a whole note
pub const UNITS_PER_WHOLE: usize = 32;

impl Duration {
    /// Position in `DURATION_ORDER` (Whole = 0)
    pub fn rank(self) -> usize {
        match self {
            Duration::Whole => 0,
            Duration::Half => 1,
            Duration::Quarter => 2,
            Duration::Eighth => 3,
            Duration::Sixteenth => 4,
            Duration::ThirtySecond => 5,
        }
    }

    /// Number of thirty-second notes this duration spans
    pub fn elementary_units(self) -> usize {
        1 << (Duration::ThirtySecond.rank() - self.rank())
    }

    /// Expand into the equivalent run of ThirtySecond durations
    pub fn expand_to_elementary(self) -> Vec<Duration> {
        vec![Duration::ThirtySecond; self.elementary_units()]
    }

    /// Next longer duration. Whole is terminal.
    pub fn increment(self) -> Duration {
        DURATION_ORDER[self.rank().saturating_sub(1)]
    }

    /// Next shorter duration. ThirtySecond is terminal.
    pub fn decrement(self) -> Duration {
        DURATION_ORDER[(self.rank() + 1).min(DURATION_ORDER.len() - 1)]
    }

    /// Denominator form: Whole → 1, Half → 2, ... ThirtySecond → 32
    pub fn as_number(self) -> u32 {
        (UNITS_PER_WHOLE / self.elementary_units()) as u32
    }

    /// Fraction of a whole note
    pub fn as_ratio(self) -> Ratio<u32> {
        Ratio::new(1, self.as_number())
    }

    /// Inverse of `as_number`
    pub fn from_number(number: u32) -> Result<Duration, NotationError> {
        DURATION_ORDER
            .iter()
            .copied()
            .find(|d| d.as_number() == number)
            .ok_or_else(|| NotationError::InvalidDuration(format!("1/{}", number)))
    }

    /// Duration spanning exactly `units` elementary units, if one exists
    pub fn from_elementary_units(units: usize) -> Option<Duration> {
        DURATION_ORDER
            .iter()
            .copied()
            .find(|d| d.elementary_units() == units)
    }

    pub fn is_elementary(self) -> bool {
        self == Duration::ThirtySecond
    }

    /// VexFlow duration code
    pub fn vexflow_code(self) -> &'static str {
        match self {
            Duration::Whole => "w",
            Duration::Half => "h",
            Duration::Quarter => "q",
            Duration::Eighth => "8",
            Duration::Sixteenth => "16",
            Duration::ThirtySecond => "32",
        }
    }
}

impl TryFrom<Ratio<u32>> for Duration {
    type Error = NotationError;

    /// Convert a fraction of a whole note (e.g. 1/4) into a Duration
    fn try_from(value: Ratio<u32>) -> Result<Self, Self::Error> {
        DURATION_ORDER
            .iter()
            .copied()
            .find(|d| d.as_ratio() == value)
            .ok_or_else(|| NotationError::InvalidDuration(value.to_string()))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Duration::Whole => "whole",
            Duration::Half => "half",
            Duration::Quarter => "quarter",
            Duration::Eighth => "eighth",
            Duration::Sixteenth => "sixteenth",
            Duration::ThirtySecond => "thirty-second",
        };
        write!(f, "{}", name)
    }
}
