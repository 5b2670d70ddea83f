//! Time signature algebra
//!
//! A time signature is a beat count and a beat-unit duration. Two signatures
//! are equivalent when a bar of each spans the same number of elementary
//! units; the irreducible form (see [`TimeSignature::simplify`]) is the
//! canonical representative.

use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use super::duration::{Duration, UNITS_PER_WHOLE};
use crate::errors::NotationError;

/// Longest bar accepted: 32 whole notes
pub const MAX_BAR_UNITS: usize = 32 * UNITS_PER_WHOLE;

/// Serialized as its string form, e.g. `"3/4"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSignature {
    pub beat_count: u32,
    pub beat_unit: Duration,
}

impl TimeSignature {
    /// Create a validated time signature
    pub fn new(beat_count: u32, beat_unit: Duration) -> Result<Self, NotationError> {
        let ts = TimeSignature { beat_count, beat_unit };
        ts.validate()?;
        Ok(ts)
    }

    /// Create from a possibly fractional beat count. Non-integral counts fail.
    pub fn from_fractional_beats(
        beat_count: Ratio<u32>,
        beat_unit: Duration,
    ) -> Result<Self, NotationError> {
        if !beat_count.is_integer() {
            return Err(NotationError::InvalidTimeSignature(format!(
                "beat count {} is not a whole number",
                beat_count
            )));
        }
        Self::new(beat_count.to_integer(), beat_unit)
    }

    pub fn validate(&self) -> Result<(), NotationError> {
        self.elementary_units().map(|_| ())
    }

    /// Length of one bar in elementary units, at most [`MAX_BAR_UNITS`]
    pub fn elementary_units(&self) -> Result<usize, NotationError> {
        if self.beat_count == 0 {
            return Err(NotationError::InvalidTimeSignature(
                "beat count must be at least 1".to_string(),
            ));
        }
        match usize::try_from(self.beat_count)
            .ok()
            .and_then(|count| count.checked_mul(self.beat_unit.elementary_units()))
        {
            Some(units) if units <= MAX_BAR_UNITS => Ok(units),
            _ => Err(NotationError::InvalidTimeSignature(format!(
                "{} is longer than {} whole notes",
                self, MAX_BAR_UNITS / UNITS_PER_WHOLE
            ))),
        }
    }

    pub fn expand_to_elementary(&self) -> Result<Vec<Duration>, NotationError> {
        Ok(vec![Duration::ThirtySecond; self.elementary_units()?])
    }

    /// Rebuild a signature from a bar length in elementary units, then reduce it
    ///
    /// # Examples
    /// ```
    /// use piano_notation_wasm::models::{Duration, TimeSignature};
    ///
    /// let ts = TimeSignature::from_elementary_count(24, Duration::Eighth).unwrap();
    /// assert_eq!(ts.to_string(), "3/4");
    /// ```
    pub fn from_elementary_count(units: usize, beat_unit: Duration) -> Result<Self, NotationError> {
        let unit_len = beat_unit.elementary_units();
        if units == 0 || units % unit_len != 0 {
            return Err(NotationError::InvalidTimeSignature(format!(
                "{} elementary units is not a whole number of {} beats",
                units, beat_unit
            )));
        }
        let beat_count = u32::try_from(units / unit_len).map_err(|_| {
            NotationError::InvalidTimeSignature(format!("{} elementary units is too long", units))
        })?;
        Ok(Self::new(beat_count, beat_unit)?.simplify())
    }

    pub fn can_simplify(&self) -> bool {
        self.beat_unit != Duration::Whole && self.beat_count % 2 == 0
    }

    /// Halve the beat count and lengthen the beat unit until irreducible
    pub fn simplify(&self) -> Self {
        let mut ts = *self;
        while ts.beat_count > 0 && ts.can_simplify() {
            ts.beat_count /= 2;
            ts.beat_unit = ts.beat_unit.increment();
        }
        ts
    }

    pub fn is_equivalent(&self, other: &TimeSignature) -> bool {
        match (self.elementary_units(), other.elementary_units()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature { beat_count: 4, beat_unit: Duration::Quarter }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beat_count, self.beat_unit.as_number())
    }
}

impl FromStr for TimeSignature {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::InvalidTimeSignature(format!("cannot parse '{}'", s));
        let (count, unit) = s.split_once('/').ok_or_else(invalid)?;
        let beat_count: u32 = count.trim().parse().map_err(|_| invalid())?;
        let denominator: u32 = unit.trim().parse().map_err(|_| invalid())?;
        let beat_unit = Duration::from_number(denominator)?;
        Self::new(beat_count, beat_unit)
    }
}

impl TryFrom<String> for TimeSignature {
    type Error = NotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSignature> for String {
    fn from(ts: TimeSignature) -> Self {
        ts.to_string()
    }
}
