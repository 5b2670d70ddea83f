//! Key signatures for the rendered stave
//!
//! A key is a tonic pitch class plus a mode. Its position on the circle of
//! fifths decides how many sharps or flats VexFlow draws.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::note::NoteName;
use crate::errors::NotationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
}

const MAJOR_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_STEPS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeySignature {
    pub tonic: NoteName,
    pub mode: Mode,
}

impl KeySignature {
    pub fn new(tonic: NoteName, mode: Mode) -> Result<Self, NotationError> {
        if tonic.is_pause() {
            return Err(NotationError::InvalidConfig(
                "a key signature needs a pitched tonic".to_string(),
            ));
        }
        Ok(KeySignature { tonic, mode })
    }

    pub fn major(tonic: NoteName) -> Result<Self, NotationError> {
        Self::new(tonic, Mode::Major)
    }

    /// Circle-of-fifths position, -6 (six flats) to +5 (five sharps).
    ///
    /// Minor keys share the signature of their relative major. Gb major is
    /// preferred over F# major since pitch names are spelled with flats.
    pub fn fifths(&self) -> i32 {
        let relative_major = match self.mode {
            Mode::Major => self.tonic,
            Mode::Minor => self.tonic.transpose(3),
        };
        match relative_major {
            NoteName::C => 0,
            NoteName::G => 1,
            NoteName::D => 2,
            NoteName::A => 3,
            NoteName::E => 4,
            NoteName::B => 5,
            NoteName::F => -1,
            NoteName::Bb => -2,
            NoteName::Eb => -3,
            NoteName::Ab => -4,
            NoteName::Db => -5,
            NoteName::Gb => -6,
            NoteName::Pause => 0,
        }
    }

    /// Scale degree (0-based) of a pitch class in this key, if diatonic
    pub fn scale_step(&self, note: NoteName) -> Option<usize> {
        let tonic = self.tonic.semitone()?;
        let interval = (note.semitone()? + 12 - tonic) % 12;
        let steps = match self.mode {
            Mode::Major => &MAJOR_STEPS,
            Mode::Minor => &MINOR_STEPS,
        };
        steps.iter().position(|&s| s == interval)
    }

    /// Tonic as written in the key name
    ///
    /// Minor keys on the sharp side of the circle name their tonic with a
    /// sharp (F# minor, not Gb minor), so the name agrees with `fifths`.
    pub fn tonic_spelling(&self) -> &'static str {
        match (self.mode, self.tonic) {
            (Mode::Minor, NoteName::Gb) => "F#",
            (Mode::Minor, NoteName::Db) => "C#",
            (Mode::Minor, NoteName::Ab) => "G#",
            (_, tonic) => tonic.as_str(),
        }
    }

    /// VexFlow key spec: "Eb" for E-flat major, "Cm" for C minor, "F#m" for F-sharp minor
    pub fn vexflow_spec(&self) -> String {
        match self.mode {
            Mode::Major => self.tonic_spelling().to_string(),
            Mode::Minor => format!("{}m", self.tonic_spelling()),
        }
    }
}

impl Default for KeySignature {
    fn default() -> Self {
        KeySignature { tonic: NoteName::C, mode: Mode::Major }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vexflow_spec())
    }
}

impl FromStr for KeySignature {
    type Err = NotationError;

    /// Accepts "Eb", "Cm", "F# minor", "g major"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let (tonic_part, mode) = if let Some(rest) = lower.strip_suffix("minor") {
            (rest.trim().to_string(), Mode::Minor)
        } else if let Some(rest) = lower.strip_suffix("major") {
            (rest.trim().to_string(), Mode::Major)
        } else if lower.len() > 1 && lower.ends_with('m') {
            (lower[..lower.len() - 1].to_string(), Mode::Minor)
        } else {
            (lower, Mode::Major)
        };

        let mut chars = tonic_part.chars();
        let tonic = match chars.next() {
            Some(first) => {
                let spelled: String = first.to_uppercase().chain(chars).collect();
                spelled.parse::<NoteName>()
            }
            None => Err(NotationError::InvalidConfig(format!("empty key signature '{}'", s))),
        }
        .map_err(|_| NotationError::InvalidConfig(format!("unknown key signature '{}'", s)))?;

        Self::new(tonic, mode)
    }
}

impl TryFrom<String> for KeySignature {
    type Error = NotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeySignature> for String {
    fn from(key: KeySignature) -> Self {
        key.vexflow_spec()
    }
}
