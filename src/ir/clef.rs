//! Clefs for the rendered stave
//!
//! Each clef carries the octave its notes are placed in by default and the key
//! VexFlow anchors rests on, so that events without octave information still
//! land in the middle of the stave.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::NotationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    #[default]
    Treble,
    Bass,
    Alto,
    Tenor,
}

impl Clef {
    /// VexFlow clef name
    pub fn as_str(&self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
            Clef::Alto => "alto",
            Clef::Tenor => "tenor",
        }
    }

    /// Octave used for pitches entered without one
    ///
    /// Middle C is octave 4. Bass and tenor staves sit lower.
    pub fn default_octave(&self) -> u8 {
        match self {
            Clef::Treble => 4,
            Clef::Alto => 4,
            Clef::Bass => 3,
            Clef::Tenor => 3,
        }
    }

    /// Middle line of the stave, where VexFlow places rests
    pub fn rest_key(&self) -> &'static str {
        match self {
            Clef::Treble => "b/4",
            Clef::Bass => "d/3",
            Clef::Alto => "c/4",
            Clef::Tenor => "a/3",
        }
    }
}

impl fmt::Display for Clef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Clef {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "treble" | "g" => Ok(Clef::Treble),
            "bass" | "f" => Ok(Clef::Bass),
            "alto" | "c" => Ok(Clef::Alto),
            "tenor" => Ok(Clef::Tenor),
            other => Err(NotationError::InvalidConfig(format!("unknown clef '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_treble() {
        assert_eq!(Clef::default(), Clef::Treble);
        assert_eq!(Clef::default().default_octave(), 4);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Bass".parse::<Clef>(), Ok(Clef::Bass));
        assert_eq!("G".parse::<Clef>(), Ok(Clef::Treble));
        assert!("soprano".parse::<Clef>().is_err());
    }

    #[test]
    fn test_rest_key_matches_default_octave_region() {
        assert_eq!(Clef::Bass.rest_key(), "d/3");
        assert_eq!(Clef::Treble.rest_key(), "b/4");
    }
}
