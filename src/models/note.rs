//! Pitch classes and the pause marker

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::NotationError;

/// Twelve pitch classes in cyclic semitone order, plus the rest marker.
///
/// Declaration order is the canonical order used to sort chord pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
    #[serde(rename = "PAUSE")]
    Pause,
}

pub const PITCH_CLASSES: [NoteName; 12] = [
    NoteName::C,
    NoteName::Db,
    NoteName::D,
    NoteName::Eb,
    NoteName::E,
    NoteName::F,
    NoteName::Gb,
    NoteName::G,
    NoteName::Ab,
    NoteName::A,
    NoteName::Bb,
    NoteName::B,
];

impl NoteName {
    pub fn is_pause(self) -> bool {
        self == NoteName::Pause
    }

    /// Semitones above C, `None` for a pause
    pub fn semitone(self) -> Option<u8> {
        PITCH_CLASSES.iter().position(|&n| n == self).map(|i| i as u8)
    }

    /// MIDI note number in the given octave (C4 = 60)
    pub fn midi(self, octave: u8) -> Option<u8> {
        let semitone = self.semitone()? as u16;
        let value = (octave as u16 + 1) * 12 + semitone;
        u8::try_from(value).ok().filter(|v| *v <= 127)
    }

    /// Move around the pitch-class cycle. Pause stays a pause.
    pub fn transpose(self, semitones: i32) -> NoteName {
        match self.semitone() {
            Some(s) => PITCH_CLASSES[(s as i32 + semitones).rem_euclid(12) as usize],
            None => NoteName::Pause,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::Db => "Db",
            NoteName::D => "D",
            NoteName::Eb => "Eb",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Gb => "Gb",
            NoteName::G => "G",
            NoteName::Ab => "Ab",
            NoteName::A => "A",
            NoteName::Bb => "Bb",
            NoteName::B => "B",
            NoteName::Pause => "PAUSE",
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NoteName {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" | "B#" => Ok(NoteName::C),
            "Db" | "C#" => Ok(NoteName::Db),
            "D" => Ok(NoteName::D),
            "Eb" | "D#" => Ok(NoteName::Eb),
            "E" | "Fb" => Ok(NoteName::E),
            "F" | "E#" => Ok(NoteName::F),
            "Gb" | "F#" => Ok(NoteName::Gb),
            "G" => Ok(NoteName::G),
            "Ab" | "G#" => Ok(NoteName::Ab),
            "A" => Ok(NoteName::A),
            "Bb" | "A#" => Ok(NoteName::Bb),
            "B" | "Cb" => Ok(NoteName::B),
            "PAUSE" | "pause" | "rest" => Ok(NoteName::Pause),
            other => Err(NotationError::InvalidEvent(format!("unknown note name '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semitones_and_midi() {
        assert_eq!(NoteName::C.semitone(), Some(0));
        assert_eq!(NoteName::B.semitone(), Some(11));
        assert_eq!(NoteName::Pause.semitone(), None);
        assert_eq!(NoteName::C.midi(4), Some(60));
        assert_eq!(NoteName::A.midi(4), Some(69));
        assert_eq!(NoteName::Pause.midi(4), None);
        assert_eq!(NoteName::B.midi(10), None);
    }

    #[test]
    fn test_transpose_is_cyclic() {
        assert_eq!(NoteName::B.transpose(1), NoteName::C);
        assert_eq!(NoteName::C.transpose(-1), NoteName::B);
        assert_eq!(NoteName::E.transpose(24), NoteName::E);
        assert_eq!(NoteName::Pause.transpose(3), NoteName::Pause);
    }

    #[test]
    fn test_parse_enharmonics() {
        assert_eq!("F#".parse::<NoteName>(), Ok(NoteName::Gb));
        assert_eq!("Bb".parse::<NoteName>(), Ok(NoteName::Bb));
        assert!("H".parse::<NoteName>().is_err());
    }
}
