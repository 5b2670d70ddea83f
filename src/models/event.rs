//! Musical events: a note, a chord or a pause with a duration and a tie flag
//!
//! `tied_to_next` only means something relative to the following element of
//! whatever sequence holds the event. Code that splits, joins or reorders
//! sequences recomputes it rather than copying it positionally.

use serde::{Deserialize, Serialize};

use super::duration::Duration;
use super::note::NoteName;
use crate::errors::NotationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicalEvent {
    /// Simultaneous pitches in canonical order, or exactly `[Pause]`
    pub notes: Vec<NoteName>,
    pub duration: Duration,
    #[serde(default)]
    pub tied_to_next: bool,
}

impl MusicalEvent {
    /// Build an event from any set of note names.
    ///
    /// Pitches are sorted and deduplicated. An empty set, or a pause mixed
    /// with pitches, is rejected.
    pub fn new(notes: Vec<NoteName>, duration: Duration) -> Result<Self, NotationError> {
        let mut notes = notes;
        notes.sort();
        notes.dedup();
        if notes.is_empty() {
            return Err(NotationError::InvalidEvent("event has no notes".to_string()));
        }
        if notes.len() > 1 && notes.contains(&NoteName::Pause) {
            return Err(NotationError::InvalidEvent(
                "a pause can not be part of a chord".to_string(),
            ));
        }
        Ok(MusicalEvent { notes, duration, tied_to_next: false })
    }

    /// Re-check an event that was built field by field (e.g. deserialized)
    pub fn normalized(self) -> Result<Self, NotationError> {
        let tied_to_next = self.tied_to_next;
        Ok(Self::new(self.notes, self.duration)?.tied(tied_to_next))
    }

    pub fn note(name: NoteName, duration: Duration) -> Self {
        MusicalEvent { notes: vec![name], duration, tied_to_next: false }
    }

    pub fn chord(names: Vec<NoteName>, duration: Duration) -> Result<Self, NotationError> {
        Self::new(names, duration)
    }

    pub fn pause(duration: Duration) -> Self {
        Self::note(NoteName::Pause, duration)
    }

    pub fn tied(mut self, tied_to_next: bool) -> Self {
        self.tied_to_next = tied_to_next;
        self
    }

    pub fn with_duration(&self, duration: Duration) -> Self {
        MusicalEvent { duration, ..self.clone() }
    }

    pub fn is_rest(&self) -> bool {
        self.notes.iter().all(|n| n.is_pause())
    }

    pub fn is_chord(&self) -> bool {
        self.notes.len() > 1
    }

    /// Identical pitch content (tie flag and duration ignored)
    pub fn same_pitches(&self, other: &MusicalEvent) -> bool {
        self.notes == other.notes
    }

    pub fn elementary_units(&self) -> usize {
        self.duration.elementary_units()
    }

    /// Expand into elementary events of the same pitch content.
    ///
    /// All but the last are tied forward; the last keeps this event's flag.
    ///
    /// # Examples
    /// ```
    /// use piano_notation_wasm::models::{Duration, MusicalEvent, NoteName};
    ///
    /// let parts = MusicalEvent::note(NoteName::C, Duration::Quarter).expand_to_elementary();
    /// assert_eq!(parts.len(), 8);
    /// assert_eq!(parts.iter().filter(|e| e.tied_to_next).count(), 7);
    /// assert!(!parts[7].tied_to_next);
    /// ```
    pub fn expand_to_elementary(&self) -> Vec<MusicalEvent> {
        let units = self.elementary_units();
        (0..units)
            .map(|i| MusicalEvent {
                notes: self.notes.clone(),
                duration: Duration::ThirtySecond,
                tied_to_next: if i + 1 < units { true } else { self.tied_to_next },
            })
            .collect()
    }
}
