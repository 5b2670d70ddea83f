//! Computer keyboard to note and duration tables
//!
//! The tables live in `keymap.yaml`, embedded at compile time and parsed once
//! into immutable maps. Keys are matched case-insensitively, the way the
//! browser reports `KeyboardEvent.key` with and without shift.

use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::NotationError;
use crate::models::{Duration, MusicalEvent, NoteName};

/// Layout of `keymap.yaml`
#[derive(Debug, Deserialize)]
struct KeyMapFile {
    notes: HashMap<String, NoteName>,
    #[serde(default)]
    pause: Vec<String>,
    durations: HashMap<String, Duration>,
}

#[derive(Debug)]
struct KeyMap {
    notes: HashMap<String, NoteName>,
    durations: HashMap<String, Duration>,
}

impl KeyMap {
    fn parse(source: &str) -> Result<KeyMap, String> {
        let file: KeyMapFile = serde_yaml::from_str(source)
            .map_err(|e| format!("Failed to parse keymap.yaml: {}", e))?;

        let mut notes: HashMap<String, NoteName> = file
            .notes
            .into_iter()
            .map(|(key, note)| (key.to_lowercase(), note))
            .collect();
        for key in file.pause {
            notes.insert(key.to_lowercase(), NoteName::Pause);
        }

        Ok(KeyMap { notes, durations: file.durations })
    }
}

lazy_static! {
    static ref KEYMAP: Result<KeyMap, String> = KeyMap::parse(include_str!("keymap.yaml"));
}

fn keymap() -> Result<&'static KeyMap, NotationError> {
    KEYMAP.as_ref().map_err(|e| NotationError::InvalidConfig(e.clone()))
}

/// Note name bound to a key, `None` if the key plays nothing
pub fn note_for_key(key: &str) -> Option<NoteName> {
    keymap().ok()?.notes.get(&key.to_lowercase()).copied()
}

/// Duration bound to a key (digits 1-6, whole down to thirty-second)
pub fn duration_for_key(key: &str) -> Option<Duration> {
    keymap().ok()?.durations.get(key.trim()).copied()
}

/// Build the event for a set of simultaneously held keys
///
/// Several pitch keys form a chord; the pause key alone forms a rest.
///
/// # Errors
/// - `UnknownKey` for a key with no note binding
/// - `InvalidEvent` for no keys at all, or the pause key held with pitches
pub fn event_from_keys<S: AsRef<str>>(
    keys: &[S],
    duration: Duration,
) -> Result<MusicalEvent, NotationError> {
    let map = keymap()?;
    let notes = keys
        .iter()
        .map(|key| {
            let key = key.as_ref();
            map.notes
                .get(&key.to_lowercase())
                .copied()
                .ok_or_else(|| NotationError::UnknownKey(key.to_string()))
        })
        .collect::<Result<Vec<NoteName>, NotationError>>()?;

    MusicalEvent::new(notes, duration)
}

/// Every key bound to a note, for the on-screen piano labels
pub fn bound_keys() -> Vec<(String, NoteName)> {
    let mut keys: Vec<(String, NoteName)> = keymap()
        .map(|map| map.notes.iter().map(|(k, n)| (k.clone(), *n)).collect())
        .unwrap_or_default();
    keys.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    keys
}
