//! Bars to VexFlow stave descriptions
//!
//! The JavaScript side draws with VexFlow, so this module only produces plain
//! serializable descriptions: one `StaveSpec` per bar holding `StaveNote`
//! arguments and `StaveTie` index pairs. Ties are drawn between notes of the
//! same pitch content only; a tie flag on a rest, or into a different pitch,
//! is not drawn.

use serde::Serialize;

use crate::ir::{Bar, Clef};
use crate::models::{KeySignature, MusicalEvent, NoteName};

/// Arguments for one `new StaveNote({ keys, duration })`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaveNoteSpec {
    /// VexFlow keys such as "c/4", lowest first
    pub keys: Vec<String>,
    /// Duration code, with an `r` suffix for rests ("qr")
    pub duration: String,
    pub is_rest: bool,
    /// Accidental to draw next to each key, if any ("#", "b" or "n")
    pub accidentals: Vec<Option<String>>,
}

/// One `StaveTie`; a missing index is an open end at the bar line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TieSpec {
    pub first_index: Option<usize>,
    pub last_index: Option<usize>,
    /// Chord key indices joined by the tie
    pub key_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaveSpec {
    pub clef: String,
    pub time_signature: String,
    pub key_signature: String,
    /// Draw clef, key and time signature at the start of this stave
    pub show_signature: bool,
    pub notes: Vec<StaveNoteSpec>,
    pub ties: Vec<TieSpec>,
}

const FLAT_SPELLING: [&str; 12] = ["c", "db", "d", "eb", "e", "f", "gb", "g", "ab", "a", "bb", "b"];
const SHARP_SPELLING: [&str; 12] = ["c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b"];

/// Letter plus accidental, spelled with sharps in sharp keys
fn spell(note: NoteName, key: &KeySignature) -> Option<&'static str> {
    let semitone = note.semitone()? as usize;
    if key.fifths() > 0 {
        Some(SHARP_SPELLING[semitone])
    } else {
        Some(FLAT_SPELLING[semitone])
    }
}

fn accidental(note: NoteName, key: &KeySignature) -> Option<String> {
    if key.scale_step(note).is_some() {
        return None;
    }
    let spelled = spell(note, key)?;
    match spelled.chars().nth(1) {
        Some(accidental) => Some(accidental.to_string()),
        None => Some("n".to_string()),
    }
}

/// StaveNote arguments for an event, spelled for C major
pub fn stave_note(event: &MusicalEvent, clef: Clef) -> StaveNoteSpec {
    stave_note_in_key(event, clef, &KeySignature::default())
}

/// StaveNote arguments for an event in a given key
///
/// Events carry no octave: every pitch is placed in the clef's default
/// octave. Chord pitches are already in ascending pitch-class order.
pub fn stave_note_in_key(event: &MusicalEvent, clef: Clef, key: &KeySignature) -> StaveNoteSpec {
    let code = event.duration.vexflow_code();
    if event.is_rest() {
        return StaveNoteSpec {
            keys: vec![clef.rest_key().to_string()],
            duration: format!("{}r", code),
            is_rest: true,
            accidentals: vec![None],
        };
    }

    let octave = clef.default_octave();
    let pitched: Vec<NoteName> = event.notes.iter().copied().filter(|n| !n.is_pause()).collect();
    StaveNoteSpec {
        keys: pitched
            .iter()
            .filter_map(|&n| spell(n, key))
            .map(|name| format!("{}/{}", name, octave))
            .collect(),
        duration: code.to_string(),
        is_rest: false,
        accidentals: pitched.iter().map(|&n| accidental(n, key)).collect(),
    }
}

fn tie_keys(event: &MusicalEvent) -> Vec<usize> {
    (0..event.notes.len()).collect()
}

/// Ties to draw inside one bar
///
/// `tied_in` adds an incoming tie into the first event (from the previous
/// bar). A tied final event gets an open-ended outgoing tie.
pub fn bar_ties(bar: &Bar, tied_in: bool) -> Vec<TieSpec> {
    let events = &bar.events;
    let mut ties = Vec::new();

    if tied_in {
        if let Some(first) = events.first().filter(|e| !e.is_rest()) {
            ties.push(TieSpec { first_index: None, last_index: Some(0), key_indices: tie_keys(first) });
        }
    }

    for (i, event) in events.iter().enumerate() {
        if !event.tied_to_next || event.is_rest() {
            continue;
        }
        match events.get(i + 1) {
            Some(next) if next.same_pitches(event) => ties.push(TieSpec {
                first_index: Some(i),
                last_index: Some(i + 1),
                key_indices: tie_keys(event),
            }),
            Some(_) => {}
            None => ties.push(TieSpec {
                first_index: Some(i),
                last_index: None,
                key_indices: tie_keys(event),
            }),
        }
    }

    ties
}

/// Whether the last event of `left` is drawn tied into the first of `right`
fn tied_across(left: &Bar, right: Option<&Bar>) -> bool {
    match (left.events.last(), right.and_then(|b| b.events.first())) {
        (Some(last), Some(first)) => last.tied_to_next && !last.is_rest() && last.same_pitches(first),
        _ => false,
    }
}

/// One stave description per bar
pub fn staves(bars: &[Bar]) -> Vec<StaveSpec> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let previous = i.checked_sub(1).and_then(|p| bars.get(p));
            let tied_in = previous.map_or(false, |prev| tied_across(prev, Some(bar)));
            let tied_out = tied_across(bar, bars.get(i + 1));

            let mut ties = bar_ties(bar, tied_in);
            if !tied_out {
                ties.retain(|t| t.last_index.is_some());
            }

            let show_signature = previous.map_or(true, |prev| {
                prev.time_signature != bar.time_signature
                    || prev.key_signature != bar.key_signature
                    || prev.clef != bar.clef
            });

            StaveSpec {
                clef: bar.clef.as_str().to_string(),
                time_signature: bar.time_signature.to_string(),
                key_signature: bar.key_signature.vexflow_spec(),
                show_signature,
                notes: bar
                    .events
                    .iter()
                    .map(|e| stave_note_in_key(e, bar.clef, &bar.key_signature))
                    .collect(),
                ties,
            }
        })
        .collect()
}
