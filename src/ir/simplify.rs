//! Tie coalescing
//!
//! A run of tied events with the same pitches sounds as one note, so inside
//! such a run equal durations can be merged pairwise into the next longer
//! duration. Merging repeats until nothing pairs up, the same way a binary
//! counter carries.
//!
//! Within a simplified group events are ordered shortest first, and tie flags
//! are rewritten: every event but the last is tied forward, the last keeps the
//! flag that closed the original group.

use crate::models::{Duration, MusicalEvent};

/// Split a sequence into maximal tied runs of identical pitch content
///
/// A run continues while the current event is tied and the next event has the
/// same pitches; the first event that breaks that closes the group.
pub fn group_tied_events(events: &[MusicalEvent]) -> Vec<Vec<MusicalEvent>> {
    let mut groups = Vec::new();
    let mut current: Vec<MusicalEvent> = Vec::new();

    for (i, event) in events.iter().enumerate() {
        current.push(event.clone());
        let continues = event.tied_to_next
            && events.get(i + 1).map_or(false, |next| next.same_pitches(event));
        if !continues {
            groups.push(std::mem::take(&mut current));
        }
    }

    groups
}

/// Merge two events into one of the next longer duration if possible
///
/// Returns both events untouched when the pitches differ, the durations
/// differ, or both are already whole notes.
pub fn simplify_pair(a: &MusicalEvent, b: &MusicalEvent) -> Vec<MusicalEvent> {
    if !a.same_pitches(b) || a.duration != b.duration || a.duration == Duration::Whole {
        return vec![a.clone(), b.clone()];
    }
    vec![MusicalEvent {
        notes: a.notes.clone(),
        duration: a.duration.increment(),
        tied_to_next: b.tied_to_next,
    }]
}

/// Greedily coalesce a tied group, starting from `start_duration`
///
/// Scans from `start_duration` towards Whole for two mergeable events of the
/// same duration. After every merge the scan restarts at `start_duration`,
/// because the merged event may pair with one already present.
pub fn simplify_group(group: &[MusicalEvent], start_duration: Duration) -> Vec<MusicalEvent> {
    let closing_tie = match group.last() {
        Some(last) => last.tied_to_next,
        None => return Vec::new(),
    };

    let mut pending: Vec<MusicalEvent> = group.to_vec();
    let mut current = start_duration;

    while current != Duration::Whole {
        match find_mergeable_pair(&pending, current) {
            Some((i, j)) => {
                let b = pending.remove(j);
                let a = pending.remove(i);
                for (k, merged) in simplify_pair(&a, &b).into_iter().enumerate() {
                    pending.insert(i + k, merged);
                }
                current = start_duration;
            }
            None => current = current.increment(),
        }
    }

    // Stable: equal durations keep their relative order.
    pending.sort_by_key(|e| e.elementary_units());
    retie(&mut pending, closing_tie);
    pending
}

/// Indices (i < j) of the first two events with `duration` and equal pitches
fn find_mergeable_pair(events: &[MusicalEvent], duration: Duration) -> Option<(usize, usize)> {
    let first = events.iter().position(|e| e.duration == duration)?;
    let second = events
        .iter()
        .enumerate()
        .skip(first + 1)
        .find(|(_, e)| e.duration == duration && e.same_pitches(&events[first]))
        .map(|(j, _)| j)?;
    Some((first, second))
}

fn retie(events: &mut [MusicalEvent], closing_tie: bool) {
    let len = events.len();
    for (i, event) in events.iter_mut().enumerate() {
        event.tied_to_next = if i + 1 < len { true } else { closing_tie };
    }
}

/// Coalesce every tied run in `events` into the longest notated durations
///
/// # Examples
/// ```
/// use piano_notation_wasm::ir::simplify;
/// use piano_notation_wasm::models::{Duration, MusicalEvent, NoteName};
///
/// let quarter = MusicalEvent::note(NoteName::C, Duration::Quarter);
/// assert_eq!(simplify(&quarter.expand_to_elementary()), vec![quarter]);
/// ```
pub fn simplify(events: &[MusicalEvent]) -> Vec<MusicalEvent> {
    group_tied_events(events)
        .iter()
        .flat_map(|group| simplify_group(group, Duration::ThirtySecond))
        .collect()
}
