//! Measurization: turning a flat event history into full bars
//!
//! This module converts the committed performance history into bars that each
//! hold exactly one time signature's worth of music.
//!
//! # Architecture
//!
//! ```text
//! history (flat events) → CHUNKING (elementary units) → SIMPLIFY → Bars
//!                                                         ↓
//!                                          final bar padded with rests
//! ```
//!
//! # Key Features
//!
//! - Splits events across bar boundaries with ties
//! - Pads the final bar with the minimal set of rests
//! - Re-bars everything from a given bar onward when its signature changes

use serde::{Deserialize, Serialize};

use crate::errors::NotationError;
use crate::ir::chunking::{chunk, expand_to_elementary, total_units};
use crate::ir::clef::Clef;
use crate::ir::simplify::simplify;
use crate::models::{Duration, KeySignature, MusicalEvent, TimeSignature, DURATION_ORDER};

/// A single bar (measure) of events
///
/// INVARIANT: the events' elementary units add up to the time signature's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub time_signature: TimeSignature,
    pub clef: Clef,
    pub key_signature: KeySignature,
    pub events: Vec<MusicalEvent>,
    /// Elementary units of rest appended by assembly (final bar only)
    #[serde(default)]
    pub padding_units: usize,
}

impl Bar {
    pub fn new(
        time_signature: TimeSignature,
        clef: Clef,
        key_signature: KeySignature,
        events: Vec<MusicalEvent>,
    ) -> Self {
        Bar { time_signature, clef, key_signature, events, padding_units: 0 }
    }

    pub fn elementary_units(&self) -> usize {
        total_units(&self.events)
    }

    /// True when the events fill the time signature exactly
    pub fn is_full(&self) -> bool {
        self.time_signature
            .elementary_units()
            .map_or(false, |units| units == self.elementary_units())
    }

    /// Whether the last event carries a tie into the next bar
    pub fn ends_tied(&self) -> bool {
        self.events.last().map_or(false, |e| e.tied_to_next)
    }

    /// Re-check a bar that did not come out of `create_bars`
    ///
    /// Events are normalized; the bar must be exactly full and its padding
    /// must lie entirely within the trailing rests.
    pub fn validated(self) -> Result<Bar, NotationError> {
        let expected = self.time_signature.elementary_units()?;
        let events = self
            .events
            .into_iter()
            .map(MusicalEvent::normalized)
            .collect::<Result<Vec<_>, _>>()?;
        let actual = total_units(&events);
        if actual != expected {
            return Err(NotationError::LengthMismatch { expected, actual });
        }

        let trailing_rests: usize = events
            .iter()
            .rev()
            .take_while(|e| e.is_rest())
            .map(MusicalEvent::elementary_units)
            .sum();
        if self.padding_units > trailing_rests {
            return Err(NotationError::InvalidEvent(format!(
                "padding of {} units covers more than the {} units of trailing rests",
                self.padding_units, trailing_rests
            )));
        }
        Ok(Bar { events, ..self })
    }
}

/// Rests filling the rest of a chunk up to `chunk_size` elementary units
///
/// The shortfall is decomposed into powers of two (whole rests for every 32
/// units), emitted shortest first, none of them tied.
///
/// # Errors
/// `LengthMismatch` if the chunk is already longer than `chunk_size`.
pub fn reciprocal_chunk(
    chunk: &[MusicalEvent],
    chunk_size: usize,
) -> Result<Vec<MusicalEvent>, NotationError> {
    let filled = total_units(chunk);
    if filled > chunk_size {
        return Err(NotationError::LengthMismatch { expected: chunk_size, actual: filled });
    }
    Ok(rests_for_units(chunk_size - filled))
}

fn rests_for_units(units: usize) -> Vec<MusicalEvent> {
    let whole_units = Duration::Whole.elementary_units();
    let remainder = units % whole_units;

    let mut rests: Vec<MusicalEvent> = DURATION_ORDER
        .iter()
        .rev()
        .filter(|d| **d != Duration::Whole && remainder & d.elementary_units() != 0)
        .map(|d| MusicalEvent::pause(*d))
        .collect();
    rests.extend((0..units / whole_units).map(|_| MusicalEvent::pause(Duration::Whole)));
    rests
}

/// Main entry point: split a flat event stream into full bars
///
/// Chunk sizes handed to `chunk` always match the stream exactly: every full
/// bar, then the leftover units of an underfull final bar, which is padded
/// afterwards with `reciprocal_chunk`.
///
/// # Examples
/// ```
/// use piano_notation_wasm::ir::{create_bars, Clef};
/// use piano_notation_wasm::models::{Duration, KeySignature, MusicalEvent, NoteName, TimeSignature};
///
/// let ts = TimeSignature::new(3, Duration::Quarter).unwrap();
/// let events = vec![MusicalEvent::note(NoteName::C, Duration::Whole)];
/// let bars = create_bars(&events, ts, Clef::Treble, KeySignature::default()).unwrap();
/// assert_eq!(bars.len(), 2);
/// assert!(bars.iter().all(|bar| bar.is_full()));
/// ```
pub fn create_bars(
    events: &[MusicalEvent],
    time_signature: TimeSignature,
    clef: Clef,
    key_signature: KeySignature,
) -> Result<Vec<Bar>, NotationError> {
    if events.is_empty() {
        return Ok(vec![]);
    }

    // Step 1: Bar length and content length in elementary units
    let chunk_size = time_signature.elementary_units()?;
    let total = total_units(events);

    // Step 2: One size per full bar, plus the exact remainder
    let full_bars = total / chunk_size;
    let remainder = total % chunk_size;
    let mut sizes = vec![chunk_size; full_bars];
    if remainder > 0 {
        sizes.push(remainder);
    }

    // Step 3: Split (ties are re-inserted at every cut)
    let mut chunks = chunk(events, &sizes)?;

    // Step 4: Pad an underfull final bar
    let mut padding_units = 0;
    if remainder > 0 {
        if let Some(last) = chunks.last_mut() {
            let padding = reciprocal_chunk(last, chunk_size)?;
            padding_units = total_units(&padding);
            last.extend(padding);
        }
    }

    let bar_count = chunks.len();
    let bars: Vec<Bar> = chunks
        .into_iter()
        .enumerate()
        .map(|(i, events)| Bar {
            time_signature,
            clef,
            key_signature,
            events,
            padding_units: if i + 1 == bar_count { padding_units } else { 0 },
        })
        .collect();

    log::debug!(
        "create_bars: {} units into {} bars of {} ({} units padding)",
        total,
        bars.len(),
        time_signature,
        padding_units
    );

    Ok(bars)
}

/// Flatten bars back into one simplified event stream
///
/// Padding rests at the end of the final bar are dropped, and notes split at
/// a bar line are merged again through the ties encoded in each bar.
pub fn content_events(bars: &[Bar]) -> Vec<MusicalEvent> {
    let joined: Vec<MusicalEvent> = bars.iter().flat_map(|b| b.events.iter().cloned()).collect();
    let padding = bars.last().map_or(0, |b| b.padding_units);
    let mut flat = expand_to_elementary(&joined);
    flat.truncate(flat.len().saturating_sub(padding));
    simplify(&flat)
}

/// Change the time signature from bar `index` onward
///
/// Bars before `index` are untouched. Everything from `index` on is re-barred
/// under the new signature with `bars[index]`'s clef and key signature, so a
/// shorter signature produces more bars and a longer one fewer.
pub fn set_time_signature(
    bars: &[Bar],
    index: usize,
    time_signature: TimeSignature,
) -> Result<Vec<Bar>, NotationError> {
    let anchor = bars
        .get(index)
        .ok_or(NotationError::BarIndexOutOfRange { index, len: bars.len() })?;
    time_signature.validate()?;

    let content = content_events(&bars[index..]);
    let rebuilt = create_bars(&content, time_signature, anchor.clef, anchor.key_signature)?;

    log::debug!(
        "set_time_signature: bar {} {} -> {}, {} bars replaced by {}",
        index,
        anchor.time_signature,
        time_signature,
        bars.len() - index,
        rebuilt.len()
    );

    let mut result = bars[..index].to_vec();
    result.extend(rebuilt);
    Ok(result)
}
