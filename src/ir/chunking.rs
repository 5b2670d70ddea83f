//! Tie-aware splitting of event streams
//!
//! Splitting always goes through elementary units: the stream is expanded to
//! thirty-second notes (ties between them), cut at the requested sizes, and
//! each piece is simplified back into notated durations. A note crossing a cut
//! ends up as two tied halves because the elementary unit before the cut is
//! still tied forward.

use crate::errors::NotationError;
use crate::ir::simplify::simplify;
use crate::models::MusicalEvent;

/// Flat elementary expansion of a whole sequence
pub fn expand_to_elementary(events: &[MusicalEvent]) -> Vec<MusicalEvent> {
    events.iter().flat_map(|e| e.expand_to_elementary()).collect()
}

/// Total elementary length, without materialising the expansion
pub fn total_units(events: &[MusicalEvent]) -> usize {
    events.iter().map(|e| e.elementary_units()).sum()
}

/// Partition `events` into consecutive chunks of `sizes` elementary units
///
/// `sizes` must add up to exactly the events' elementary length. Each chunk is
/// simplified independently.
///
/// # Errors
/// - `LengthMismatch` when the sizes and the events disagree on total length
/// - `InvalidChunkSize` when a requested size is zero
pub fn chunk(
    events: &[MusicalEvent],
    sizes: &[usize],
) -> Result<Vec<Vec<MusicalEvent>>, NotationError> {
    if let Some(index) = sizes.iter().position(|&s| s == 0) {
        return Err(NotationError::InvalidChunkSize { index });
    }

    let expected: usize = sizes.iter().sum();
    let actual = total_units(events);
    if expected != actual {
        return Err(NotationError::LengthMismatch { expected, actual });
    }

    let flat = expand_to_elementary(events);
    let mut chunks = Vec::with_capacity(sizes.len());
    let mut start = 0;
    for &size in sizes {
        let end = start + size;
        chunks.push(simplify(&flat[start..end]));
        start = end;
    }

    log::trace!("chunked {} units into {} chunks", actual, chunks.len());
    Ok(chunks)
}
