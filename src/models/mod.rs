//! Models module for the piano notation engine
//!
//! Value types shared by every other layer: durations, time and key
//! signatures, pitch names and the events built from them.

pub mod duration;
pub mod event;
pub mod key_signature;
pub mod note;
pub mod time_signature;

// Re-export commonly used types
pub use duration::{Duration, DURATION_ORDER, UNITS_PER_WHOLE};
pub use event::MusicalEvent;
pub use key_signature::{KeySignature, Mode};
pub use note::{NoteName, PITCH_CLASSES};
pub use time_signature::{TimeSignature, MAX_BAR_UNITS};
