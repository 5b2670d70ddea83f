//! Renderers module for the piano notation engine
//!
//! This module contains the export logic that turns bars into
//! descriptions a drawing library can consume.

pub mod vexflow;

// Re-export commonly used types
pub use vexflow::{bar_ties, stave_note, stave_note_in_key, staves, StaveNoteSpec, StaveSpec, TieSpec};
