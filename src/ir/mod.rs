//! Intermediate Representation (IR) Module
//!
//! Everything between the flat performance history and rendered bars.
//!
//! # Architecture
//!
//! ```text
//! Performance history (flat MusicalEvents)
//!     ↓
//! Chunking (elementary units, tie-aware cuts)
//!     ↓
//! Simplify (tie coalescing)
//!     ↓
//! Measurization (full bars, padded final bar)
//! ```
//!
//! # Modules
//!
//! - **chunking**: Elementary expansion and exact-size partitioning
//! - **simplify**: Merging tied runs back into notated durations
//! - **measurization**: Bar assembly and time signature changes
//! - **clef**: Stave clefs used when bars are rendered

pub mod chunking;
pub mod clef;
pub mod measurization;
pub mod simplify;

pub use chunking::{chunk, expand_to_elementary, total_units};
pub use clef::Clef;
pub use measurization::{
    content_events,
    create_bars,
    reciprocal_chunk,
    set_time_signature,
    Bar,
};
pub use simplify::{group_tied_events, simplify, simplify_group, simplify_pair};
