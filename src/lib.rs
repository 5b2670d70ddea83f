//! Piano Notation WASM Module
//!
//! The notation engine behind a browser virtual piano: it turns the events
//! typed on the keyboard into bars with ties at the bar lines and hands
//! VexFlow stave descriptions back to JavaScript.

pub mod errors;
pub mod models;
pub mod ir;
pub mod renderers;
pub mod undo;
pub mod keyboard;
pub mod config;
pub mod api;

// Re-export commonly used types
pub use errors::{NotationError, NotationResult};
pub use models::{Duration, KeySignature, MusicalEvent, NoteName, TimeSignature};
pub use ir::{Bar, Clef};
pub use config::EngineConfig;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logging();

    log::info!("Piano notation WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logging() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        crate::wasm_warn!("logger was already initialized");
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}
