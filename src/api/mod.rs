//! Piano notation WASM API
//!
//! This module provides the JavaScript-facing API for the virtual piano page.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error conversion, logging and timing
//! - `session`: The WASM-owned editing session (history, configuration, signature changes)
//! - `core`: The `#[wasm_bindgen]` functions themselves

pub mod helpers;
pub mod session;
pub mod core;

// Re-export all public functions to keep the API flat
pub use self::core::*;
pub use session::Session;
