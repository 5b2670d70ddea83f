//! WASM API for the piano notation engine
//!
//! Two kinds of functions live here. The pure ones take events or bars from
//! JavaScript and hand back new ones. The session ones work on the single
//! WASM-owned session that the virtual piano page types into.

use wasm_bindgen::prelude::*;
use std::sync::Mutex;
use lazy_static::lazy_static;

use crate::api::helpers::{
    deserialize, deserialize_bars, deserialize_events, deserialize_or_default, notation_error,
    now_ms, serialize, validation_error,
};
use crate::api::session::Session;
use crate::config::EngineConfig;
use crate::errors::NotationError;
use crate::ir::{create_bars, set_time_signature, simplify};
use crate::models::{MusicalEvent, TimeSignature};
use crate::renderers::staves;
use crate::{wasm_error, wasm_info, wasm_log};

// WASM-owned session (canonical source of truth for the piano page)
lazy_static! {
    static ref SESSION: Mutex<Option<Session>> = Mutex::new(None);
}

/// Run `f` against the current session, converting errors for JavaScript
fn with_session<T>(
    f: impl FnOnce(&mut Session) -> Result<T, NotationError>,
) -> Result<T, JsValue> {
    let mut guard = SESSION
        .lock()
        .map_err(|_| validation_error("Session lock poisoned"))?;
    let session = guard
        .as_mut()
        .ok_or_else(|| validation_error("No session: call initSession first"))?;
    f(session).map_err(notation_error)
}

fn parse_time_signature(signature: &str) -> Result<TimeSignature, JsValue> {
    signature.parse::<TimeSignature>().map_err(notation_error)
}

// ============================================================================
// Pure functions
// ============================================================================

/// Split a flat list of events into bars
///
/// # Parameters
/// - `events_js`: array of `{ notes, duration, tiedToNext }`
/// - `config_js`: optional `{ timeSignature, clef, keySignature }`
///
/// # Returns
/// Array of bars, each exactly one time signature long
#[wasm_bindgen(js_name = createBars)]
pub fn create_bars_js(events_js: JsValue, config_js: JsValue) -> Result<JsValue, JsValue> {
    let events = deserialize_events(events_js)?;
    let config: EngineConfig = deserialize_or_default(config_js, "Invalid config")?;
    config.validate().map_err(notation_error)?;

    wasm_log!("createBars: {} events in {}", events.len(), config.time_signature);

    let bars = create_bars(&events, config.time_signature, config.clef, config.key_signature)
        .map_err(notation_error)?;
    serialize(&bars, "Serialization error")
}

/// Change the time signature of bar `index` and re-bar everything after it
#[wasm_bindgen(js_name = setTimeSignature)]
pub fn set_time_signature_js(
    bars_js: JsValue,
    index: usize,
    signature: &str,
) -> Result<JsValue, JsValue> {
    let bars = deserialize_bars(bars_js)?;
    let time_signature = parse_time_signature(signature)?;

    wasm_info!("setTimeSignature called: bar {} -> {}", index, time_signature);

    let bars = set_time_signature(&bars, index, time_signature).map_err(notation_error)?;
    serialize(&bars, "Serialization error")
}

/// Coalesce tied runs into the longest notated durations
#[wasm_bindgen(js_name = simplifyEvents)]
pub fn simplify_events(events_js: JsValue) -> Result<JsValue, JsValue> {
    let events = deserialize_events(events_js)?;
    serialize(&simplify(&events), "Serialization error")
}

/// Stave descriptions for VexFlow, one per bar
#[wasm_bindgen(js_name = renderStaves)]
pub fn render_staves(bars_js: JsValue) -> Result<JsValue, JsValue> {
    let bars = deserialize_bars(bars_js)?;
    serialize(&staves(&bars), "Serialization error")
}

// ============================================================================
// Session functions
// ============================================================================

/// Start a fresh session, discarding any previous one
#[wasm_bindgen(js_name = initSession)]
pub fn init_session(config_js: JsValue) -> Result<(), JsValue> {
    let config: EngineConfig = deserialize_or_default(config_js, "Invalid config")?;
    let session = Session::new(config).map_err(notation_error)?;

    wasm_info!(
        "initSession: {} {} {}, {} undo steps",
        session.config().time_signature,
        session.config().clef,
        session.config().key_signature,
        session.config().history_limit
    );

    let mut guard = SESSION
        .lock()
        .map_err(|_| validation_error("Session lock poisoned"))?;
    *guard = Some(session);
    Ok(())
}

/// Commit the event for the keys held down on the virtual piano
///
/// # Parameters
/// - `keys_js`: array of `KeyboardEvent.key` strings held together
/// - `duration_key`: digit key selecting the duration ("1" whole .. "6" 32nd)
///
/// # Returns
/// The committed event
#[wasm_bindgen(js_name = pressKeys)]
pub fn press_keys(keys_js: JsValue, duration_key: &str) -> Result<JsValue, JsValue> {
    let keys: Vec<String> = deserialize(keys_js, "Invalid keys")?;
    wasm_log!("pressKeys: {:?} duration key '{}'", keys, duration_key);

    let event = with_session(|session| session.press_keys(&keys, duration_key))?;
    serialize(&event, "Serialization error")
}

#[wasm_bindgen(js_name = commitEvent)]
pub fn commit_event(event_js: JsValue) -> Result<(), JsValue> {
    let event: MusicalEvent = deserialize(event_js, "Invalid event")?;
    with_session(|session| session.commit(event))
}

/// Returns false when there was nothing to undo
#[wasm_bindgen]
pub fn undo() -> Result<bool, JsValue> {
    with_session(|session| session.undo())
}

/// Returns false when there was nothing to redo
#[wasm_bindgen]
pub fn redo() -> Result<bool, JsValue> {
    with_session(|session| session.redo())
}

/// Flip the tie on the most recently committed event
#[wasm_bindgen(js_name = toggleTie)]
pub fn toggle_tie() -> Result<(), JsValue> {
    with_session(|session| session.toggle_tie())
}

#[wasm_bindgen(js_name = clearHistory)]
pub fn clear_history() -> Result<(), JsValue> {
    with_session(|session| session.clear())
}

/// Re-sign bar `index` of the session; returns the new bars
#[wasm_bindgen(js_name = setSessionTimeSignature)]
pub fn set_session_time_signature(index: usize, signature: &str) -> Result<JsValue, JsValue> {
    let time_signature = parse_time_signature(signature)?;
    let bars = with_session(|session| session.set_time_signature(index, time_signature))?;
    serialize(&bars, "Serialization error")
}

/// Stave descriptions for the whole session
#[wasm_bindgen(js_name = renderSession)]
pub fn render_session() -> Result<JsValue, JsValue> {
    let start = now_ms();
    let staves = with_session(|session| session.staves())?;
    wasm_log!("renderSession: {} staves in {:.2}ms", staves.len(), now_ms() - start);
    serialize(&staves, "Serialization error")
}

/// The session's bars as pretty-printed JSON
#[wasm_bindgen(js_name = exportBarsJson)]
pub fn export_bars_json() -> Result<String, JsValue> {
    let bars = with_session(|session| session.bars())?;
    serde_json::to_string_pretty(&bars).map_err(|e| {
        wasm_error!("JSON export failed: {}", e);
        JsValue::from_str(&format!("JSON export failed: {}", e))
    })
}
