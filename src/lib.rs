//! xlviewport - spreadsheet viewport core
//!
//! Resolves what part of a large grid a client can see and what it should be
//! sent:
//! - Visible windows from a home cell and a pixel rectangle, frozen panes split out
//! - Anchored cell/column/row selections and keyboard/drag navigation
//! - Engine deltas filtered to the visible window, patch scope checks
//! - Query-string in, JSON out; usable natively, from the CLI or via WebAssembly
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { viewport_json } from 'xlviewport';
//! await init();
//! const response = JSON.parse(viewport_json(
//!   'home=A1&width=800&height=600&includeFrozenColumnsRows=true&navigation=down-row',
//!   JSON.stringify({ frozenRows: 1 }),
//! ));
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod filter;
pub mod labels;
pub mod layout;
pub mod navigation;
pub mod query;
pub mod request;
pub mod types;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use error::{Result, ViewportError};
pub use layout::{compute_window, GridMetrics, SheetLayout};
pub use navigation::{apply_navigations, extend, navigate, NavigationState};
pub use query::{RequiredKeys, ViewportQuery};
pub use request::{ViewportRequest, ViewportResponse};
pub use types::*;

use labels::NoLabels;

/// Install the panic hook and, with the `console` feature, a console logger.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    #[cfg(feature = "console")]
    {
        // A logger may already be installed by the embedding page.
        let _ = console_log::init_with_level(log::Level::Debug);
    }
}

fn resolve_query(query: &str, config_json: Option<String>, delta_json: Option<String>) -> Result<ViewportResponse> {
    let config = match config_json {
        Some(json) => GridConfig::from_json(&json)?,
        None => GridConfig::default(),
    };
    let layout = SheetLayout::from_config(&config)?;
    let delta: Option<Delta> = delta_json.map(|json| serde_json::from_str(&json)).transpose()?;

    ViewportRequest::new(&layout, &NoLabels).handle(query, RequiredKeys::Window, delta.as_ref())
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Resolve a viewport query string and return the response as JSON
///
/// # Arguments
/// * `query` - `home=..&width=..&height=..&includeFrozenColumnsRows=..`, plus
///   optional selection, navigation or window keys
/// * `config_json` - Grid sizes and frozen panes (`GridConfig` JSON)
/// * `delta_json` - Engine delta to filter to the resulting window
///
/// # Errors
/// Returns the client-facing message when the query, config or delta is invalid.
#[wasm_bindgen]
pub fn viewport_json(
    query: &str,
    config_json: Option<String>,
    delta_json: Option<String>,
) -> std::result::Result<String, JsValue> {
    let response = resolve_query(query, config_json, delta_json).map_err(to_js_error)?;
    serde_json::to_string(&response).map_err(|e| to_js_error(format!("JSON serialization error: {e}")))
}

/// Like `viewport_json`, returning a `JsValue` instead of a JSON string.
///
/// # Errors
/// Returns the client-facing message when the query or config is invalid.
#[wasm_bindgen]
pub fn viewport_to_js(query: &str, config_json: Option<String>) -> std::result::Result<JsValue, JsValue> {
    let response = resolve_query(query, config_json, None).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&response).map_err(|e| to_js_error(format!("Serialization error: {e}")))
}

/// Filter a delta to an explicit window such as `A1:D20,F1:H20`.
///
/// # Errors
/// Returns an error if the delta JSON or the window text is invalid.
#[wasm_bindgen]
pub fn filter_delta_json(delta_json: &str, window: &str) -> std::result::Result<String, JsValue> {
    let delta: Delta = serde_json::from_str(delta_json).map_err(to_js_error)?;
    let window: Window = window.parse().map_err(to_js_error)?;
    let filtered = filter::filter_by_window(&delta, &window);
    serde_json::to_string(&filtered).map_err(to_js_error)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
