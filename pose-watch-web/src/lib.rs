//! Pose Watch Web - suspicious activity flagging from a webcam pose feed
//! 
//! Entry point for WASM module. Only contains:
//! - Console logging macros
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

macro_rules! console_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

macro_rules! console_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

pub mod bridge;
pub mod classifier;
pub mod config;
pub mod error;
pub mod renderer;
pub mod session;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen types for JS access
pub use session::PageController;

pub use classifier::{ActivityClassifier, ActivityVerdict, ClassPrediction, SuspiciousEntry};
pub use config::SessionConfig;
pub use error::SessionError;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Run the suspicious activity rule on a JS array of
/// `{ className, probability }` with the default settings.
/// Returns the qualifying entries, most likely first.
#[wasm_bindgen(js_name = classifyActivity)]
pub fn classify_activity(predictions: JsValue) -> Result<JsValue, JsValue> {
    let predictions: Vec<ClassPrediction> = serde_wasm_bindgen::from_value(predictions)
        .map_err(|e| JsValue::from_str(&format!("invalid input: {}", e)))?;
    let verdict = ActivityClassifier::default()
        .classify(&predictions)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let entries = js_sys::Array::new();
    for entry in &verdict.suspicious {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"className".into(), &entry.class_name.as_str().into())?;
        js_sys::Reflect::set(&obj, &"probability".into(), &entry.probability.into())?;
        entries.push(&obj);
    }
    Ok(entries.into())
}
