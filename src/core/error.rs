//! Error types for the snow globe engine.
//!
//! Nothing here reaches the end user: errors are logged and the widget
//! degrades visually (missing layer, stopped animation).

use std::fmt;

use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum GlobeError {
    /// Configuration or asset manifest could not be parsed or is inconsistent.
    Config(String),
    /// A required DOM object (window, canvas, 2d context) is unavailable.
    Dom(String),
    /// A body ended a step with a NaN/infinite position or velocity.
    NonFinite { body: u32 },
    /// A JavaScript call failed.
    Js(String),
}

impl fmt::Display for GlobeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobeError::Config(msg) => write!(f, "Invalid snow globe configuration: {}", msg),
            GlobeError::Dom(msg) => write!(f, "DOM unavailable: {}", msg),
            GlobeError::NonFinite { body } => {
                write!(f, "Body {} has a non-finite position or velocity", body)
            }
            GlobeError::Js(msg) => write!(f, "JavaScript error: {}", msg),
        }
    }
}

impl std::error::Error for GlobeError {}

impl From<serde_json::Error> for GlobeError {
    fn from(e: serde_json::Error) -> Self {
        GlobeError::Config(e.to_string())
    }
}

impl From<GlobeError> for JsValue {
    fn from(e: GlobeError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl GlobeError {
    /// Wrap a thrown JS value, keeping its string form when it has one.
    pub fn from_js(value: &JsValue) -> Self {
        GlobeError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_json_maps_to_config_error() {
        let err: GlobeError = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert!(matches!(err, GlobeError::Config(_)));
    }

    #[test]
    fn non_finite_message_names_body() {
        let msg = GlobeError::NonFinite { body: 7 }.to_string();
        assert!(msg.contains("Body 7"));
    }
}
