//! Session errors and their conversion at the JS boundary

use std::fmt;
use wasm_bindgen::{JsCast, JsValue};

/// Errors that end or prevent a session
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    InvalidConfig(String),
    MissingElement(&'static str),
    ModelLoad(String),
    CameraUnavailable(String),
    Frame(String),
    AlreadyActive,
    InvalidTransition(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidConfig(e) => write!(f, "Invalid configuration: {}", e),
            SessionError::MissingElement(id) => write!(f, "No element with id '{}' found", id),
            SessionError::ModelLoad(e) => write!(f, "Failed to load model: {}", e),
            SessionError::CameraUnavailable(e) => write!(f, "Camera unavailable: {}", e),
            SessionError::Frame(e) => write!(f, "Frame failed: {}", e),
            SessionError::AlreadyActive => write!(f, "A session is already active"),
            SessionError::InvalidTransition(e) => write!(f, "Invalid session transition: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<SessionError> for JsValue {
    fn from(err: SessionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Readable text for a thrown JS value
pub fn describe_js(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_messages_keep_detail() {
        let err = SessionError::CameraUnavailable("NotAllowedError".into());
        assert_eq!(err.to_string(), "Camera unavailable: NotAllowedError");
        let err = SessionError::ModelLoad("404 model.json".into());
        assert_eq!(err.to_string(), "Failed to load model: 404 model.json");
    }

    #[test]
    fn test_missing_element_names_id() {
        let err = SessionError::MissingElement("label-container");
        assert_eq!(err.to_string(), "No element with id 'label-container' found");
    }
}
