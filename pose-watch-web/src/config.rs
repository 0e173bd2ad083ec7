//! Session configuration passed from JS as a plain object

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::classifier::{PROBABILITY_THRESHOLD, SUSPICIOUS_FROM_INDEX};
use crate::error::SessionError;

/// Model exported from the pose training tool
pub const DEFAULT_MODEL_BASE_URL: &str = "https://teachablemachine.withgoogle.com/models/jLeJTw1rQ/";

pub const DEFAULT_ALERT_SOUND_URL: &str =
    "https://media.geeksforgeeks.org/wp-content/uploads/20190531135120/beep.mp3";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub model_base_url: String,
    pub width: u32,
    pub height: u32,
    /// Mirror the camera image
    pub flip: bool,
    pub suspicious_from_index: usize,
    pub probability_threshold: f64,
    pub min_part_confidence: f64,
    /// `None` disables the audio alert
    pub alert_sound_url: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model_base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            width: 300,
            height: 300,
            flip: true,
            suspicious_from_index: SUSPICIOUS_FROM_INDEX,
            probability_threshold: PROBABILITY_THRESHOLD,
            min_part_confidence: 0.5,
            alert_sound_url: Some(DEFAULT_ALERT_SOUND_URL.to_string()),
        }
    }
}

impl SessionConfig {
    /// Read a config object from JS; `undefined` and `null` give the defaults
    pub fn from_js(value: JsValue) -> Result<Self, SessionError> {
        let config: Self = if value.is_undefined() || value.is_null() {
            Self::default()
        } else {
            serde_wasm_bindgen::from_value(value)
                .map_err(|e| SessionError::InvalidConfig(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.model_base_url.trim().is_empty() {
            return Err(SessionError::InvalidConfig("modelBaseUrl is empty".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(SessionError::InvalidConfig(format!(
                "capture size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if !is_unit_interval(self.probability_threshold) {
            return Err(SessionError::InvalidConfig(format!(
                "probabilityThreshold {} is outside [0, 1]",
                self.probability_threshold
            )));
        }
        if !is_unit_interval(self.min_part_confidence) {
            return Err(SessionError::InvalidConfig(format!(
                "minPartConfidence {} is outside [0, 1]",
                self.min_part_confidence
            )));
        }
        Ok(())
    }

    pub fn model_url(&self) -> String {
        self.resolve("model.json")
    }

    pub fn metadata_url(&self) -> String {
        self.resolve("metadata.json")
    }

    fn resolve(&self, file: &str) -> String {
        let base = self.model_base_url.trim();
        if base.ends_with('/') {
            format!("{}{}", base, file)
        } else {
            format!("{}/{}", base, file)
        }
    }
}

fn is_unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.suspicious_from_index, 3);
        assert_eq!(config.probability_threshold, 0.98);
        assert_eq!((config.width, config.height), (300, 300));
        assert!(config.flip);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_model_urls() {
        let config = SessionConfig::default();
        assert_eq!(
            config.model_url(),
            "https://teachablemachine.withgoogle.com/models/jLeJTw1rQ/model.json"
        );

        let config = SessionConfig {
            model_base_url: "http://localhost:8080/model".into(),
            ..SessionConfig::default()
        };
        assert_eq!(config.metadata_url(), "http://localhost:8080/model/metadata.json");
    }

    #[test]
    fn test_partial_object_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"suspiciousFromIndex": 2, "alertSoundUrl": null}"#).unwrap();
        assert_eq!(config.suspicious_from_index, 2);
        assert_eq!(config.alert_sound_url, None);
        assert_eq!(config.model_base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(config.min_part_confidence, 0.5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            SessionConfig { model_base_url: " ".into(), ..SessionConfig::default() },
            SessionConfig { width: 0, ..SessionConfig::default() },
            SessionConfig { probability_threshold: 1.2, ..SessionConfig::default() },
            SessionConfig { min_part_confidence: f64::NAN, ..SessionConfig::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
        }
    }
}
