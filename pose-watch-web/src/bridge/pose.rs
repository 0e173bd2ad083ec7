//! Pose keypoints as reported by the pose library
//!
//! The library shape is `{ part, score, position: { x, y } }` per keypoint,
//! flattened here into `Keypoint`.

use serde::Deserialize;

/// One tracked body part in canvas pixels
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawKeypoint")]
pub struct Keypoint {
    pub part: String,
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

impl Keypoint {
    pub fn is_visible(&self, min_confidence: f64) -> bool {
        self.confidence >= min_confidence
    }
}

#[derive(Deserialize)]
struct RawKeypoint {
    #[serde(default)]
    part: String,
    score: f64,
    position: Position,
}

#[derive(Deserialize)]
struct Position {
    x: f64,
    y: f64,
}

impl From<RawKeypoint> for Keypoint {
    fn from(raw: RawKeypoint) -> Self {
        Self {
            part: raw.part,
            x: raw.position.x,
            y: raw.position.y,
            confidence: raw.score,
        }
    }
}

/// Pose for one frame; transient, redrawn every frame
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    /// Number of keypoints confident enough to be drawn
    pub fn visible_count(&self, min_confidence: f64) -> usize {
        self.keypoints
            .iter()
            .filter(|k| k.is_visible(min_confidence))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_library_pose() {
        let json = r#"{
            "score": 0.8,
            "keypoints": [
                {"part": "nose", "score": 0.95, "position": {"x": 150.0, "y": 80.5}},
                {"part": "leftWrist", "score": 0.2, "position": {"x": 40.0, "y": 210.0}}
            ]
        }"#;
        let pose: Pose = serde_json::from_str(json).unwrap();
        assert_eq!(pose.keypoints.len(), 2);
        assert_eq!(
            pose.keypoints[0],
            Keypoint { part: "nose".into(), x: 150.0, y: 80.5, confidence: 0.95 }
        );
        assert_eq!(pose.visible_count(0.5), 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let kp = Keypoint { part: "leftHip".into(), x: 0.0, y: 0.0, confidence: 0.5 };
        assert!(kp.is_visible(0.5));
        assert!(!kp.is_visible(0.51));
    }
}
