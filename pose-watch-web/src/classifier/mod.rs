//! Classifier module - suspicious activity decision
//!
//! Pose estimation and per-class scoring run in the JS pose library.
//! Rust owns the rule that turns scores into a verdict.

mod activity;
mod prediction;

pub use activity::{
    ActivityClassifier, ActivityVerdict, ClassifyError, SuspiciousEntry,
    PROBABILITY_THRESHOLD, SUSPICIOUS_FROM_INDEX,
};
pub use prediction::{round_to_hundredths, to_fixed_hundredths, ClassPrediction};
