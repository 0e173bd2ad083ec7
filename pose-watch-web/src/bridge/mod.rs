//! Bridge module - JS ↔ Rust communication
//! 
//! Bindings to the pose library and the data it hands back.
//! Re-exports only in mod.rs, logic in submodules.

mod pose;
mod tm_pose;

pub use pose::{Keypoint, Pose};
pub use tm_pose::{draw_pose, PoseEstimate, PoseModel, Webcam};
