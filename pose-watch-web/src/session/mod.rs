//! Session module - lifecycle, frame loop and page wiring
//!
//! Re-exports only. All logic in submodules.

mod cancel;
mod controller;
mod outcome;
mod phase;
mod render_loop;
mod stats;

pub use cancel::CancelToken;
pub use controller::PageController;
pub use outcome::{
    assess_frame, camera_step, next_step, settle_load, CameraStep, FrameAssessment, LoadOutcome,
    LoopStep,
};
pub use phase::{Phase, PhaseEvent, TransitionError};
pub use render_loop::{FrameLoop, Session};
pub use stats::FrameStats;
