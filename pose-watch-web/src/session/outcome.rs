//! Decisions made by the frame loop and the controller
//!
//! Kept free of browser calls so the loop and lifecycle rules can be
//! checked on the host. Callers do the logging and the DOM work.

use crate::classifier::{ActivityClassifier, ActivityVerdict, ClassPrediction, ClassifyError};
use crate::error::SessionError;
use super::stats::FrameStats;

/// What happens after an iteration settles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopStep {
    Reschedule,
    Halt,
}

/// Only cancellation ends the loop; a failed iteration still re-arms it
pub fn next_step(_iteration: &Result<(), SessionError>, cancelled: bool) -> LoopStep {
    if cancelled {
        LoopStep::Halt
    } else {
        LoopStep::Reschedule
    }
}

/// Whether a freshly opened camera is handed to the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraStep {
    Keep,
    Release,
}

pub fn camera_step(opened: &Result<(), SessionError>, cancelled: bool) -> CameraStep {
    if opened.is_ok() && !cancelled {
        CameraStep::Keep
    } else {
        CameraStep::Release
    }
}

/// Verdict for one frame plus the reason it was forced to normal, if any
#[derive(Clone, Debug, PartialEq)]
pub struct FrameAssessment {
    pub verdict: ActivityVerdict,
    pub rejected: Option<ClassifyError>,
}

/// Classify one frame and count it. Rejected output renders as normal.
pub fn assess_frame(
    classifier: &ActivityClassifier,
    predictions: &[ClassPrediction],
    visible_keypoints: usize,
    stats: &mut FrameStats,
) -> FrameAssessment {
    let (verdict, rejected) = match classifier.classify(predictions) {
        Ok(verdict) => (verdict, None),
        Err(e) => {
            stats.record_invalid();
            (ActivityVerdict::default(), Some(e))
        }
    };
    stats.record_prediction(verdict.is_suspicious(), visible_keypoints);
    FrameAssessment { verdict, rejected }
}

/// How a start attempt ends once loading returns
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Ready(T),
    /// Stopped while loading; a session that did open must be released
    Cancelled(Option<T>),
    /// Loading failed after a stop; nothing to show
    IgnoredAfterStop(SessionError),
    Failed(SessionError),
}

pub fn settle_load<T>(opened: Result<Option<T>, SessionError>, cancelled: bool) -> LoadOutcome<T> {
    match (opened, cancelled) {
        (Ok(Some(session)), false) => LoadOutcome::Ready(session),
        (Ok(session), _) => LoadOutcome::Cancelled(session),
        (Err(e), true) => LoadOutcome::IgnoredAfterStop(e),
        (Err(e), false) => LoadOutcome::Failed(e),
    }
}
