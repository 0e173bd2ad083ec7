//! Canvas output - camera frame first, then the pose on top

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wasm_bindgen::JsCast;

use crate::bridge::{draw_pose, PoseEstimate};
use crate::error::{describe_js, SessionError};
use super::page::ids;

pub struct Overlay {
    ctx: CanvasRenderingContext2d,
    min_part_confidence: f64,
}

impl Overlay {
    pub fn attach(canvas: &HtmlCanvasElement, min_part_confidence: f64) -> Result<Self, SessionError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(SessionError::MissingElement(ids::CANVAS))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SessionError::MissingElement(ids::CANVAS))?;

        Ok(Self { ctx, min_part_confidence })
    }

    /// Draw the frame and, when a pose was found, its keypoints and skeleton
    pub fn draw(&self, frame: Option<&HtmlCanvasElement>, estimate: &PoseEstimate) -> Result<(), String> {
        let frame = match frame {
            Some(f) => f,
            None => return Ok(()),
        };

        self.ctx
            .draw_image_with_html_canvas_element(frame, 0.0, 0.0)
            .map_err(|e| describe_js(&e))?;

        if estimate.pose.is_some() {
            draw_pose(&estimate.raw_keypoints, self.min_part_confidence, &self.ctx)?;
        }
        Ok(())
    }
}
