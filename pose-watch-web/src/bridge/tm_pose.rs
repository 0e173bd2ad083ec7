//! Bindings to the `tmPose` pose library loaded by the page
//!
//! Model loading, pose estimation, per-class scoring, webcam capture and
//! the keypoint/skeleton drawing helpers all live on the JS side. Promise
//! returning calls are awaited through `JsFuture`.

use js_sys::{Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::classifier::ClassPrediction;
use crate::error::describe_js;
use super::pose::Pose;

#[wasm_bindgen]
extern "C" {
    /// `tmPose.CustomPoseNet` returned by `tmPose.load`
    pub type PoseModel;

    #[wasm_bindgen(catch, js_namespace = tmPose, js_name = load)]
    fn load_model(model_url: &str, metadata_url: &str) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, js_name = getTotalClasses)]
    fn get_total_classes(this: &PoseModel) -> u32;

    #[wasm_bindgen(method, catch, js_name = estimatePose)]
    fn estimate_pose(this: &PoseModel, input: &HtmlCanvasElement) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = predict)]
    fn predict(this: &PoseModel, posenet_output: &JsValue) -> Result<Promise, JsValue>;

    /// `tmPose.Webcam`
    #[wasm_bindgen(js_namespace = tmPose)]
    pub type Webcam;

    #[wasm_bindgen(constructor, js_namespace = tmPose)]
    fn new(width: u32, height: u32, flip: bool) -> Webcam;

    #[wasm_bindgen(method, catch)]
    fn setup(this: &Webcam) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn play(this: &Webcam) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn update(this: &Webcam) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn stop(this: &Webcam) -> Result<(), JsValue>;

    #[wasm_bindgen(method, getter)]
    fn canvas(this: &Webcam) -> Option<HtmlCanvasElement>;

    #[wasm_bindgen(catch, js_namespace = tmPose, js_name = drawKeypoints)]
    fn draw_keypoints(
        keypoints: &JsValue,
        min_confidence: f64,
        ctx: &CanvasRenderingContext2d,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = tmPose, js_name = drawSkeleton)]
    fn draw_skeleton(
        keypoints: &JsValue,
        min_confidence: f64,
        ctx: &CanvasRenderingContext2d,
    ) -> Result<(), JsValue>;
}

/// Estimated pose plus the raw values the library needs back
pub struct PoseEstimate {
    /// Parsed pose, `None` when nobody is in frame
    pub pose: Option<Pose>,
    /// `pose.keypoints` as the library returned them, for drawing
    pub raw_keypoints: JsValue,
    /// Intermediate posenet output fed to `predict`
    pub posenet_output: JsValue,
}

impl PoseModel {
    /// Load model topology, weights and class metadata
    pub async fn load(model_url: &str, metadata_url: &str) -> Result<PoseModel, String> {
        let promise = load_model(model_url, metadata_url).map_err(|e| describe_js(&e))?;
        let model = JsFuture::from(promise).await.map_err(|e| describe_js(&e))?;
        Ok(model.unchecked_into())
    }

    pub fn total_classes(&self) -> usize {
        self.get_total_classes() as usize
    }

    pub async fn estimate(&self, frame: &HtmlCanvasElement) -> Result<PoseEstimate, String> {
        let promise = self.estimate_pose(frame).map_err(|e| describe_js(&e))?;
        let output = JsFuture::from(promise).await.map_err(|e| describe_js(&e))?;

        let pose_value = get(&output, "pose")?;
        let posenet_output = get(&output, "posenetOutput")?;

        let (pose, raw_keypoints) = if pose_value.is_undefined() || pose_value.is_null() {
            (None, JsValue::UNDEFINED)
        } else {
            let pose: Pose = serde_wasm_bindgen::from_value(pose_value.clone())
                .map_err(|e| format!("unreadable pose: {}", e))?;
            (Some(pose), get(&pose_value, "keypoints")?)
        };

        Ok(PoseEstimate { pose, raw_keypoints, posenet_output })
    }

    pub async fn classify(&self, posenet_output: &JsValue) -> Result<Vec<ClassPrediction>, String> {
        let promise = self.predict(posenet_output).map_err(|e| describe_js(&e))?;
        let value = JsFuture::from(promise).await.map_err(|e| describe_js(&e))?;
        serde_wasm_bindgen::from_value(value).map_err(|e| format!("unreadable prediction: {}", e))
    }
}

impl Webcam {
    pub fn create(width: u32, height: u32, flip: bool) -> Webcam {
        Webcam::new(width, height, flip)
    }

    /// Ask for camera permission and open the device
    pub async fn request_access(&self) -> Result<(), String> {
        let promise = self.setup().map_err(|e| describe_js(&e))?;
        JsFuture::from(promise).await.map_err(|e| describe_js(&e))?;
        Ok(())
    }

    pub async fn start(&self) -> Result<(), String> {
        let promise = self.play().map_err(|e| describe_js(&e))?;
        JsFuture::from(promise).await.map_err(|e| describe_js(&e))?;
        Ok(())
    }

    /// Pull the latest camera frame onto the webcam canvas
    pub fn next_frame(&self) -> Result<(), String> {
        self.update().map_err(|e| describe_js(&e))
    }

    /// Stop capture and release the device tracks
    pub fn release(&self) -> Result<(), String> {
        self.stop().map_err(|e| describe_js(&e))
    }

    pub fn frame(&self) -> Option<HtmlCanvasElement> {
        self.canvas()
    }
}

/// Draw keypoints then skeleton lines with the library helpers
pub fn draw_pose(
    raw_keypoints: &JsValue,
    min_confidence: f64,
    ctx: &CanvasRenderingContext2d,
) -> Result<(), String> {
    draw_keypoints(raw_keypoints, min_confidence, ctx).map_err(|e| describe_js(&e))?;
    draw_skeleton(raw_keypoints, min_confidence, ctx).map_err(|e| describe_js(&e))
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, String> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(|e| describe_js(&e))
}
