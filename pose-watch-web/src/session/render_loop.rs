//! Per-frame loop driven by `requestAnimationFrame`
//!
//! Each iteration pulls a camera frame, runs estimation and
//! classification while predicting, updates the page and redraws the
//! overlay. The next frame is requested only after the iteration settles,
//! and always, unless the session was cancelled.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::bridge::{PoseModel, Webcam};
use crate::classifier::ActivityClassifier;
use crate::config::SessionConfig;
use crate::error::{describe_js, SessionError};
use crate::renderer::{AlertSound, Banner, Overlay, PageView};
use super::cancel::CancelToken;
use super::outcome::{assess_frame, camera_step, next_step, CameraStep, LoopStep};
use super::stats::FrameStats;

/// Everything one running session needs; dropped on stop
pub struct Session {
    config: SessionConfig,
    model: PoseModel,
    webcam: Webcam,
    overlay: Overlay,
    classifier: ActivityClassifier,
    alert: AlertSound,
    page: Rc<RefCell<PageView>>,
    predicting: Rc<Cell<bool>>,
    cancel: CancelToken,
    stats: RefCell<FrameStats>,
}

impl Session {
    /// Load the model, open the camera and prepare the page.
    ///
    /// Returns `Ok(None)` when `cancel` fired while loading; the camera is
    /// released in that case.
    pub async fn open(
        config: SessionConfig,
        page: Rc<RefCell<PageView>>,
        predicting: Rc<Cell<bool>>,
        cancel: CancelToken,
    ) -> Result<Option<Session>, SessionError> {
        page.borrow().show_status("Loading Necessary classes...");
        let model = PoseModel::load(&config.model_url(), &config.metadata_url())
            .await
            .map_err(SessionError::ModelLoad)?;
        if cancel.is_cancelled() {
            return Ok(None);
        }

        let total_classes = model.total_classes();
        console_log!("Model loaded with {} classes", total_classes);
        page.borrow().show_running_controls();

        let webcam = Webcam::create(config.width, config.height, config.flip);
        let opened = Self::open_camera(&webcam, &page, &cancel).await;
        if camera_step(&opened, cancel.is_cancelled()) == CameraStep::Release {
            release(&webcam);
            opened?;
            return Ok(None);
        }

        let prepared = Self::prepare_page(&config, &page, total_classes);
        let overlay = match prepared {
            Ok(overlay) => overlay,
            Err(e) => {
                release(&webcam);
                return Err(e);
            }
        };

        let classifier = ActivityClassifier::new(config.suspicious_from_index, config.probability_threshold)
            .with_expected_classes(total_classes);
        let alert = AlertSound::new(config.alert_sound_url.clone());

        Ok(Some(Session {
            config,
            model,
            webcam,
            overlay,
            classifier,
            alert,
            page,
            predicting,
            cancel,
            stats: RefCell::new(FrameStats::new()),
        }))
    }

    async fn open_camera(
        webcam: &Webcam,
        page: &Rc<RefCell<PageView>>,
        cancel: &CancelToken,
    ) -> Result<(), SessionError> {
        page.borrow().show_status("Allow Camera Permission");
        webcam
            .request_access()
            .await
            .map_err(SessionError::CameraUnavailable)?;
        if cancel.is_cancelled() {
            return Ok(());
        }
        webcam.start().await.map_err(SessionError::CameraUnavailable)
    }

    fn prepare_page(
        config: &SessionConfig,
        page: &Rc<RefCell<PageView>>,
        total_classes: usize,
    ) -> Result<Overlay, SessionError> {
        let mut page = page.borrow_mut();
        page.clear_status();
        page.size_canvas(config.width, config.height);
        page.mount_labels(total_classes)?;
        Overlay::attach(page.canvas(), config.min_part_confidence)
    }

    pub fn stats_summary(&self) -> String {
        self.stats.borrow().summary()
    }

    /// One loop iteration: pull a frame, predict while predicting
    async fn iterate(&self, timestamp: f64) -> Result<(), SessionError> {
        self.stats.borrow_mut().record_tick(timestamp);
        self.webcam.next_frame().map_err(SessionError::Frame)?;
        if self.predicting.get() {
            self.predict().await?;
        }
        Ok(())
    }

    /// Log and count a settled iteration; failures only skip the frame
    fn settle(&self, iteration: &Result<(), SessionError>) {
        let mut stats = self.stats.borrow_mut();
        if let Err(e) = iteration {
            console_warn!("Skipping frame: {}", e);
            stats.record_failure();
        }
        if stats.should_report() {
            console_log!("{}", stats.summary());
        }
    }

    async fn predict(&self) -> Result<(), SessionError> {
        let frame = self
            .webcam
            .frame()
            .ok_or_else(|| SessionError::Frame("webcam has no canvas".into()))?;
        let estimate = self.model.estimate(&frame).await.map_err(SessionError::Frame)?;
        let predictions = self
            .model
            .classify(&estimate.posenet_output)
            .await
            .map_err(SessionError::Frame)?;

        // Stopped while awaiting; the page no longer belongs to us
        if self.cancel.is_cancelled() {
            return Ok(());
        }

        let visible = estimate
            .pose
            .as_ref()
            .map(|pose| pose.visible_count(self.config.min_part_confidence))
            .unwrap_or(0);
        let assessment = assess_frame(
            &self.classifier,
            &predictions,
            visible,
            &mut self.stats.borrow_mut(),
        );
        if let Some(e) = &assessment.rejected {
            console_warn!("Treating frame as normal: {}", e);
        }
        let verdict = assessment.verdict;

        {
            let page = self.page.borrow();
            page.update_labels(&predictions);
            page.show_banner(&Banner::from_verdict(&verdict));
        }

        if verdict.is_suspicious() && self.alert.is_enabled() {
            if let Err(e) = self.alert.play() {
                console_warn!("Alert sound failed: {}", e);
            }
        }

        self.overlay
            .draw(Some(&frame), &estimate)
            .map_err(SessionError::Frame)
    }

    pub fn release(&self) {
        release(&self.webcam);
    }
}

fn release(webcam: &Webcam) {
    if let Err(e) = webcam.release() {
        console_warn!("Camera release failed: {}", e);
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Handle to a running loop; `stop` halts it and frees the camera
pub struct FrameLoop {
    session: Rc<Session>,
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(session: Rc<Session>) -> Result<FrameLoop, SessionError> {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let step_session = session.clone();
        let step_callback = callback.clone();
        let step_pending = pending.clone();
        *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            step_pending.set(None);
            let session = step_session.clone();
            let callback = step_callback.clone();
            let pending = step_pending.clone();
            spawn_local(async move {
                if session.cancel.is_cancelled() {
                    return;
                }
                let iteration = session.iterate(timestamp).await;
                session.settle(&iteration);
                if next_step(&iteration, session.cancel.is_cancelled()) == LoopStep::Halt {
                    return;
                }
                if let Err(e) = schedule(&callback, &pending) {
                    console_error!("Frame loop halted: {}", e);
                }
            });
        }));

        schedule(&callback, &pending).map_err(SessionError::Frame)?;
        console_log!("Frame loop started");

        Ok(FrameLoop { session, callback, pending })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Cancel, drop the pending frame request, release the camera
    pub fn stop(self) {
        self.session.cancel.cancel();
        if let Some(id) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        // Breaks the closure's reference to itself
        self.callback.borrow_mut().take();
        self.session.release();
        console_log!("Frame loop stopped: {}", self.session.stats_summary());
    }
}

fn schedule(callback: &FrameCallback, pending: &Cell<Option<i32>>) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    if let Some(closure) = callback.borrow().as_ref() {
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|e| describe_js(&e))?;
        pending.set(Some(id));
    }
    Ok(())
}
