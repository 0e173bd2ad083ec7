//! Page controller - wires the start/stop buttons to the session lifecycle

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::renderer::PageView;
use super::cancel::CancelToken;
use super::outcome::{settle_load, LoadOutcome};
use super::phase::{Phase, PhaseEvent};
use super::render_loop::{FrameLoop, Session};

struct ControllerState {
    config: SessionConfig,
    page: Rc<RefCell<PageView>>,
    phase: Cell<Phase>,
    predicting: Rc<Cell<bool>>,
    /// Token of the latest start attempt
    cancel: RefCell<CancelToken>,
    running: RefCell<Option<FrameLoop>>,
    listeners: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl ControllerState {
    fn transition(&self, event: PhaseEvent) -> Result<Phase, SessionError> {
        let from = self.phase.get();
        let to = from.apply(event).map_err(|e| {
            if from.is_active() && event == PhaseEvent::Start {
                SessionError::AlreadyActive
            } else {
                SessionError::InvalidTransition(e.to_string())
            }
        })?;
        if to != from {
            console_log!("Session {} -> {}", from.as_str(), to.as_str());
        }
        self.phase.set(to);
        Ok(to)
    }

    async fn start(self: Rc<Self>) -> Result<(), SessionError> {
        self.transition(PhaseEvent::Start)?;

        let cancel = CancelToken::new();
        *self.cancel.borrow_mut() = cancel.clone();
        self.predicting.set(true);

        let opened = Session::open(
            self.config.clone(),
            self.page.clone(),
            self.predicting.clone(),
            cancel.clone(),
        )
        .await;

        let session = match settle_load(opened, cancel.is_cancelled()) {
            LoadOutcome::Ready(session) => Rc::new(session),
            LoadOutcome::Cancelled(opened) => {
                if let Some(session) = opened {
                    session.release();
                }
                console_log!("Stopped before the camera was ready");
                return Ok(());
            }
            LoadOutcome::IgnoredAfterStop(e) => {
                console_log!("Ignoring error after stop: {}", e);
                return Ok(());
            }
            LoadOutcome::Failed(e) => return Err(self.fail(e)),
        };

        match FrameLoop::start(session.clone()) {
            Ok(frame_loop) => {
                *self.running.borrow_mut() = Some(frame_loop);
                self.transition(PhaseEvent::Ready)?;
                Ok(())
            }
            Err(e) => {
                session.release();
                Err(self.fail(e))
            }
        }
    }

    fn fail(&self, err: SessionError) -> SessionError {
        console_error!("{}", err);
        if self.transition(PhaseEvent::Fail).is_ok() {
            self.page.borrow().show_failure(&err);
        }
        err
    }

    fn stop(&self) {
        let from = self.phase.get();
        if !from.is_active() {
            return;
        }
        // Stop is accepted from every active phase
        let _ = self.transition(PhaseEvent::Stop);

        self.cancel.borrow().cancel();
        self.predicting.set(false);
        if let Some(frame_loop) = self.running.borrow_mut().take() {
            frame_loop.stop();
        }

        let mut page = self.page.borrow_mut();
        page.clear_labels();
        page.clear_banner();
        page.clear_status();
        page.show_idle_controls();
    }
}

/// JS handle for one page. `mount` wires the buttons; `start` and `stop`
/// can also be called directly.
#[wasm_bindgen]
pub struct PageController {
    state: Rc<ControllerState>,
}

#[wasm_bindgen]
impl PageController {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PageController, JsValue> {
        let config = SessionConfig::from_js(config)?;
        let page = PageView::locate()?;
        page.show_idle_controls();

        Ok(PageController {
            state: Rc::new(ControllerState {
                config,
                page: Rc::new(RefCell::new(page)),
                phase: Cell::new(Phase::Idle),
                predicting: Rc::new(Cell::new(false)),
                cancel: RefCell::new(CancelToken::new()),
                running: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
            }),
        })
    }

    /// Create a controller and attach it to the page's start/stop buttons
    pub fn mount(config: JsValue) -> Result<PageController, JsValue> {
        let controller = PageController::new(config)?;
        controller.attach_buttons()?;
        Ok(controller)
    }

    #[wasm_bindgen(js_name = attachButtons)]
    pub fn attach_buttons(&self) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.state);
        let on_start = Closure::<dyn FnMut()>::new(move || start_detached(&weak));

        let weak = Rc::downgrade(&self.state);
        let on_stop = Closure::<dyn FnMut()>::new(move || {
            if let Some(state) = weak.upgrade() {
                state.stop();
            }
        });

        {
            let page = self.state.page.borrow();
            page.start_button()
                .add_event_listener_with_callback("click", on_start.as_ref().unchecked_ref())?;
            page.stop_button()
                .add_event_listener_with_callback("click", on_stop.as_ref().unchecked_ref())?;
        }

        let mut listeners = self.state.listeners.borrow_mut();
        listeners.push(on_start);
        listeners.push(on_stop);
        Ok(())
    }

    /// Resolves once the loop runs (or the start was cancelled)
    pub fn start(&self) -> Promise {
        let state = self.state.clone();
        future_to_promise(async move {
            state.start().await.map_err(JsValue::from)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn stop(&self) {
        self.state.stop();
    }

    /// Pause or resume prediction while keeping the camera running
    #[wasm_bindgen(js_name = setPredicting)]
    pub fn set_predicting(&self, predicting: bool) {
        self.state.predicting.set(predicting);
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.state.phase.get().as_str().to_string()
    }

    #[wasm_bindgen(js_name = statsText)]
    pub fn stats_text(&self) -> String {
        match self.state.running.borrow().as_ref() {
            Some(frame_loop) => frame_loop.session().stats_summary(),
            None => "No active session".to_string(),
        }
    }
}

fn start_detached(weak: &Weak<ControllerState>) {
    if let Some(state) = weak.upgrade() {
        spawn_local(async move {
            if let Err(SessionError::AlreadyActive) = state.start().await {
                console_warn!("{}", SessionError::AlreadyActive);
            }
        });
    }
}
