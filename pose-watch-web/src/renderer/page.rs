//! DOM elements of the page, looked up once by id

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

use crate::classifier::ClassPrediction;
use crate::error::SessionError;
use super::banner::{escape_html, label_text, Banner};

pub mod ids {
    pub const LOADING: &str = "loading";
    pub const START: &str = "start";
    pub const STOP: &str = "stop";
    pub const TITLE: &str = "title";
    pub const CANVAS: &str = "canvas";
    pub const LABEL_CONTAINER: &str = "label-container";
    pub const OUTPUT: &str = "output";
}

/// Id of the label element for class `index`
pub fn class_label_id(index: usize) -> String {
    format!("class{}", index)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Control {
    Start,
    Stop,
    Title,
}

/// One inline style edit; `None` removes the property
#[derive(Clone, Copy, Debug)]
struct StyleChange {
    target: Control,
    property: &'static str,
    value: Option<&'static str>,
}

const RUNNING_LAYOUT: &[StyleChange] = &[
    StyleChange { target: Control::Start, property: "display", value: Some("none") },
    StyleChange { target: Control::Stop, property: "display", value: Some("inline-block") },
    StyleChange { target: Control::Title, property: "margin-top", value: Some("10vh") },
];

const IDLE_LAYOUT: &[StyleChange] = &[
    StyleChange { target: Control::Start, property: "display", value: Some("inline-block") },
    StyleChange { target: Control::Stop, property: "display", value: Some("none") },
    StyleChange { target: Control::Title, property: "margin-top", value: None },
];

/// Status area markup; `message` is shown as text
pub fn status_html(message: &str) -> String {
    format!("<center>{}</center>", escape_html(message))
}

/// Handles to every element the session writes to
pub struct PageView {
    document: Document,
    loading: HtmlElement,
    start: HtmlElement,
    stop: HtmlElement,
    title: HtmlElement,
    canvas: HtmlCanvasElement,
    label_container: HtmlElement,
    output: HtmlElement,
    labels: Vec<HtmlElement>,
}

impl PageView {
    pub fn locate() -> Result<Self, SessionError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(SessionError::MissingElement("document"))?;

        Ok(Self {
            loading: element(&document, ids::LOADING)?,
            start: element(&document, ids::START)?,
            stop: element(&document, ids::STOP)?,
            title: element(&document, ids::TITLE)?,
            canvas: element(&document, ids::CANVAS)?,
            label_container: element(&document, ids::LABEL_CONTAINER)?,
            output: element(&document, ids::OUTPUT)?,
            labels: Vec::new(),
            document,
        })
    }

    pub fn start_button(&self) -> &HtmlElement {
        &self.start
    }

    pub fn stop_button(&self) -> &HtmlElement {
        &self.stop
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn show_status(&self, message: &str) {
        self.loading.set_inner_html(&status_html(message));
    }

    pub fn clear_status(&self) {
        self.loading.set_inner_html("");
    }

    /// Swap start for stop and move the title up for the video
    pub fn show_running_controls(&self) {
        self.apply_layout(RUNNING_LAYOUT);
    }

    pub fn show_idle_controls(&self) {
        self.apply_layout(IDLE_LAYOUT);
    }

    fn apply_layout(&self, layout: &[StyleChange]) {
        for change in layout {
            let element = match change.target {
                Control::Start => &self.start,
                Control::Stop => &self.stop,
                Control::Title => &self.title,
            };
            match change.value {
                Some(value) => set_style(element, change.property, value),
                None => clear_style(element, change.property),
            }
        }
    }

    pub fn size_canvas(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// One `class{i}` div per model class, replacing any previous set
    pub fn mount_labels(&mut self, count: usize) -> Result<(), SessionError> {
        self.clear_labels();
        for i in 0..count {
            let div: HtmlElement = self
                .document
                .create_element("div")
                .map_err(|_| SessionError::MissingElement(ids::LABEL_CONTAINER))?
                .unchecked_into();
            div.set_id(&class_label_id(i));
            self.label_container
                .append_child(&div)
                .map_err(|_| SessionError::MissingElement(ids::LABEL_CONTAINER))?;
            self.labels.push(div);
        }
        Ok(())
    }

    pub fn clear_labels(&mut self) {
        for label in self.labels.drain(..) {
            label.remove();
        }
    }

    pub fn update_labels(&self, predictions: &[ClassPrediction]) {
        for (label, prediction) in self.labels.iter().zip(predictions) {
            label.set_inner_html(&label_text(prediction));
        }
    }

    pub fn show_banner(&self, banner: &Banner) {
        set_style(&self.output, "color", banner.color);
        self.output.set_inner_html(&banner.html);
    }

    pub fn clear_banner(&self) {
        self.output.set_inner_html("");
    }

    pub fn show_failure(&self, err: &SessionError) {
        self.show_status(&err.to_string());
        self.show_idle_controls();
    }
}

fn element<T: JsCast>(document: &Document, id: &'static str) -> Result<T, SessionError> {
    document
        .get_element_by_id(id)
        .ok_or(SessionError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| SessionError::MissingElement(id))
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    // Only fails on read-only declarations
    let _ = element.style().set_property(property, value);
}

fn clear_style(element: &HtmlElement, property: &str) {
    let _ = element.style().remove_property(property);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_label_ids() {
        assert_eq!(class_label_id(0), "class0");
        assert_eq!(class_label_id(7), "class7");
    }

    #[test]
    fn test_idle_layout_undoes_running_layout() {
        for running in RUNNING_LAYOUT {
            let idle = IDLE_LAYOUT
                .iter()
                .find(|c| c.target == running.target && c.property == running.property);
            assert!(idle.is_some(), "{:?} {} not reset on stop", running.target, running.property);
        }
        let title = IDLE_LAYOUT.iter().find(|c| c.target == Control::Title).unwrap();
        assert_eq!(title.value, None);
    }

    #[test]
    fn test_status_html_escapes_error_detail() {
        let err = SessionError::ModelLoad("<html>404</html>".into());
        assert_eq!(
            status_html(&err.to_string()),
            "<center>Failed to load model: &lt;html&gt;404&lt;/html&gt;</center>"
        );
        assert_eq!(status_html("Allow Camera Permission"), "<center>Allow Camera Permission</center>");
    }
}
