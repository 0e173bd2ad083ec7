//! Audio alert played on suspicious frames

use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlAudioElement;

use crate::error::describe_js;

pub struct AlertSound {
    url: Option<String>,
}

impl AlertSound {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }

    /// Start a fresh playback. Not debounced: every call overlaps the last.
    pub fn play(&self) -> Result<(), String> {
        let url = match &self.url {
            Some(u) => u,
            None => return Ok(()),
        };
        let audio = HtmlAudioElement::new_with_src(url).map_err(|e| describe_js(&e))?;
        let playback = audio.play().map_err(|e| describe_js(&e))?;

        // Autoplay blocking rejects the promise; report it instead of leaving it unhandled
        spawn_local(async move {
            if let Err(e) = JsFuture::from(playback).await {
                console_warn!("Alert sound blocked: {}", describe_js(&e));
            }
        });
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}
