//! Renderer module - page text, canvas overlay and audio alert
//! 
//! Re-exports only. All logic in submodules.

mod alert;
mod banner;
mod overlay;
mod page;

pub use alert::AlertSound;
pub use banner::{label_text, Banner, NORMAL_TEXT};
pub use overlay::Overlay;
pub use page::{class_label_id, ids, status_html, PageView};
