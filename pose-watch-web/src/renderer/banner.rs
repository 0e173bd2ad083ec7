//! Text and color for the per-class labels and the activity banner

use crate::classifier::{to_fixed_hundredths, ActivityVerdict, ClassPrediction};

mod colors {
    pub const ALERT: &str = "red";
    pub const NEUTRAL: &str = "white";
}

pub const NORMAL_TEXT: &str = "Normal activity";

/// What the `output` element shows for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub html: String,
    pub color: &'static str,
}

impl Banner {
    pub fn normal() -> Self {
        Self {
            html: NORMAL_TEXT.to_string(),
            color: colors::NEUTRAL,
        }
    }

    pub fn from_verdict(verdict: &ActivityVerdict) -> Self {
        if !verdict.is_suspicious() {
            return Self::normal();
        }

        let mut lines = vec![
            "Suspicious Activity Detected!".to_string(),
            "Most Likely Classes:".to_string(),
        ];
        lines.extend(verdict.suspicious.iter().map(|entry| {
            format!(
                "{} ({}%)",
                escape_html(&entry.class_name),
                to_fixed_hundredths(entry.probability * 100.0)
            )
        }));

        Self {
            html: lines.join("<br>"),
            color: colors::ALERT,
        }
    }

    pub fn is_alert(&self) -> bool {
        self.color == colors::ALERT
    }
}

/// `"walking: 0.25"` for the `class{i}` element
pub fn label_text(prediction: &ClassPrediction) -> String {
    format!(
        "{}: {}",
        escape_html(&prediction.class_name),
        to_fixed_hundredths(prediction.probability)
    )
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
