//! Frame statistics for the status line and periodic console report

/// Iterations between console reports
pub const REPORT_EVERY: u64 = 300;

#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    pub iterations: u64,
    pub predicted: u64,
    pub suspicious: u64,
    pub failed: u64,
    /// Frames whose classification output was rejected
    pub invalid: u64,
    pub visible_keypoints: usize,
    fps: f64,
    frame_time_ms: f64,
    last_timestamp: Option<f64>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an iteration at animation-frame time `timestamp_ms`
    pub fn record_tick(&mut self, timestamp_ms: f64) {
        self.iterations += 1;

        if let Some(last) = self.last_timestamp {
            let frame_time_ms = timestamp_ms - last;
            // Ignore backgrounded tabs and clock hiccups
            if (1.0..=200.0).contains(&frame_time_ms) {
                // Exponential moving average for smooth display
                self.frame_time_ms = self.frame_time_ms * 0.9 + frame_time_ms * 0.1;
                self.fps = self.fps * 0.9 + (1000.0 / frame_time_ms) * 0.1;
            }
        }
        self.last_timestamp = Some(timestamp_ms);
    }

    pub fn record_prediction(&mut self, suspicious: bool, visible_keypoints: usize) {
        self.predicted += 1;
        if suspicious {
            self.suspicious += 1;
        }
        self.visible_keypoints = visible_keypoints;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn record_invalid(&mut self) {
        self.invalid += 1;
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time_ms
    }

    pub fn should_report(&self) -> bool {
        self.iterations > 0 && self.iterations % REPORT_EVERY == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "FPS: {:.0} | Frame: {:.1}ms | predicted {} | suspicious {} | failed {} | invalid {} | keypoints {}",
            self.fps,
            self.frame_time_ms,
            self.predicted,
            self.suspicious,
            self.failed,
            self.invalid,
            self.visible_keypoints,
        )
    }
}
