//! Frame clock turning `draw_web()` timestamps into elapsed-seconds slices.
//!
//! The engine integrates each slice on its own, so long gaps (a
//! backgrounded tab) are passed through whole instead of being clamped.

pub struct FrameClock {
    /// 前フレームのタイムスタンプ (ms)。最初のフレームまでは None
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the seconds elapsed since the previous frame.
    ///
    /// The first frame only sets the reference and returns 0. A timestamp
    /// that goes backwards also yields 0 and becomes the new reference.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta_ms = match self.last_timestamp {
            Some(prev) if now_ms.is_finite() => (now_ms - prev).max(0.0),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_timestamp = Some(now_ms);
        }

        delta_ms / 1000.0
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
