use std::collections::VecDeque;

use crate::domain::dt_sec;

/// Sliding-window beats-per-minute estimator.
///
/// Maintains the timestamps of accepted peaks within a trailing window
/// (default 60 s) and recomputes BPM on every insert. This is a
/// continuously-evicting window, not a fixed-epoch counter: estimates update
/// with low latency but are noisier while the peak count is small.
#[derive(Debug, Clone)]
pub struct RateEstimator {
    window_us: u64,
    peaks: VecDeque<i64>,
    bpm: Option<f32>,
}

impl RateEstimator {
    pub fn new(window_sec: f32) -> Self {
        Self {
            window_us: (window_sec.max(0.0) * 1_000_000.0) as u64,
            peaks: VecDeque::new(),
            bpm: None,
        }
    }

    /// Record an accepted peak. Evicts queued timestamps older than
    /// `ts_us - window`, then recomputes BPM when at least two remain;
    /// otherwise the prior estimate is retained and `None` is returned.
    pub fn on_peak(&mut self, ts_us: i64) -> Option<u32> {
        self.peaks.push_back(ts_us);

        let cutoff = ts_us - self.window_us as i64;
        while matches!(self.peaks.front(), Some(&front) if front < cutoff) {
            self.peaks.pop_front();
        }

        if self.peaks.len() < 2 {
            return None;
        }

        // Degenerate spans (all peaks within the last second) are floored to
        // one second rather than dividing by ~0.
        let oldest = self.peaks.front().copied().unwrap_or(ts_us);
        let span_sec = dt_sec(ts_us, oldest).max(1.0);
        let bpm = self.peaks.len() as f32 * 60.0 / span_sec;
        self.bpm = Some(bpm);
        Some(bpm as u32)
    }

    /// Current estimate, truncated for display. `None` until two peaks have
    /// ever shared a window.
    pub fn bpm(&self) -> Option<u32> {
        self.bpm.map(|b| b as u32)
    }

    /// Number of peaks currently inside the window.
    pub fn peak_count(&self) -> usize {
        self.peaks.len()
    }

    pub fn reset(&mut self) {
        self.peaks.clear();
        self.bpm = None;
    }
}
