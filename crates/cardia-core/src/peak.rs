use crate::buffer::SampleBuffer;
use crate::domain::{dt_us, Sample};

/// Stateful adaptive-threshold peak classifier.
///
/// A sample is an accepted peak when its value exceeds
/// `mean + threshold_sigma * std_dev` of the buffered window (candidate
/// included) and the refractory period since the last accepted peak has
/// elapsed. Recomputing the statistics over the bounded trailing window
/// keeps the threshold adaptive to baseline drift of analog pulse sensors.
#[derive(Debug, Clone)]
pub struct PeakDetector {
    min_samples: usize,
    threshold_sigma: f32,
    refractory_us: u64,
    last_peak_us: Option<i64>,
}

impl PeakDetector {
    pub fn new(min_samples: usize, threshold_sigma: f32, refractory_sec: f32) -> Self {
        Self {
            min_samples,
            threshold_sigma,
            refractory_us: (refractory_sec.max(0.0) * 1_000_000.0) as u64,
            last_peak_us: None,
        }
    }

    /// Classify `sample`, which must already have been pushed into `window`.
    /// Returns true when it is accepted as a peak. A negative classification
    /// is a normal result, not an error.
    pub fn evaluate(&mut self, window: &SampleBuffer, sample: Sample) -> bool {
        if window.len() < self.min_samples {
            return false;
        }

        let (mean, std_dev) = Self::window_stats(window);
        let threshold = mean + self.threshold_sigma as f64 * std_dev;
        if (sample.value as f64) <= threshold {
            return false;
        }

        // Refractory gate: a single beat's rising edge must not count twice.
        if let Some(last) = self.last_peak_us {
            if dt_us(sample.ts_us, last) <= self.refractory_us {
                return false;
            }
        }

        self.last_peak_us = Some(sample.ts_us);
        true
    }

    /// Timestamp of the last accepted peak, if any.
    pub fn last_peak_us(&self) -> Option<i64> {
        self.last_peak_us
    }

    pub fn reset(&mut self) {
        self.last_peak_us = None;
    }

    // Population mean/std-dev in f64, two-pass so a constant signal yields
    // exactly zero variance regardless of magnitude.
    fn window_stats(window: &SampleBuffer) -> (f64, f64) {
        let n = window.len() as f64;
        let mean = window.iter().map(|s| s.value as f64).sum::<f64>() / n;
        let var = window
            .iter()
            .map(|s| {
                let d = s.value as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        (mean, var.max(0.0).sqrt())
    }
}
