use serde::{Deserialize, Serialize};

/// High-heart-rate notification handed to the alert sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighRateAlert {
    pub bpm: u32,
    pub reason: String,
}

/// Stateless threshold policy over the current BPM estimate.
///
/// Every estimate that strictly exceeds the threshold re-emits; the
/// surrounding consumer decides how or whether to rate-limit notifications.
#[derive(Debug, Clone, Copy)]
pub struct AlertPolicy {
    threshold_bpm: u32,
}

impl AlertPolicy {
    pub fn new(threshold_bpm: u32) -> Self {
        Self { threshold_bpm }
    }

    pub fn evaluate(&self, bpm: u32) -> Option<HighRateAlert> {
        if bpm > self.threshold_bpm {
            Some(HighRateAlert {
                bpm,
                reason: format!("High heart rate: {} BPM", bpm),
            })
        } else {
            None
        }
    }
}
