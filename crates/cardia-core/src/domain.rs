use serde::{Deserialize, Serialize};

/// Compute a time delta with saturating subtraction to prevent wraparound.
/// If clocks go backwards (now < last), returns 0 instead of wrapping to a
/// huge value.
#[inline]
pub fn dt_us(now_us: i64, last_us: i64) -> u64 {
    if now_us >= last_us {
        (now_us - last_us) as u64
    } else {
        0
    }
}

/// Time delta in seconds. Convenience wrapper around [`dt_us`] for
/// floating-point calculations.
#[inline]
pub fn dt_sec(now_us: i64, last_us: i64) -> f32 {
    (dt_us(now_us, last_us) as f32) / 1_000_000.0
}

/// A single ADC reading from the transport.
///
/// Samples are ordered by arrival; duplicate values and timestamps are
/// permitted. The transport stamps `ts_us` at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Arrival timestamp in microseconds since epoch.
    pub ts_us: i64,
    /// Raw integer reading (e.g. 0-1023 from a 10-bit ADC).
    pub value: i32,
}

impl Sample {
    pub fn new(ts_us: i64, value: i32) -> Self {
        Self { ts_us, value }
    }
}

/// Monitor lifecycle status. Transitions are driven by the external sample
/// source's connect/disconnect notifications, not by the estimator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorStatus {
    /// No source has ever been attached.
    Idle,
    /// Source attached, no samples seen yet.
    Connected,
    /// Samples are flowing.
    Streaming,
    /// Source went away; estimator state is retained for a clean resume.
    Disconnected,
}

/// Priority classification for monitor events.
/// Critical events must never be dropped silently; high-frequency telemetry
/// can be coalesced or skipped by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPriority {
    /// Lifecycle transitions and alerts.
    Critical,
    /// Per-peak telemetry.
    HighFreq,
}

/// Events produced by the monitor as samples are ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MonitorEvent {
    SourceConnected {},
    SourceDisconnected {},
    /// A sample was classified as a heartbeat peak.
    PeakAccepted { ts_us: i64 },
    /// The BPM estimate was recomputed.
    BpmUpdated { bpm: u32 },
    /// The estimate exceeded the alert threshold.
    HighHeartRate { bpm: u32, reason: String },
}

impl MonitorEvent {
    pub fn priority(&self) -> EventPriority {
        match self {
            MonitorEvent::SourceConnected {} => EventPriority::Critical,
            MonitorEvent::SourceDisconnected {} => EventPriority::Critical,
            MonitorEvent::HighHeartRate { .. } => EventPriority::Critical,

            MonitorEvent::PeakAccepted { .. } => EventPriority::HighFreq,
            MonitorEvent::BpmUpdated { .. } => EventPriority::HighFreq,
        }
    }
}
