use std::sync::Arc;

use parking_lot::Mutex;

use crate::alert::AlertPolicy;
use crate::buffer::SampleBuffer;
use crate::config::MonitorConfig;
use crate::domain::{MonitorEvent, MonitorStatus, Sample};
use crate::peak::PeakDetector;
use crate::rate::RateEstimator;

/// The estimator engine: sample window, peak detection, rate estimation and
/// alerting behind a single `on_sample` entry point.
///
/// The push path is pure computation over the rolling windows: no I/O, no
/// blocking, bounded work per sample. State is entirely derived from the
/// windows, so the monitor resumes cleanly after a transport disconnect.
#[derive(Debug)]
pub struct HeartMonitor {
    config: MonitorConfig,
    status: MonitorStatus,
    buffer: SampleBuffer,
    detector: PeakDetector,
    estimator: RateEstimator,
    policy: AlertPolicy,
}

impl HeartMonitor {
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        let buffer = SampleBuffer::new(config.capacity());
        let detector = PeakDetector::new(
            config.min_samples,
            config.threshold_sigma,
            config.refractory_sec,
        );
        let estimator = RateEstimator::new(config.rate_window_sec);
        let policy = AlertPolicy::new(config.alert_bpm);
        Self {
            config,
            status: MonitorStatus::Idle,
            buffer,
            detector,
            estimator,
            policy,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn status(&self) -> MonitorStatus {
        self.status
    }

    /// The transport attached. Estimator state is kept so a reconnect
    /// continues from the existing windows.
    pub fn on_connected(&mut self) -> MonitorEvent {
        self.status = MonitorStatus::Connected;
        log::info!("sample source connected");
        MonitorEvent::SourceConnected {}
    }

    /// The transport went away. The monitor just stops receiving pushes;
    /// nothing is unwound.
    pub fn on_disconnected(&mut self) -> MonitorEvent {
        self.status = MonitorStatus::Disconnected;
        log::info!("sample source disconnected");
        MonitorEvent::SourceDisconnected {}
    }

    /// Ingest one transport reading stamped at arrival time.
    pub fn on_sample(&mut self, value: i32, ts_us: i64) -> Vec<MonitorEvent> {
        self.push(Sample::new(ts_us, value))
    }

    /// Append a sample and run the classify/estimate/alert pipeline.
    /// Returns the events this sample produced, in order.
    pub fn push(&mut self, sample: Sample) -> Vec<MonitorEvent> {
        self.status = MonitorStatus::Streaming;
        self.buffer.push(sample);

        let mut events = Vec::new();
        if !self.detector.evaluate(&self.buffer, sample) {
            return events;
        }
        events.push(MonitorEvent::PeakAccepted { ts_us: sample.ts_us });

        if let Some(bpm) = self.estimator.on_peak(sample.ts_us) {
            log::debug!("bpm updated: {}", bpm);
            events.push(MonitorEvent::BpmUpdated { bpm });

            if let Some(alert) = self.policy.evaluate(bpm) {
                log::warn!("{}", alert.reason);
                events.push(MonitorEvent::HighHeartRate {
                    bpm: alert.bpm,
                    reason: alert.reason,
                });
            }
        }
        events
    }

    /// Current BPM estimate, `None` while unknown.
    pub fn bpm(&self) -> Option<u32> {
        self.estimator.bpm()
    }

    /// Ordered snapshot of the tracked sample window for the display path.
    pub fn window(&self) -> Vec<Sample> {
        self.buffer.snapshot()
    }

    /// Stop the monitor: clear the window, the peak queue and the estimate.
    pub fn stop(&mut self) {
        self.buffer.clear();
        self.detector.reset();
        self.estimator.reset();
        self.status = MonitorStatus::Idle;
        log::info!("monitor stopped");
    }
}

impl Default for HeartMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle sharing one monitor between the producer (sample push)
/// and consumer (display/alert) paths. Critical sections are short enough
/// that contention is negligible at the target sample rate.
#[derive(Debug, Clone)]
pub struct SharedMonitor {
    inner: Arc<Mutex<HeartMonitor>>,
}

impl SharedMonitor {
    pub fn new(monitor: HeartMonitor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(monitor)),
        }
    }

    pub fn on_connected(&self) -> MonitorEvent {
        self.inner.lock().on_connected()
    }

    pub fn on_disconnected(&self) -> MonitorEvent {
        self.inner.lock().on_disconnected()
    }

    pub fn push_sample(&self, value: i32, ts_us: i64) -> Vec<MonitorEvent> {
        self.inner.lock().on_sample(value, ts_us)
    }

    pub fn bpm(&self) -> Option<u32> {
        self.inner.lock().bpm()
    }

    pub fn window(&self) -> Vec<Sample> {
        self.inner.lock().window()
    }

    pub fn status(&self) -> MonitorStatus {
        self.inner.lock().status()
    }

    pub fn stop(&self) {
        self.inner.lock().stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP_US: i64 = 10_000; // 100 Hz

    fn warm_up(monitor: &mut HeartMonitor, n: usize) -> i64 {
        let mut ts = 0;
        for i in 0..n {
            ts = i as i64 * STEP_US;
            let events = monitor.push(Sample::new(ts, 500));
            assert!(events.is_empty());
        }
        ts
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut monitor = HeartMonitor::new();
        assert_eq!(monitor.status(), MonitorStatus::Idle);

        assert_eq!(monitor.on_connected(), MonitorEvent::SourceConnected {});
        assert_eq!(monitor.status(), MonitorStatus::Connected);

        monitor.push(Sample::new(0, 500));
        assert_eq!(monitor.status(), MonitorStatus::Streaming);

        monitor.on_disconnected();
        assert_eq!(monitor.status(), MonitorStatus::Disconnected);

        // Resume: pushes simply continue against the retained windows.
        monitor.on_connected();
        monitor.push(Sample::new(STEP_US, 500));
        assert_eq!(monitor.status(), MonitorStatus::Streaming);
        assert_eq!(monitor.window().len(), 2);
    }

    #[test]
    fn test_spike_yields_single_peak_then_bpm_on_second() {
        let mut monitor = HeartMonitor::new();
        let ts = warm_up(&mut monitor, 1000);

        let events = monitor.push(Sample::new(ts + STEP_US, 900));
        assert_eq!(
            events,
            vec![MonitorEvent::PeakAccepted { ts_us: ts + STEP_US }]
        );
        assert_eq!(monitor.bpm(), None, "one peak is not enough");

        // Half a second of baseline, then a second spike.
        let mut t = ts + STEP_US;
        for _ in 0..49 {
            t += STEP_US;
            assert!(monitor.push(Sample::new(t, 500)).is_empty());
        }
        t += STEP_US;
        let events = monitor.push(Sample::new(t, 900));
        assert_eq!(
            events,
            vec![
                MonitorEvent::PeakAccepted { ts_us: t },
                MonitorEvent::BpmUpdated { bpm: 120 },
                MonitorEvent::HighHeartRate {
                    bpm: 120,
                    reason: "High heart rate: 120 BPM".into()
                },
            ]
        );
        assert_eq!(monitor.bpm(), Some(120));
    }

    #[test]
    fn test_no_alert_at_threshold() {
        let config = MonitorConfig {
            alert_bpm: 120,
            ..Default::default()
        };
        let mut monitor = HeartMonitor::with_config(config);
        let ts = warm_up(&mut monitor, 1000);

        monitor.push(Sample::new(ts + STEP_US, 900));
        let mut t = ts + STEP_US;
        for _ in 0..49 {
            t += STEP_US;
            monitor.push(Sample::new(t, 500));
        }
        t += STEP_US;
        // BPM 120 does not strictly exceed the 120 threshold.
        let events = monitor.push(Sample::new(t, 900));
        assert_eq!(
            events,
            vec![
                MonitorEvent::PeakAccepted { ts_us: t },
                MonitorEvent::BpmUpdated { bpm: 120 },
            ]
        );
    }

    #[test]
    fn test_stop_clears_state() {
        let mut monitor = HeartMonitor::new();
        let ts = warm_up(&mut monitor, 1000);
        monitor.push(Sample::new(ts + STEP_US, 900));

        monitor.stop();
        assert_eq!(monitor.status(), MonitorStatus::Idle);
        assert_eq!(monitor.bpm(), None);
        assert!(monitor.window().is_empty());
    }

    #[test]
    fn test_shared_monitor_paths() {
        let shared = SharedMonitor::new(HeartMonitor::new());
        let reader = shared.clone();

        shared.on_connected();
        for i in 0..1000 {
            shared.push_sample(500, i * STEP_US);
        }
        assert_eq!(reader.status(), MonitorStatus::Streaming);
        assert_eq!(reader.bpm(), None);
        assert_eq!(reader.window().len(), 1000);
    }
}
