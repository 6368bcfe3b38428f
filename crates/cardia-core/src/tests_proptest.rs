use proptest::prelude::*;

/// Property-based suite for the estimator invariants that must hold for
/// every input sequence, not just the scripted ones.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SampleBuffer;
    use crate::domain::{MonitorEvent, Sample};
    use crate::monitor::HeartMonitor;

    proptest! {
        #[test]
        fn test_buffer_bound_and_fifo(
            capacity in 1usize..64,
            values in proptest::collection::vec(any::<i32>(), 0..256),
        ) {
            let mut buf = SampleBuffer::new(capacity);
            for (i, v) in values.iter().enumerate() {
                buf.push(Sample::new(i as i64, *v));
                prop_assert!(buf.len() <= capacity);
            }

            // The survivors are exactly the most recent pushes, in order.
            let expected: Vec<i32> = values
                .iter()
                .copied()
                .skip(values.len().saturating_sub(capacity))
                .collect();
            let got: Vec<i32> = buf.iter().map(|s| s.value).collect();
            prop_assert_eq!(got, expected);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_constant_signal_never_peaks(
            value in any::<i32>(),
            count in 5usize..300,
        ) {
            let mut monitor = HeartMonitor::new();
            for i in 0..count {
                let events = monitor.on_sample(value, i as i64 * 10_000);
                prop_assert!(events.is_empty(), "constant signal produced {:?}", events);
            }
            prop_assert_eq!(monitor.bpm(), None);
        }

        #[test]
        fn test_refractory_separation(
            values in proptest::collection::vec(0i32..1024, 50..400),
        ) {
            let mut monitor = HeartMonitor::new();
            let mut peak_ts: Vec<i64> = Vec::new();

            for (i, v) in values.iter().enumerate() {
                let ts = i as i64 * 10_000;
                for event in monitor.on_sample(*v, ts) {
                    if let MonitorEvent::PeakAccepted { ts_us } = event {
                        peak_ts.push(ts_us);
                    }
                }
            }

            for pair in peak_ts.windows(2) {
                prop_assert!(
                    pair[1] - pair[0] > 300_000,
                    "peaks {} and {} violate the refractory period",
                    pair[0],
                    pair[1]
                );
            }
        }

        #[test]
        fn test_window_bound_under_load(
            values in proptest::collection::vec(0i32..1024, 0..2000),
        ) {
            let mut monitor = HeartMonitor::new();
            let capacity = monitor.config().capacity();
            for (i, v) in values.iter().enumerate() {
                monitor.on_sample(*v, i as i64 * 10_000);
                prop_assert!(monitor.window().len() <= capacity);
            }
        }
    }
}
