use std::io::BufRead;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use cardia_core::Sample;
use crossbeam_channel::{Sender, TrySendError};

use crate::parse::parse_sample_line;

/// Messages handed from the producer thread to the monitor loop.
///
/// Lifecycle messages are delivered with a blocking send (never dropped);
/// samples use `try_send` so a full channel drops the reading with
/// visibility in the metrics instead of stalling the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMsg {
    Connected,
    Sample(Sample),
    Disconnected,
}

/// Reader counters tracked atomically.
#[derive(Debug, Default)]
pub struct ReaderMetrics {
    pub lines_read: AtomicU64,
    pub samples_emitted: AtomicU64,
    pub parse_failures: AtomicU64,
    pub channel_full_drops: AtomicU64,
}

impl ReaderMetrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            samples_emitted: self.samples_emitted.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            channel_full_drops: self.channel_full_drops.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub lines_read: u64,
    pub samples_emitted: u64,
    pub parse_failures: u64,
    pub channel_full_drops: u64,
}

/// Producer thread reading lines from a transport, stamping each parsed
/// value with the wall clock and emitting it on the channel.
///
/// Exactly one reader produces into a given channel; the consumer applies
/// samples in channel order, so the arrival ordering is preserved
/// end to end.
pub struct SampleReader {
    running: Arc<AtomicBool>,
    metrics: Arc<ReaderMetrics>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SampleReader {
    /// Spawn the reader over any line source.
    pub fn spawn<R>(source: R, tx: Sender<SourceMsg>) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let metrics = Arc::new(ReaderMetrics::default());
        let thread_running = Arc::clone(&running);
        let thread_metrics = Arc::clone(&metrics);

        let handle = thread::spawn(move || {
            Self::run(source, tx, thread_running, thread_metrics);
        });

        Self {
            running,
            metrics,
            handle: Some(handle),
        }
    }

    fn run<R: BufRead>(
        mut source: R,
        tx: Sender<SourceMsg>,
        running: Arc<AtomicBool>,
        metrics: Arc<ReaderMetrics>,
    ) {
        if tx.send(SourceMsg::Connected).is_err() {
            return;
        }

        let mut line = String::new();
        while running.load(Ordering::Relaxed) {
            line.clear();
            match source.read_line(&mut line) {
                Ok(0) => break, // EOF
                Ok(_) => {
                    metrics.lines_read.fetch_add(1, Ordering::Relaxed);
                    let Some(value) = parse_sample_line(&line) else {
                        metrics.parse_failures.fetch_add(1, Ordering::Relaxed);
                        log::debug!("discarding unparseable line: {:?}", line.trim_end());
                        continue;
                    };

                    let sample = Sample::new(now_us(), value);
                    match tx.try_send(SourceMsg::Sample(sample)) {
                        Ok(()) => {
                            metrics.samples_emitted.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(TrySendError::Full(_)) => {
                            metrics.channel_full_drops.fetch_add(1, Ordering::Relaxed);
                            log::warn!("sample channel full, dropping reading");
                        }
                        Err(TrySendError::Disconnected(_)) => return,
                    }
                }
                Err(e) => {
                    log::warn!("transport read error: {}", e);
                    break;
                }
            }
        }

        let _ = tx.send(SourceMsg::Disconnected);
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Signal the thread to stop and wait for it to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SampleReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}
