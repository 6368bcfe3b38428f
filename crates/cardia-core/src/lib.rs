//! # cardia-core
//!
//! Streaming heart-rate estimation over integer ADC samples.
//!
//! This crate provides:
//! - **SampleBuffer**: a fixed-capacity, time-ordered window of recent samples
//! - **PeakDetector**: adaptive mean/std-dev thresholding with a refractory period
//! - **RateEstimator**: sliding-window beats-per-minute over accepted peaks
//! - **AlertPolicy**: stateless high-heart-rate alerting
//! - **HeartMonitor**: the engine composing the above behind one `on_sample` call
//!
//! ## Example
//!
//! ```ignore
//! use cardia_core::HeartMonitor;
//!
//! let mut monitor = HeartMonitor::new();
//!
//! // Feed timestamped readings from the transport
//! for (value, ts_us) in readings {
//!     for event in monitor.on_sample(value, ts_us) {
//!         println!("{:?}", event);
//!     }
//! }
//!
//! match monitor.bpm() {
//!     Some(bpm) => println!("BPM: {}", bpm),
//!     None => println!("BPM: unknown"),
//! }
//! ```

pub mod alert;
pub mod buffer;
pub mod config;
pub mod domain;
pub mod monitor;
pub mod peak;
pub mod rate;

#[cfg(test)]
mod tests_proptest;

pub use alert::{AlertPolicy, HighRateAlert};
pub use buffer::SampleBuffer;
pub use config::{ConfigError, MonitorConfig};
pub use domain::{dt_sec, dt_us, EventPriority, MonitorEvent, MonitorStatus, Sample};
pub use monitor::{HeartMonitor, SharedMonitor};
pub use peak::PeakDetector;
pub use rate::RateEstimator;
