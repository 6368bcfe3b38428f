//! # cardia-transport
//!
//! Line-oriented sample source for the monitor: parses raw transport lines
//! into integer readings and hands them to the consumer over a bounded
//! channel from a dedicated producer thread.
//!
//! The serial device itself is out of scope; anything implementing
//! `BufRead` works as a source (a serial port wrapper, a file, stdin, a
//! test cursor).

pub mod parse;
pub mod reader;

pub use parse::parse_sample_line;
pub use reader::{MetricsSnapshot, ReaderMetrics, SampleReader, SourceMsg};
