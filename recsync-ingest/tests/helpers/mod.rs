//! Test Helper Utilities
//!
//! Shared utilities for testing recsync-ingest

#![allow(dead_code)]

pub mod fakes;
pub mod log_capture;

pub use fakes::{FakeBoard, FakeNotifier, FakePublisher, MemoryStore};
pub use log_capture::{capture_logs, LogCapture};
