//! recsync-ingest library interface
//!
//! Reconciles capture recordings with scheduled sessions from the
//! work-management board, relocates matched files and publishes them.
//! Exposed as a library so integration tests can drive a pass with fakes.

pub mod clients;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod types;

pub use crate::error::{IngestError, IngestResult};
pub use crate::services::{IngestOrchestrator, PassSettings, Publication, RunMode};
