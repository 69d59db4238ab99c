//! Chartscore
//!
//! Reads per-topic scores off exam-score chart images. The extraction
//! itself lives in the `chart-scan` crate; this crate adds decoding,
//! upload validation, configuration, debug rendering and the HTTP API.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
