//! Helpers shared by unit tests, integration tests and benchmarks.
//!
//! Compiled for unit tests and behind the `test-util` feature so the
//! integration tests under `tests/` can reuse the same fixtures.

pub mod collecting_handler;
pub mod udp;

pub use collecting_handler::CollectingHandler;
pub use udp::{UdpCollector, priority_encoder};
