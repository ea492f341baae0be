//! Operation telemetry.
//!
//! # CRITICAL SECTION INVARIANT
//! The engine calls every `TelemetryPort` method while it holds the table lock.
//! Implementations must return quickly (buffer or aggregate in memory) and must
//! **NEVER** panic or block on I/O. Telemetry is advisory and is never read back
//! by the engine.

pub mod event;
pub mod metrics;
pub mod recorder;

use std::time::Duration;
use crate::engine::ops::Operation;
use crate::engine::stats::Statistics;

pub use recorder::TelemetryRecorder;

/// The narrow reporting interface the engine depends on.
pub trait TelemetryPort: Send + Sync {
    fn record_operation(&self, operation: Operation, elapsed: Duration);
    fn record_entry_count(&self, count: usize);
    fn record_entry_size(&self, id: &str, size: usize);
    fn record_statistics(&self, id: &str, stats: &Statistics);
    /// Text representation for an external scraper. Format is owned by the implementation.
    fn snapshot(&self) -> String;
    fn close(&self);
}

/// Port used when telemetry is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetryPort for NoopTelemetry {
    fn record_operation(&self, _operation: Operation, _elapsed: Duration) {}
    fn record_entry_count(&self, _count: usize) {}
    fn record_entry_size(&self, _id: &str, _size: usize) {}
    fn record_statistics(&self, _id: &str, _stats: &Statistics) {}

    fn snapshot(&self) -> String {
        String::new()
    }

    fn close(&self) {}
}
