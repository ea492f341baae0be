use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

use super::event::TelemetryEvent;
use super::metrics::TelemetryMetrics;
use super::TelemetryPort;
use crate::engine::ops::Operation;
use crate::engine::stats::Statistics;

const MAX_EVENTS: usize = 10_000;

#[derive(Debug, Default)]
struct RecorderState {
    buffer: VecDeque<TelemetryEvent>,
    metrics: TelemetryMetrics,
    closed: bool,
}

/// In-process telemetry port.
///
/// Keeps the most recent `MAX_EVENTS` raw events and running aggregates that are
/// never truncated. `snapshot()` renders the aggregates for scraping.
#[derive(Debug)]
pub struct TelemetryRecorder {
    state: Mutex<RecorderState>,
    exposition_port: Option<u16>,
}

impl TelemetryRecorder {
    pub fn new(exposition_port: Option<u16>) -> Self {
        match exposition_port {
            Some(port) => info!("TelemetryRecorder initialized (exposition port {})", port),
            None => info!("TelemetryRecorder initialized"),
        }
        Self {
            state: Mutex::new(RecorderState {
                buffer: VecDeque::with_capacity(MAX_EVENTS),
                ..RecorderState::default()
            }),
            exposition_port,
        }
    }

    /// Port an external exposition server should bind, if one was configured.
    pub fn exposition_port(&self) -> Option<u16> {
        self.exposition_port
    }

    // A panic elsewhere must not turn telemetry into a second failure.
    fn lock(&self) -> MutexGuard<'_, RecorderState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, event: TelemetryEvent) {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.metrics.apply(&event);
        if state.buffer.len() >= MAX_EVENTS {
            state.buffer.pop_front();
        }
        state.buffer.push_back(event);
    }

    /// Most recent raw events, oldest first.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.lock().buffer.iter().cloned().collect()
    }

    pub fn metrics(&self) -> TelemetryMetrics {
        self.lock().metrics.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TelemetryPort for TelemetryRecorder {
    fn record_operation(&self, operation: Operation, elapsed: Duration) {
        let duration_micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.record(TelemetryEvent::OperationTimed { operation, duration_micros });
    }

    fn record_entry_count(&self, count: usize) {
        self.record(TelemetryEvent::EntryCount { count });
    }

    fn record_entry_size(&self, id: &str, size: usize) {
        self.record(TelemetryEvent::EntrySize { matrix_id: id.to_string(), size });
    }

    fn record_statistics(&self, id: &str, stats: &Statistics) {
        self.record(TelemetryEvent::StatisticsComputed {
            matrix_id: id.to_string(),
            summary: stats.into(),
        });
    }

    fn snapshot(&self) -> String {
        self.lock().metrics.render()
    }

    fn close(&self) {
        let mut state = self.lock();
        if !state.closed {
            state.closed = true;
            info!("TelemetryRecorder closed");
        }
    }
}
