#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use gridstore::{Matrix, MatrixEngine, Operation, Statistics, TelemetryPort};

/// One recorded call against the port.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Operation(Operation),
    EntryCount(usize),
    EntrySize(String, usize),
    Statistics(String, Statistics),
    Snapshot,
    Close,
}

/// Test double that records every call in order.
#[derive(Debug, Default)]
pub struct MockTelemetry {
    calls: Mutex<Vec<Call>>,
}

impl MockTelemetry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Operation(op) => Some(op),
                _ => None,
            })
            .collect()
    }

    pub fn entry_counts(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::EntryCount(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Close).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl TelemetryPort for MockTelemetry {
    fn record_operation(&self, operation: Operation, _elapsed: Duration) {
        self.push(Call::Operation(operation));
    }

    fn record_entry_count(&self, count: usize) {
        self.push(Call::EntryCount(count));
    }

    fn record_entry_size(&self, id: &str, size: usize) {
        self.push(Call::EntrySize(id.to_string(), size));
    }

    fn record_statistics(&self, id: &str, stats: &Statistics) {
        self.push(Call::Statistics(id.to_string(), stats.clone()));
    }

    fn snapshot(&self) -> String {
        self.push(Call::Snapshot);
        String::new()
    }

    fn close(&self) {
        self.push(Call::Close);
    }
}

pub fn engine_with_mock() -> (MatrixEngine, Arc<MockTelemetry>) {
    let mock = MockTelemetry::new();
    (MatrixEngine::new(mock.clone()), mock)
}

pub fn m1() -> Matrix {
    Matrix::new("m1", "Test Matrix 1", vec![vec![1.0, 2.0], vec![3.0, 4.0]])
}

pub fn m2() -> Matrix {
    Matrix::new("m2", "Test Matrix 2", vec![vec![5.0, 6.0], vec![7.0, 8.0]])
}

/// Ids of every stored entry, sorted.
pub async fn ids(engine: &MatrixEngine) -> Vec<String> {
    let mut ids: Vec<String> = engine.list().await.into_iter().map(|m| m.id).collect();
    ids.sort();
    ids
}
