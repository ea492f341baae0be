use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::{EngineError, ValidationError};
use super::matrix::{now_millis, Matrix};
use super::ops::{self, Operation};
use super::stats::Statistics;
use crate::telemetry::TelemetryPort;

pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

struct Table {
    entries: HashMap<String, Matrix>,
    last_stamp: u64,
}

impl Table {
    /// Strictly increasing write stamp, tracking wall-clock millis when it moves forward.
    fn next_stamp(&mut self) -> u64 {
        self.last_stamp = now_millis().max(self.last_stamp + 1);
        self.last_stamp
    }

    fn insert(&mut self, mut matrix: Matrix) -> Matrix {
        matrix.timestamp = self.next_stamp();
        self.entries.insert(matrix.id.clone(), matrix.clone());
        matrix
    }

    fn lookup(&self, id: &str) -> Result<&Matrix, EngineError> {
        self.entries.get(id).ok_or_else(|| EngineError::not_found(id))
    }
}

/// The authoritative table of named matrices.
///
/// **LOCKING LAW**: every public operation holds the single table lock from entry
/// to exit, including its telemetry calls. There is no per-key locking. tokio's
/// mutex queues waiters FIFO, so operations observe one total order.
pub struct MatrixEngine {
    table: Mutex<Table>,
    telemetry: Arc<dyn TelemetryPort>,
    // Soft hint only: exceeding it logs, never rejects.
    max_entries: usize,
    telemetry_closed: AtomicBool,
}

impl MatrixEngine {
    pub fn new(telemetry: Arc<dyn TelemetryPort>) -> Self {
        Self {
            table: Mutex::new(Table {
                entries: HashMap::new(),
                last_stamp: 0,
            }),
            telemetry,
            max_entries: DEFAULT_MAX_ENTRIES,
            telemetry_closed: AtomicBool::new(false),
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    fn check_capacity(&self, count: usize) {
        if count > self.max_entries {
            warn!("Matrix table holds {} entries (soft limit {})", count, self.max_entries);
        }
    }

    /// Validates, then inserts or overwrites under `matrix.id`.
    /// A rejected matrix never touches the table.
    pub async fn create(&self, matrix: Matrix) -> Result<Matrix, ValidationError> {
        if let Err(e) = matrix.validate() {
            warn!("Rejected matrix {}: {}", matrix.id, e);
            return Err(e);
        }

        let mut table = self.table.lock().await;
        let started = Instant::now();
        let stored = table.insert(matrix);
        let elapsed = started.elapsed();
        let count = table.entries.len();

        self.telemetry.record_operation(Operation::Create, elapsed);
        self.telemetry.record_entry_count(count);
        self.telemetry.record_entry_size(&stored.id, stored.len());
        self.check_capacity(count);

        debug!("Created matrix {} with size {}x{}", stored.id, stored.rows, stored.columns);
        Ok(stored)
    }

    /// Absence is a normal `None`, not an error.
    pub async fn get(&self, id: &str) -> Option<Matrix> {
        self.table.lock().await.entries.get(id).cloned()
    }

    /// Snapshot of every entry. Order is unspecified.
    pub async fn list(&self) -> Vec<Matrix> {
        self.table.lock().await.entries.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns whether an entry was actually removed. A miss reports nothing.
    pub async fn delete(&self, id: &str) -> bool {
        let mut table = self.table.lock().await;
        let started = Instant::now();
        let removed = table.entries.remove(id).is_some();
        if removed {
            let elapsed = started.elapsed();
            self.telemetry.record_operation(Operation::Delete, elapsed);
            self.telemetry.record_entry_count(table.entries.len());
            debug!("Deleted matrix {}", id);
        }
        removed
    }

    pub async fn add(&self, id1: &str, id2: &str, result_id: Option<&str>) -> Result<Matrix, EngineError> {
        self.binary_op(Operation::Add, id1, id2, result_id, ops::add).await
    }

    pub async fn subtract(&self, id1: &str, id2: &str, result_id: Option<&str>) -> Result<Matrix, EngineError> {
        self.binary_op(Operation::Subtract, id1, id2, result_id, ops::subtract).await
    }

    pub async fn multiply(&self, id1: &str, id2: &str, result_id: Option<&str>) -> Result<Matrix, EngineError> {
        self.binary_op(Operation::Multiply, id1, id2, result_id, ops::multiply).await
    }

    pub async fn transpose(&self, id: &str, result_id: Option<&str>) -> Result<Matrix, EngineError> {
        let mut table = self.table.lock().await;
        let started = Instant::now();

        let result = match table.lookup(id) {
            Ok(m) => ops::transpose(m, ops::transpose_result_id(id, result_id)),
            Err(e) => {
                warn!("Failed to transpose matrix {}: {}", id, e);
                return Err(e);
            }
        };
        let stored = table.insert(result);
        let elapsed = started.elapsed();

        self.telemetry.record_operation(Operation::Transpose, elapsed);
        self.check_capacity(table.entries.len());
        Ok(stored)
    }

    /// Computes statistics once, reports them, and returns them.
    /// The table is read but never written.
    pub async fn statistics(&self, id: &str) -> Result<Statistics, EngineError> {
        let table = self.table.lock().await;
        let started = Instant::now();

        let stats = match table.lookup(id) {
            Ok(m) => Statistics::compute(m),
            Err(e) => {
                warn!("Failed to calculate statistics for matrix {}: {}", id, e);
                return Err(e);
            }
        };
        let elapsed = started.elapsed();

        self.telemetry.record_statistics(id, &stats);
        self.telemetry.record_operation(Operation::Statistics, elapsed);
        Ok(stats)
    }

    /// Shared path for two-operand operations: both lookups happen before any
    /// compute, and the fully built result is inserted in one step.
    async fn binary_op<F>(
        &self,
        operation: Operation,
        id1: &str,
        id2: &str,
        result_id: Option<&str>,
        compute: F,
    ) -> Result<Matrix, EngineError>
    where
        F: FnOnce(&Matrix, &Matrix, String) -> Result<Matrix, EngineError>,
    {
        let mut table = self.table.lock().await;
        let started = Instant::now();

        let computed = table.lookup(id1).and_then(|m1| {
            let m2 = table.lookup(id2)?;
            compute(m1, m2, ops::binary_result_id(operation, id1, id2, result_id))
        });
        let result = match computed {
            Ok(m) => m,
            Err(e) => {
                warn!("Failed to perform {} on matrices {} and {}: {}", operation, id1, id2, e);
                return Err(e);
            }
        };
        let stored = table.insert(result);
        let elapsed = started.elapsed();

        self.telemetry.record_operation(operation, elapsed);
        self.check_capacity(table.entries.len());
        Ok(stored)
    }

    /// Clears the table. The telemetry port is closed on the first call only.
    pub async fn close(&self) {
        let mut table = self.table.lock().await;
        table.entries.clear();
        if !self.telemetry_closed.swap(true, Ordering::SeqCst) {
            self.telemetry.close();
            info!("Matrix engine closed");
        }
    }
}
