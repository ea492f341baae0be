//! Public entry point: a builder-assembled engine plus its telemetry port.

pub mod config;

use std::sync::Arc;
use tracing::{debug, info};

use crate::engine::{EngineError, Matrix, MatrixEngine, Statistics, ValidationError};
use crate::telemetry::{NoopTelemetry, TelemetryPort, TelemetryRecorder};
pub use config::SdkConfig;

pub struct MatrixSdk {
    config: SdkConfig,
    engine: MatrixEngine,
    // `None` when telemetry is disabled.
    telemetry: Option<Arc<dyn TelemetryPort>>,
}

#[derive(Default)]
pub struct MatrixSdkBuilder {
    config: SdkConfig,
    telemetry: Option<Arc<dyn TelemetryPort>>,
}

impl MatrixSdkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: SdkConfig) -> Self {
        Self { config, telemetry: None }
    }

    pub fn enable_telemetry(mut self, enable: bool) -> Self {
        self.config.enable_telemetry = enable;
        self
    }

    pub fn telemetry_port(mut self, port: u16) -> Self {
        self.config.telemetry_port = Some(port);
        self
    }

    pub fn max_entries(mut self, count: usize) -> Self {
        self.config.max_entries = count;
        self
    }

    pub fn operation_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.operation_timeout_ms = timeout_ms;
        self
    }

    /// Injects a custom port and turns telemetry on.
    /// A later `enable_telemetry(false)` wins: the port is dropped at `build()`.
    pub fn telemetry(mut self, port: Arc<dyn TelemetryPort>) -> Self {
        self.config.enable_telemetry = true;
        self.telemetry = Some(port);
        self
    }

    pub fn build(self) -> MatrixSdk {
        let telemetry: Option<Arc<dyn TelemetryPort>> = match (self.config.enable_telemetry, self.telemetry) {
            (false, Some(_)) => {
                debug!("Telemetry disabled; dropping injected port");
                None
            }
            (false, None) => None,
            (true, Some(port)) => Some(port),
            (true, None) => Some(Arc::new(TelemetryRecorder::new(self.config.telemetry_port))),
        };

        let port: Arc<dyn TelemetryPort> = match &telemetry {
            Some(port) => port.clone(),
            None => Arc::new(NoopTelemetry),
        };
        let engine = MatrixEngine::new(port).with_max_entries(self.config.max_entries);

        info!(
            "MatrixSdk built (telemetry {}, max entries {})",
            if telemetry.is_some() { "enabled" } else { "disabled" },
            self.config.max_entries
        );

        MatrixSdk { config: self.config, engine, telemetry }
    }
}

impl MatrixSdk {
    pub fn builder() -> MatrixSdkBuilder {
        MatrixSdkBuilder::new()
    }

    /// Telemetry disabled, default hints.
    pub fn with_defaults() -> Self {
        MatrixSdkBuilder::new().build()
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub async fn create(&self, matrix: Matrix) -> Result<Matrix, ValidationError> {
        self.engine.create(matrix).await
    }

    pub async fn get(&self, id: &str) -> Option<Matrix> {
        self.engine.get(id).await
    }

    pub async fn list(&self) -> Vec<Matrix> {
        self.engine.list().await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.engine.delete(id).await
    }

    pub async fn add(&self, id1: &str, id2: &str, result_id: Option<&str>) -> Result<Matrix, EngineError> {
        self.engine.add(id1, id2, result_id).await
    }

    pub async fn subtract(&self, id1: &str, id2: &str, result_id: Option<&str>) -> Result<Matrix, EngineError> {
        self.engine.subtract(id1, id2, result_id).await
    }

    pub async fn multiply(&self, id1: &str, id2: &str, result_id: Option<&str>) -> Result<Matrix, EngineError> {
        self.engine.multiply(id1, id2, result_id).await
    }

    pub async fn transpose(&self, id: &str, result_id: Option<&str>) -> Result<Matrix, EngineError> {
        self.engine.transpose(id, result_id).await
    }

    pub async fn statistics(&self, id: &str) -> Result<Statistics, EngineError> {
        self.engine.statistics(id).await
    }

    /// Current telemetry exposition text, or `None` when telemetry is disabled.
    pub fn metrics_snapshot(&self) -> Option<String> {
        self.telemetry.as_ref().map(|port| port.snapshot())
    }

    /// Clears the table and closes the telemetry port. Safe to call repeatedly.
    pub async fn close(&self) {
        self.engine.close().await;
    }
}
