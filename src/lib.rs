pub mod engine;
pub mod telemetry;
pub mod sdk;

// Re-export specific items for convenient access
pub use engine::{EngineError, Matrix, MatrixEngine, Operation, Shape, Statistics, ValidationError};
pub use sdk::{MatrixSdk, MatrixSdkBuilder, SdkConfig};
pub use telemetry::{NoopTelemetry, TelemetryPort, TelemetryRecorder};
