//! The matrix engine: entities, arithmetic, and the lock-guarded table.

pub mod error;
pub mod matrix;
pub mod ops;
pub mod stats;
pub mod store;

pub use error::{EngineError, Shape, ValidationError};
pub use matrix::Matrix;
pub use ops::Operation;
pub use stats::Statistics;
pub use store::MatrixEngine;
