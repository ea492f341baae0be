use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use super::ops::Operation;

/// Declared shape of a matrix, `rows x columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// A matrix was rejected at the store boundary.
/// `field` names the violated part of the shape (`rows`, `columns`, `data`, `data[i]`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("matrix not found: {id}")]
    NotFound { id: String },

    #[error("dimension mismatch for {operation}: {left} vs {right}")]
    DimensionMismatch {
        operation: Operation,
        left: Shape,
        right: Shape,
    },
}

impl EngineError {
    pub fn not_found(id: &str) -> Self {
        EngineError::NotFound { id: id.to_string() }
    }
}
