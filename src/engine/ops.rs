use std::fmt;
use serde::{Deserialize, Serialize};
use super::error::EngineError;
use super::matrix::Matrix;

/// Every timed engine operation. The string form is the telemetry tag
/// and the infix of default result ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Delete,
    Add,
    Subtract,
    Multiply,
    Transpose,
    Statistics,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Transpose => "transpose",
            Operation::Statistics => "statistics",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{id1}_{op}_{id2}` unless the caller supplied one.
pub fn binary_result_id(op: Operation, id1: &str, id2: &str, result_id: Option<&str>) -> String {
    match result_id {
        Some(id) => id.to_string(),
        None => format!("{}_{}_{}", id1, op.as_str(), id2),
    }
}

pub fn transpose_result_id(id: &str, result_id: Option<&str>) -> String {
    match result_id {
        Some(id) => id.to_string(),
        None => format!("{}_transpose", id),
    }
}

fn require_same_shape(op: Operation, lhs: &Matrix, rhs: &Matrix) -> Result<(), EngineError> {
    if lhs.rows != rhs.rows || lhs.columns != rhs.columns {
        return Err(EngineError::DimensionMismatch {
            operation: op,
            left: lhs.shape(),
            right: rhs.shape(),
        });
    }
    Ok(())
}

fn elementwise(
    op: Operation,
    symbol: char,
    lhs: &Matrix,
    rhs: &Matrix,
    result_id: String,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Matrix, EngineError> {
    require_same_shape(op, lhs, rhs)?;

    let data = lhs
        .data
        .iter()
        .zip(&rhs.data)
        .map(|(a, b)| a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
        .collect();

    Ok(Matrix::with_shape(
        result_id,
        format!("{} {} {}", lhs.name, symbol, rhs.name),
        lhs.rows,
        lhs.columns,
        data,
    ))
}

pub fn add(lhs: &Matrix, rhs: &Matrix, result_id: String) -> Result<Matrix, EngineError> {
    elementwise(Operation::Add, '+', lhs, rhs, result_id, |x, y| x + y)
}

pub fn subtract(lhs: &Matrix, rhs: &Matrix, result_id: String) -> Result<Matrix, EngineError> {
    elementwise(Operation::Subtract, '-', lhs, rhs, result_id, |x, y| x - y)
}

/// Naive product. Cells accumulate in `i, j, k` order starting from 0.0,
/// which fixes the floating-point summation order.
pub fn multiply(lhs: &Matrix, rhs: &Matrix, result_id: String) -> Result<Matrix, EngineError> {
    if lhs.columns != rhs.rows {
        return Err(EngineError::DimensionMismatch {
            operation: Operation::Multiply,
            left: lhs.shape(),
            right: rhs.shape(),
        });
    }

    let mut data = vec![vec![0.0; rhs.columns]; lhs.rows];
    for (i, out_row) in data.iter_mut().enumerate() {
        for (j, cell) in out_row.iter_mut().enumerate() {
            for k in 0..lhs.columns {
                *cell += lhs.data[i][k] * rhs.data[k][j];
            }
        }
    }

    Ok(Matrix::with_shape(
        result_id,
        format!("{} * {}", lhs.name, rhs.name),
        lhs.rows,
        rhs.columns,
        data,
    ))
}

pub fn transpose(m: &Matrix, result_id: String) -> Matrix {
    let mut data = vec![vec![0.0; m.rows]; m.columns];
    for (i, row) in m.data.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            data[j][i] = value;
        }
    }

    Matrix::with_shape(result_id, format!("{} Transposed", m.name), m.columns, m.rows, data)
}
