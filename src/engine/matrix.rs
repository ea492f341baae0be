use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use serde::{Deserialize, Serialize};
use super::error::{Shape, ValidationError};

/// Milliseconds since the Unix epoch. A clock set before 1970 reads as 0.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A named rectangular dataset stored under a unique `id`.
///
/// `rows` and `columns` are the *declared* shape; `data` must agree with it
/// (see [`Matrix::validate`]). The store rejects any matrix where they disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matrix {
    pub id: String,
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub data: Vec<Vec<f64>>,
    #[serde(default = "now_millis")]
    pub timestamp: u64,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Matrix {
    /// Builds a matrix whose declared shape is taken from `data`
    /// (row count, and the length of the first row).
    pub fn new(id: impl Into<String>, name: impl Into<String>, data: Vec<Vec<f64>>) -> Self {
        let rows = data.len();
        let columns = data.first().map(Vec::len).unwrap_or(0);
        Self::with_shape(id, name, rows, columns, data)
    }

    /// Builds a matrix with an explicitly declared shape. Nothing is checked here;
    /// a mismatching shape is caught by `validate` when the matrix is stored.
    pub fn with_shape(
        id: impl Into<String>,
        name: impl Into<String>,
        rows: usize,
        columns: usize,
        data: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rows,
            columns,
            data,
            timestamp: now_millis(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Checks the shape invariant: positive dimensions, `rows` rows, each `columns` long.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rows == 0 {
            return Err(ValidationError::new("rows", "dimensions must be positive"));
        }
        if self.columns == 0 {
            return Err(ValidationError::new("columns", "dimensions must be positive"));
        }
        if self.data.len() != self.rows {
            return Err(ValidationError::new(
                "data",
                format!("has {} rows but {} were declared", self.data.len(), self.rows),
            ));
        }
        for (i, row) in self.data.iter().enumerate() {
            if row.len() != self.columns {
                return Err(ValidationError::new(
                    format!("data[{}]", i),
                    format!("has {} columns but {} were declared", row.len(), self.columns),
                ));
            }
        }
        Ok(())
    }

    pub fn shape(&self) -> Shape {
        Shape { rows: self.rows, columns: self.columns }
    }

    /// Number of elements, `rows * columns`.
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `(row, col)`, or `None` when outside the declared shape.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.columns {
            self.data.get(row).and_then(|r| r.get(col)).copied()
        } else {
            None
        }
    }

    /// Copy with new data and a fresh timestamp. The declared shape is kept,
    /// so the copy must still pass `validate` before it can be stored.
    pub fn with_data(&self, data: Vec<Vec<f64>>) -> Self {
        Self {
            data,
            timestamp: now_millis(),
            ..self.clone()
        }
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flat_map(|row| row.iter().copied())
    }
}
