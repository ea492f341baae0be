use serde::{Deserialize, Serialize};
use super::matrix::{now_millis, Matrix};

/// Summary statistics over the flattened elements of one matrix.
/// Computed on demand, never stored in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub matrix_id: String,
    pub mean: f64,
    pub standard_deviation: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub calculated_at: u64,
}

impl Statistics {
    /// Population statistics (variance divides by the element count).
    /// An empty matrix yields all zeros.
    pub fn compute(matrix: &Matrix) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in matrix.values() {
            count += 1;
            sum += v;
            // NaN is sticky, matching mean/sum/variance
            if !min.is_nan() && (v.is_nan() || v < min) {
                min = v;
            }
            if !max.is_nan() && (v.is_nan() || v > max) {
                max = v;
            }
        }

        if count == 0 {
            return Self::zeroed(&matrix.id);
        }

        let n = count as f64;
        let mean = sum / n;
        let variance = matrix.values().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Self {
            matrix_id: matrix.id.clone(),
            mean,
            standard_deviation: variance.sqrt(),
            variance,
            min,
            max,
            sum,
            calculated_at: now_millis(),
        }
    }

    fn zeroed(id: &str) -> Self {
        Self {
            matrix_id: id.to_string(),
            mean: 0.0,
            standard_deviation: 0.0,
            variance: 0.0,
            min: 0.0,
            max: 0.0,
            sum: 0.0,
            calculated_at: now_millis(),
        }
    }
}
