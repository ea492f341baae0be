use serde::{Serialize, Deserialize};
use crate::engine::ops::Operation;

// Allowed: IDs, Durations, Counts, Sizes, derived summary values
// Forbidden: raw matrix data

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    OperationTimed {
        operation: Operation,
        duration_micros: u64,
    },

    EntryCount {
        count: usize,
    },

    EntrySize {
        matrix_id: String,
        size: usize,
    },

    StatisticsComputed {
        matrix_id: String,
        summary: StatisticsSummary,
    },
}

/// The gauge-worthy part of a `Statistics` value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub mean: f64,
    pub standard_deviation: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
}

impl From<&crate::engine::stats::Statistics> for StatisticsSummary {
    fn from(stats: &crate::engine::stats::Statistics) -> Self {
        Self {
            mean: stats.mean,
            standard_deviation: stats.standard_deviation,
            variance: stats.variance,
            min: stats.min,
            max: stats.max,
        }
    }
}
