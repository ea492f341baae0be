use std::collections::BTreeMap;
use std::fmt::Write;
use super::event::{StatisticsSummary, TelemetryEvent};
use crate::engine::ops::Operation;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryMetrics {
    pub operations: BTreeMap<Operation, OperationStats>,
    pub entry_count: usize,
    pub entry_sizes: BTreeMap<String, usize>,
    pub statistics: BTreeMap<String, StatisticsSummary>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperationStats {
    pub count: u64,
    pub total_micros: u64,
    pub max_micros: u64,
}

impl OperationStats {
    pub fn avg_micros(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_micros as f64 / self.count as f64
        }
    }
}

impl TelemetryMetrics {
    /// Folds one event into the running aggregates.
    pub fn apply(&mut self, event: &TelemetryEvent) {
        match event {
            TelemetryEvent::OperationTimed { operation, duration_micros } => {
                let stats = self.operations.entry(*operation).or_default();
                stats.count += 1;
                stats.total_micros = stats.total_micros.saturating_add(*duration_micros);
                stats.max_micros = stats.max_micros.max(*duration_micros);
            }
            TelemetryEvent::EntryCount { count } => self.entry_count = *count,
            TelemetryEvent::EntrySize { matrix_id, size } => {
                self.entry_sizes.insert(matrix_id.clone(), *size);
            }
            TelemetryEvent::StatisticsComputed { matrix_id, summary } => {
                self.statistics.insert(matrix_id.clone(), *summary);
            }
        }
    }

    /// Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();

        // `write!` into a String cannot fail.
        let _ = writeln!(out, "# HELP matrix_operations_total Completed matrix operations");
        let _ = writeln!(out, "# TYPE matrix_operations_total counter");
        for (op, stats) in &self.operations {
            let _ = writeln!(out, "matrix_operations_total{{operation=\"{}\"}} {}", op, stats.count);
        }

        let _ = writeln!(out, "# HELP matrix_operation_duration_seconds Time taken by matrix operations");
        let _ = writeln!(out, "# TYPE matrix_operation_duration_seconds summary");
        for (op, stats) in &self.operations {
            let _ = writeln!(
                out,
                "matrix_operation_duration_seconds_count{{operation=\"{}\"}} {}",
                op, stats.count
            );
            let _ = writeln!(
                out,
                "matrix_operation_duration_seconds_sum{{operation=\"{}\"}} {}",
                op,
                micros_to_secs(stats.total_micros)
            );
        }
        let _ = writeln!(out, "# TYPE matrix_operation_duration_seconds_max gauge");
        for (op, stats) in &self.operations {
            let _ = writeln!(
                out,
                "matrix_operation_duration_seconds_max{{operation=\"{}\"}} {}",
                op,
                micros_to_secs(stats.max_micros)
            );
        }

        let _ = writeln!(out, "# TYPE matrix_entries gauge");
        let _ = writeln!(out, "matrix_entries {}", self.entry_count);

        let _ = writeln!(out, "# TYPE matrix_entry_size gauge");
        for (id, size) in &self.entry_sizes {
            let _ = writeln!(out, "matrix_entry_size{{matrix_id=\"{}\"}} {}", escape_label(id), size);
        }

        let gauges: [(&str, fn(&StatisticsSummary) -> f64); 5] = [
            ("matrix_mean", |s: &StatisticsSummary| s.mean),
            ("matrix_std", |s: &StatisticsSummary| s.standard_deviation),
            ("matrix_variance", |s: &StatisticsSummary| s.variance),
            ("matrix_min", |s: &StatisticsSummary| s.min),
            ("matrix_max", |s: &StatisticsSummary| s.max),
        ];
        for (name, value) in gauges {
            let _ = writeln!(out, "# TYPE {} gauge", name);
            for (id, summary) in &self.statistics {
                let _ = writeln!(out, "{}{{matrix_id=\"{}\"}} {}", name, escape_label(id), value(summary));
            }
        }

        out
    }
}

fn micros_to_secs(micros: u64) -> f64 {
    micros as f64 / 1_000_000.0
}

fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
