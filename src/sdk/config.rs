use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::engine::store::DEFAULT_MAX_ENTRIES;

pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 30_000;

/// Construction-time knobs. Only `enable_telemetry` changes engine behavior;
/// the rest are hints carried for the surrounding layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SdkConfig {
    pub enable_telemetry: bool,
    pub telemetry_port: Option<u16>,
    pub max_entries: usize,
    pub operation_timeout_ms: u64,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            enable_telemetry: false,
            telemetry_port: None,
            max_entries: DEFAULT_MAX_ENTRIES,
            operation_timeout_ms: DEFAULT_OPERATION_TIMEOUT_MS,
        }
    }
}

impl SdkConfig {
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json(&content)?)
    }
}
