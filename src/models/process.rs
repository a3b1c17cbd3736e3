// Running process models

use serde::Serialize;

use super::Field;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub status: String,
    /// Unix seconds.
    pub start_time: Field<u64>,
    pub memory_rss_bytes: u64,
    pub cpu_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSnapshot {
    pub processes: Vec<ProcessInfo>,
}

impl ProcessSnapshot {
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
