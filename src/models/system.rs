// OS identity, CPU, memory and partition models

use serde::Serialize;

use super::Field;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionInfo {
    pub device: String,
    pub mountpoint: String,
    pub fs_type: Field<String>,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub usage_percent: f64,
}

impl PartitionInfo {
    /// Build from total and available space; used and percent are derived.
    pub fn from_space(
        device: impl Into<String>,
        mountpoint: impl Into<String>,
        fs_type: Field<String>,
        total: u64,
        available: u64,
    ) -> Self {
        let used = total.saturating_sub(available);
        let usage_percent = if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        Self {
            device: device.into(),
            mountpoint: mountpoint.into(),
            fs_type,
            total_bytes: total,
            used_bytes: used,
            free_bytes: available,
            usage_percent,
        }
    }
}

/// OS identity facts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OsIdentity {
    pub os_name: Field<String>,
    pub os_version: Field<String>,
    pub architecture: Field<String>,
    pub hostname: Field<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuFacts {
    pub model: Field<String>,
    pub physical_cores: Field<usize>,
    pub logical_cores: Field<usize>,
    pub frequency_mhz: Field<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryFacts {
    pub total_bytes: Field<u64>,
    pub available_bytes: Field<u64>,
}

/// System collector output. With `error` set and everything else unavailable,
/// it is still a complete snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    pub os_name: Field<String>,
    pub os_version: Field<String>,
    pub architecture: Field<String>,
    pub hostname: Field<String>,
    pub cpu_model: Field<String>,
    pub physical_cores: Field<usize>,
    pub logical_cores: Field<usize>,
    pub cpu_frequency_mhz: Field<u64>,
    pub total_memory_bytes: Field<u64>,
    pub available_memory_bytes: Field<u64>,
    pub partitions: Vec<PartitionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SystemSnapshot {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, id: OsIdentity) -> Self {
        self.os_name = id.os_name;
        self.os_version = id.os_version;
        self.architecture = id.architecture;
        self.hostname = id.hostname;
        self
    }

    pub fn with_cpu(mut self, cpu: CpuFacts) -> Self {
        self.cpu_model = cpu.model;
        self.physical_cores = cpu.physical_cores;
        self.logical_cores = cpu.logical_cores;
        self.cpu_frequency_mhz = cpu.frequency_mhz;
        self
    }

    pub fn with_memory(mut self, mem: MemoryFacts) -> Self {
        self.total_memory_bytes = mem.total_bytes;
        self.available_memory_bytes = mem.available_bytes;
        self
    }
}
