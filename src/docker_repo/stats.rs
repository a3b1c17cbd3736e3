// Reduce a raw Docker stats sample to container usage.

use crate::models::ContainerUsage;
use bollard::models::ContainerStatsResponse;

/// CPU percent from the cpu/precpu deltas and memory usage in bytes.
/// Returns `None` when the sample is missing CPU or memory sections.
pub(crate) fn usage_from_stats(s: &ContainerStatsResponse) -> Option<ContainerUsage> {
    let cpu_stats = s.cpu_stats.as_ref()?;
    let precpu_stats = s.precpu_stats.as_ref()?;

    let cpu_usage = cpu_stats.cpu_usage.as_ref()?;
    let precpu_usage = precpu_stats.cpu_usage.as_ref()?;

    let cpu_delta =
        cpu_usage.total_usage.unwrap_or(0) as i64 - precpu_usage.total_usage.unwrap_or(0) as i64;
    let system_delta = cpu_stats.system_cpu_usage.unwrap_or(0) as i64
        - precpu_stats.system_cpu_usage.unwrap_or(0) as i64;
    let online = cpu_stats.online_cpus.unwrap_or(1) as f64;
    let cpu_percent = if system_delta > 0 && cpu_delta > 0 && online > 0.0 {
        (cpu_delta as f64 / system_delta as f64) * online * 100.0
    } else {
        0.0
    };

    let memory_bytes = s.memory_stats.as_ref().and_then(|m| m.usage)?;

    Some(ContainerUsage {
        cpu_percent,
        memory_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{ContainerCpuStats, ContainerCpuUsage, ContainerMemoryStats};

    fn minimal_cpu_stats(total_usage: u64, system_cpu_usage: u64) -> ContainerCpuStats {
        ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(total_usage),
                ..Default::default()
            }),
            system_cpu_usage: Some(system_cpu_usage),
            online_cpus: Some(2),
            throttling_data: None,
        }
    }

    fn memory(usage: u64) -> Option<ContainerMemoryStats> {
        Some(ContainerMemoryStats {
            usage: Some(usage),
            ..Default::default()
        })
    }

    #[test]
    fn usage_is_none_when_cpu_stats_missing() {
        let s = ContainerStatsResponse {
            cpu_stats: None,
            precpu_stats: Some(minimal_cpu_stats(0, 0)),
            memory_stats: memory(1),
            ..Default::default()
        };
        assert!(usage_from_stats(&s).is_none());
    }

    #[test]
    fn usage_is_none_when_memory_missing() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100, 1000)),
            precpu_stats: Some(minimal_cpu_stats(50, 500)),
            ..Default::default()
        };
        assert!(usage_from_stats(&s).is_none());
    }

    #[test]
    fn usage_computes_cpu_delta_and_memory() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100_000_000, 1_000_000_000)),
            precpu_stats: Some(minimal_cpu_stats(50_000_000, 500_000_000)),
            memory_stats: memory(256 * 1024 * 1024),
            ..Default::default()
        };
        let out = usage_from_stats(&s).unwrap();
        assert!((out.cpu_percent - 20.0).abs() < 0.01);
        assert_eq!(out.memory_bytes, 256 * 1024 * 1024);
    }

    #[test]
    fn zero_system_delta_is_zero_percent() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100, 500)),
            precpu_stats: Some(minimal_cpu_stats(50, 500)),
            memory_stats: memory(10),
            ..Default::default()
        };
        assert_eq!(usage_from_stats(&s).unwrap().cpu_percent, 0.0);
    }
}
