// System collector: OS identity, CPU, memory and partitions as isolated steps.

use std::sync::Arc;
use tracing::{debug, warn};

use super::SystemSource;
use crate::models::{PartitionInfo, SystemSnapshot};

pub async fn collect_system(source: Arc<dyn SystemSource>) -> SystemSnapshot {
    match tokio::task::spawn_blocking(move || snapshot_from(source.as_ref())).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, operation = "collect_system", "system collection aborted");
            SystemSnapshot::failed(format!("Error collecting system information: {}", e))
        }
    }
}

fn snapshot_from(source: &dyn SystemSource) -> SystemSnapshot {
    let mut snapshot = SystemSnapshot::default();

    match source.identity() {
        Ok(id) => snapshot = snapshot.with_identity(id),
        Err(e) => warn!(error = %e, operation = "identity", "OS identity unavailable"),
    }
    match source.cpu() {
        Ok(cpu) => snapshot = snapshot.with_cpu(cpu),
        Err(e) => warn!(error = %e, operation = "cpu", "CPU facts unavailable"),
    }
    match source.memory() {
        Ok(mem) => snapshot = snapshot.with_memory(mem),
        Err(e) => warn!(error = %e, operation = "memory", "memory facts unavailable"),
    }
    match source.partitions() {
        Ok(entries) => snapshot.partitions = keep_readable(entries),
        Err(e) => warn!(error = %e, operation = "partitions", "partitions unavailable"),
    }
    snapshot
}

fn keep_readable(
    entries: Vec<Result<PartitionInfo, super::SkipReason>>,
) -> Vec<PartitionInfo> {
    let mut partitions: Vec<PartitionInfo> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(p) => Some(p),
            Err(reason) => {
                debug!(?reason, "partition skipped");
                None
            }
        })
        .collect();
    partitions.sort_by(|a, b| a.mountpoint.cmp(&b.mountpoint));
    partitions
}
