// Aggregate of all four collector snapshots.

use serde::Serialize;

use super::{ContainerSnapshot, NetworkSnapshot, ProcessSnapshot, SystemSnapshot};

/// One host report: every snapshot is present even when a collector was
/// skipped or degraded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostReport {
    pub system: SystemSnapshot,
    pub network: NetworkSnapshot,
    pub container: ContainerSnapshot,
    pub process: ProcessSnapshot,
}
