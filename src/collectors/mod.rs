// Collectors: one category of host insight each, always returning a usable snapshot.

mod container;
mod network;
mod process;
mod system;

pub use container::{UnreachableRuntime, collect_containers};
pub use network::collect_network;
pub use process::collect_processes;
pub use system::collect_system;

use async_trait::async_trait;
use std::any::Any;

use crate::error::{RuntimeError, SourceError};
use crate::models::{
    ConnectionInfo, ContainerInfo, ContainerNetworkInfo, ContainerUsage, CpuFacts, InterfaceInfo,
    MemoryFacts, OsIdentity, PartitionInfo, ProcessInfo, VolumeInfo,
};

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Why a single entry was left out of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Gone between enumeration and detail read.
    Vanished,
    AccessDenied,
    Zombie,
    /// No usable data, e.g. a zero-capacity pseudo filesystem.
    Unreadable,
}

/// Blocking source of OS, CPU, memory and disk facts.
pub trait SystemSource: Send + Sync {
    fn identity(&self) -> Result<OsIdentity, SourceError>;
    fn cpu(&self) -> Result<CpuFacts, SourceError>;
    fn memory(&self) -> Result<MemoryFacts, SourceError>;
    fn partitions(&self) -> Result<Vec<Result<PartitionInfo, SkipReason>>, SourceError>;
}

/// Blocking source of interfaces and sockets.
pub trait NetworkSource: Send + Sync {
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>, SourceError>;
    fn connections(&self) -> Result<Vec<ConnectionInfo>, SourceError>;
}

pub type ProcessEntries<'a> = Box<dyn Iterator<Item = Result<ProcessInfo, SkipReason>> + Send + 'a>;

/// Blocking source of running processes.
pub trait ProcessSource: Send + Sync {
    /// Lazy sequence of processes; per-entry races surface as `Err(SkipReason)`.
    fn processes(&self) -> Result<ProcessEntries<'_>, SourceError>;
}

/// Local container runtime.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Ids of the running containers.
    async fn list_containers(&self) -> Result<Vec<String>, RuntimeError>;
    /// Metadata without usage; usage fields are left unavailable.
    async fn inspect_container(&self, id: &str) -> Result<ContainerInfo, RuntimeError>;
    /// One stats sample.
    async fn container_usage(&self, id: &str) -> Result<ContainerUsage, RuntimeError>;
    async fn list_networks(&self) -> Result<Vec<ContainerNetworkInfo>, RuntimeError>;
    async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, RuntimeError>;
}
