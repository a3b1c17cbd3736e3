// Snapshot models produced by the collectors

mod container;
mod field;
mod network;
mod process;
mod report;
mod system;

pub use container::{
    ContainerInfo, ContainerNetworkInfo, ContainerSnapshot, ContainerUsage, MountInfo,
    NO_HEALTH_CHECK, NetworkAttachment, PortMapping, VolumeInfo,
};
pub use field::{Field, NOT_AVAILABLE, join_or_na};
pub use network::{
    ConnectionInfo, DnsConfig, InterfaceInfo, LinkStatus, NetworkSnapshot, Protocol, RouteEntry,
    RoutingTable,
};
pub use process::{ProcessInfo, ProcessSnapshot};
pub use report::HostReport;
pub use system::{CpuFacts, MemoryFacts, OsIdentity, PartitionInfo, SystemSnapshot};
