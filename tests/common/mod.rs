// Shared test helpers: fake host probe, fake sources and fixture snapshots

#![allow(dead_code)]

use async_trait::async_trait;
use host_insights::collectors::*;
use host_insights::error::{CommandError, RuntimeError, SourceError};
use host_insights::models::*;
use std::collections::HashMap;
use std::sync::Mutex;

/// Host probe answering from fixed tables; anything unknown is "command not found".
#[derive(Default)]
pub struct FakeProbe {
    commands: HashMap<String, Result<String, CommandError>>,
    files: HashMap<String, Result<String, CommandError>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, program: &str, result: Result<&str, CommandError>) -> Self {
        self.commands
            .insert(program.to_string(), result.map(str::to_string));
        self
    }

    pub fn file(mut self, path: &str, result: Result<&str, CommandError>) -> Self {
        self.files.insert(path.to_string(), result.map(str::to_string));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl host_insights::platform::HostProbe for FakeProbe {
    async fn run_command(&self, program: &str, _args: &[&str]) -> Result<String, CommandError> {
        self.calls.lock().unwrap().push(program.to_string());
        self.commands
            .get(program)
            .cloned()
            .unwrap_or_else(|| Err(not_found(program)))
    }

    async fn read_file(&self, path: &str) -> Result<String, CommandError> {
        self.calls.lock().unwrap().push(path.to_string());
        self.files
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(not_found(path)))
    }
}

/// Host whose every command or file read panics.
pub struct PanickingHost;

#[async_trait]
impl host_insights::platform::HostProbe for PanickingHost {
    async fn run_command(&self, program: &str, _args: &[&str]) -> Result<String, CommandError> {
        panic!("probe exploded running {}", program)
    }

    async fn read_file(&self, path: &str) -> Result<String, CommandError> {
        panic!("probe exploded reading {}", path)
    }
}

pub fn not_found(program: &str) -> CommandError {
    CommandError::NotFound {
        program: program.to_string(),
    }
}

pub fn denied(program: &str) -> CommandError {
    CommandError::PermissionDenied {
        program: program.to_string(),
    }
}

pub struct FakeSystemSource {
    pub fail_cpu: bool,
}

impl SystemSource for FakeSystemSource {
    fn identity(&self) -> Result<OsIdentity, SourceError> {
        Ok(OsIdentity {
            os_name: Field::Available("Linux".into()),
            os_version: Field::Available("6.8.0".into()),
            architecture: Field::Available("x86_64".into()),
            hostname: Field::Available("build-01".into()),
        })
    }

    fn cpu(&self) -> Result<CpuFacts, SourceError> {
        if self.fail_cpu {
            return Err(SourceError::Unavailable {
                what: "cpu",
                reason: "no cpuinfo".into(),
            });
        }
        Ok(CpuFacts {
            model: Field::Available("Test CPU".into()),
            physical_cores: Field::Available(4),
            logical_cores: Field::Available(8),
            frequency_mhz: Field::Available(3200),
        })
    }

    fn memory(&self) -> Result<MemoryFacts, SourceError> {
        Ok(MemoryFacts {
            total_bytes: Field::Available(16 * 1024 * 1024 * 1024),
            available_bytes: Field::Available(8 * 1024 * 1024 * 1024),
        })
    }

    fn partitions(&self) -> Result<Vec<Result<PartitionInfo, SkipReason>>, SourceError> {
        Ok(vec![
            Ok(PartitionInfo::from_space(
                "/dev/sda2",
                "/home",
                Field::Available("ext4".into()),
                200,
                50,
            )),
            Err(SkipReason::Unreadable),
            Ok(PartitionInfo::from_space(
                "/dev/sda1",
                "/",
                Field::Available("ext4".into()),
                100,
                25,
            )),
        ])
    }
}

pub struct PanickingSource;

impl SystemSource for PanickingSource {
    fn identity(&self) -> Result<OsIdentity, SourceError> {
        panic!("identity probe crashed")
    }
    fn cpu(&self) -> Result<CpuFacts, SourceError> {
        panic!("cpu probe crashed")
    }
    fn memory(&self) -> Result<MemoryFacts, SourceError> {
        panic!("memory probe crashed")
    }
    fn partitions(&self) -> Result<Vec<Result<PartitionInfo, SkipReason>>, SourceError> {
        panic!("partition probe crashed")
    }
}

impl NetworkSource for PanickingSource {
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>, SourceError> {
        panic!("interface probe crashed")
    }
    fn connections(&self) -> Result<Vec<ConnectionInfo>, SourceError> {
        panic!("socket probe crashed")
    }
}

impl ProcessSource for PanickingSource {
    fn processes(&self) -> Result<ProcessEntries<'_>, SourceError> {
        panic!("process table crashed")
    }
}

pub struct FakeNetworkSource {
    pub fail_connections: bool,
}

impl NetworkSource for FakeNetworkSource {
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>, SourceError> {
        Ok(vec![interface("wlan0"), interface("eth0")])
    }

    fn connections(&self) -> Result<Vec<ConnectionInfo>, SourceError> {
        if self.fail_connections {
            return Err(SourceError::Unavailable {
                what: "sockets",
                reason: "netlink refused".into(),
            });
        }
        Ok(vec![
            connection(Protocol::Udp, "0.0.0.0:68", None),
            connection(Protocol::Tcp, "10.0.0.5:22", Some(811)),
        ])
    }
}

pub fn interface(name: &str) -> InterfaceInfo {
    InterfaceInfo {
        name: name.into(),
        status: Field::Available(LinkStatus::Up),
        ipv4: Field::Available("10.0.0.5".into()),
        mtu: Field::Available(1500),
        ..Default::default()
    }
}

pub fn connection(protocol: Protocol, local: &str, pid: Option<u32>) -> ConnectionInfo {
    ConnectionInfo {
        protocol,
        local_address: local.into(),
        remote_address: Field::Unavailable,
        status: if protocol == Protocol::Tcp {
            "LISTEN".into()
        } else {
            "NONE".into()
        },
        pid: pid.into(),
        process_name: pid.map(|_| "sshd".to_string()).into(),
    }
}

/// Process table where some entries race with exit.
pub struct FakeProcessSource {
    pub entries: Vec<Result<ProcessInfo, SkipReason>>,
}

impl ProcessSource for FakeProcessSource {
    fn processes(&self) -> Result<ProcessEntries<'_>, SourceError> {
        Ok(Box::new(self.entries.iter().cloned()))
    }
}

pub struct BrokenProcessTable;

impl ProcessSource for BrokenProcessTable {
    fn processes(&self) -> Result<ProcessEntries<'_>, SourceError> {
        Err(SourceError::Unavailable {
            what: "processes",
            reason: "/proc not mounted".into(),
        })
    }
}

pub fn process(pid: u32, name: &str) -> ProcessInfo {
    ProcessInfo {
        pid,
        name: name.into(),
        status: "sleeping".into(),
        start_time: Field::Available(1_700_000_000),
        memory_rss_bytes: 4096,
        cpu_percent: 0.5,
    }
}

/// Runtime with canned containers; `broken_stats` ids fail their usage sample,
/// `gone` ids fail inspection.
#[derive(Default)]
pub struct FakeRuntime {
    pub containers: Vec<ContainerInfo>,
    pub broken_stats: Vec<String>,
    pub gone: Vec<String>,
    pub networks: Vec<ContainerNetworkInfo>,
    pub volumes: Vec<VolumeInfo>,
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn list_containers(&self) -> Result<Vec<String>, RuntimeError> {
        Ok(self.containers.iter().map(|c| c.id.clone()).collect())
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerInfo, RuntimeError> {
        if self.gone.iter().any(|g| g == id) {
            return Err(RuntimeError::NotFound(id.to_string()));
        }
        self.containers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| RuntimeError::NotFound(id.to_string()))
    }

    async fn container_usage(&self, id: &str) -> Result<ContainerUsage, RuntimeError> {
        if self.broken_stats.iter().any(|b| b == id) {
            return Err(RuntimeError::MalformedStats(id.to_string()));
        }
        Ok(ContainerUsage {
            cpu_percent: 12.5,
            memory_bytes: 64 * 1024 * 1024,
        })
    }

    async fn list_networks(&self) -> Result<Vec<ContainerNetworkInfo>, RuntimeError> {
        Ok(self.networks.clone())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, RuntimeError> {
        Ok(self.volumes.clone())
    }
}

/// Runtime whose every call panics.
pub struct PanickingRuntime;

#[async_trait]
impl ContainerRuntime for PanickingRuntime {
    async fn list_containers(&self) -> Result<Vec<String>, RuntimeError> {
        panic!("runtime client exploded")
    }

    async fn inspect_container(&self, _id: &str) -> Result<ContainerInfo, RuntimeError> {
        panic!("runtime client exploded")
    }

    async fn container_usage(&self, _id: &str) -> Result<ContainerUsage, RuntimeError> {
        panic!("runtime client exploded")
    }

    async fn list_networks(&self) -> Result<Vec<ContainerNetworkInfo>, RuntimeError> {
        panic!("runtime client exploded")
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, RuntimeError> {
        panic!("runtime client exploded")
    }
}

pub fn container(id: &str, name: &str) -> ContainerInfo {
    ContainerInfo {
        id: id.into(),
        name: name.into(),
        image_tags: vec![format!("{}:latest", name)],
        status: Field::Available("running".into()),
        ports: vec![PortMapping {
            container_port: "80/tcp".into(),
            host_ip: Field::Available("0.0.0.0".into()),
            host_port: Field::Available("8080".into()),
        }],
        cpu_percent: Field::Unavailable,
        memory_usage_bytes: Field::Unavailable,
        env: vec!["API_TOKEN=secret".into()],
        health_status: NO_HEALTH_CHECK.into(),
        restart_policy: Field::Available("unless-stopped".into()),
        mounts: vec![],
        networks: vec![NetworkAttachment {
            network: "bridge".into(),
            ip_address: Field::Available("172.17.0.2".into()),
        }],
    }
}

pub fn populated_system() -> SystemSnapshot {
    SystemSnapshot {
        partitions: vec![PartitionInfo::from_space(
            "/dev/sda1",
            "/",
            Field::Available("ext4".into()),
            100 * 1024 * 1024 * 1024,
            40 * 1024 * 1024 * 1024,
        )],
        ..Default::default()
    }
    .with_identity(OsIdentity {
        os_name: Field::Available("Linux".into()),
        os_version: Field::Available("6.8.0".into()),
        architecture: Field::Available("x86_64".into()),
        hostname: Field::Available("build-01".into()),
    })
    .with_memory(MemoryFacts {
        total_bytes: Field::Available(16 * 1024 * 1024 * 1024),
        available_bytes: Field::Available(8 * 1024 * 1024 * 1024),
    })
}

pub fn network_without_dns() -> NetworkSnapshot {
    NetworkSnapshot {
        interfaces: vec![interface("eth0")],
        active_connections: vec![connection(Protocol::Tcp, "10.0.0.5:22", Some(811))],
        firewall_rules: Field::Available("Chain INPUT (policy ACCEPT)".into()),
        ..Default::default()
    }
}

pub fn three_processes() -> ProcessSnapshot {
    ProcessSnapshot {
        processes: vec![process(1, "init"), process(811, "sshd"), process(900, "cron")],
    }
}
