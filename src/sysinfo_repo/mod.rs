// Host facts via sysinfo and netstat2

mod linux;

use netstat2::{AddressFamilyFlags, ProtocolFlags, ProtocolSocketInfo, get_sockets_info};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;
use sysinfo::{Disks, Networks, Pid, ProcessStatus, ProcessesToUpdate, System};
use tracing::{debug, instrument};

use crate::collectors::{NetworkSource, ProcessEntries, ProcessSource, SkipReason, SystemSource};
use crate::error::SourceError;
use crate::models::*;
use crate::platform::parsers::prefix_to_netmask;

pub struct SysinfoRepo {
    sys: Mutex<System>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
    cpu_sample: Duration,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)
    }
}

impl SysinfoRepo {
    /// `cpu_sample` is the window process CPU usage is measured over.
    pub fn new(cpu_sample: Duration) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Mutex::new(sys),
            disks: Mutex::new(disks),
            networks: Mutex::new(networks),
            cpu_sample: cpu_sample.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    fn lock_sys(&self) -> Result<std::sync::MutexGuard<'_, System>, SourceError> {
        self.sys.lock().map_err(|_| SourceError::Lock("sysinfo"))
    }
}

impl SystemSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "identity"))]
    fn identity(&self) -> Result<OsIdentity, SourceError> {
        Ok(OsIdentity {
            os_name: System::name().map(Field::non_empty).unwrap_or_default(),
            os_version: System::os_version().map(Field::non_empty).unwrap_or_default(),
            architecture: Field::non_empty(std::env::consts::ARCH),
            hostname: System::host_name().map(Field::non_empty).unwrap_or_default(),
        })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu"))]
    fn cpu(&self) -> Result<CpuFacts, SourceError> {
        let mut sys = self.lock_sys()?;
        sys.refresh_cpu_all();
        let model = linux::read_cpu_model_linux().or_else(|| {
            sys.cpus()
                .first()
                .map(|c| c.brand().trim().to_string())
                .filter(|s| !s.is_empty() && s != "cpu0")
        });
        let logical = sys.cpus().len();
        let frequency = sys.cpus().first().map(|c| c.frequency()).filter(|f| *f > 0);
        Ok(CpuFacts {
            model: model.into(),
            physical_cores: System::physical_core_count().filter(|n| *n > 0).into(),
            logical_cores: (logical > 0).then_some(logical).into(),
            frequency_mhz: frequency.into(),
        })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "memory"))]
    fn memory(&self) -> Result<MemoryFacts, SourceError> {
        let mut sys = self.lock_sys()?;
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(SourceError::Unavailable {
                what: "memory",
                reason: "total memory reported as zero".into(),
            });
        }
        Ok(MemoryFacts {
            total_bytes: Field::Available(total),
            available_bytes: Field::Available(sys.available_memory()),
        })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "partitions"))]
    fn partitions(&self) -> Result<Vec<Result<PartitionInfo, SkipReason>>, SourceError> {
        let mut disks = self
            .disks
            .lock()
            .map_err(|_| SourceError::Lock("sysinfo disks"))?;
        disks.refresh(false);
        Ok(disks
            .list()
            .iter()
            .map(|d| {
                let total = d.total_space();
                if total == 0 {
                    return Err(SkipReason::Unreadable);
                }
                Ok(PartitionInfo::from_space(
                    d.name().to_string_lossy(),
                    d.mount_point().to_string_lossy(),
                    Field::non_empty(d.file_system().to_string_lossy()),
                    total,
                    d.available_space(),
                ))
            })
            .collect())
    }
}

impl NetworkSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "interfaces"))]
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>, SourceError> {
        let mut networks = self
            .networks
            .lock()
            .map_err(|_| SourceError::Lock("sysinfo networks"))?;
        networks.refresh(true);
        Ok(networks
            .list()
            .iter()
            .map(|(name, data)| {
                let v4 = data.ip_networks().iter().find_map(|n| match n.addr {
                    IpAddr::V4(a) => Some((a, n.prefix)),
                    IpAddr::V6(_) => None,
                });
                let v6 = data.ip_networks().iter().find(|n| n.addr.is_ipv6());
                let mac = data.mac_address().to_string();
                let mask = v4.map(|(_, prefix)| prefix_to_netmask(prefix));
                InterfaceInfo {
                    name: name.clone(),
                    status: linux::interface_is_up(name)
                        .map(|up| if up { LinkStatus::Up } else { LinkStatus::Down })
                        .into(),
                    ipv4: v4.map(|(a, _)| a.to_string()).into(),
                    ipv6: v6.map(|n| n.addr.to_string()).into(),
                    mac: if mac == "00:00:00:00:00:00" {
                        Field::Unavailable
                    } else {
                        Field::non_empty(mac)
                    },
                    netmask: mask.map(|m| m.to_string()).into(),
                    broadcast: v4
                        .zip(mask)
                        .filter(|(_, m)| *m != Ipv4Addr::BROADCAST)
                        .map(|((a, _), m)| broadcast_of(a, m).to_string())
                        .into(),
                    mtu: linux::interface_mtu(name).into(),
                    speed_mbps: linux::interface_speed_mbps(name).into(),
                }
            })
            .collect())
    }

    #[instrument(skip(self), fields(repo = "netstat2", operation = "connections"))]
    fn connections(&self) -> Result<Vec<ConnectionInfo>, SourceError> {
        let sockets = get_sockets_info(
            AddressFamilyFlags::IPV4 | AddressFamilyFlags::IPV6,
            ProtocolFlags::TCP | ProtocolFlags::UDP,
        )
        .map_err(|e| SourceError::Unavailable {
            what: "sockets",
            reason: e.to_string(),
        })?;

        let pids: Vec<Pid> = sockets
            .iter()
            .filter_map(|s| s.associated_pids.first())
            .map(|pid| Pid::from_u32(*pid))
            .collect();
        let mut sys = self.lock_sys()?;
        sys.refresh_processes(ProcessesToUpdate::Some(&pids), true);

        Ok(sockets
            .into_iter()
            .map(|socket| {
                let pid = socket.associated_pids.first().copied();
                let process_name = pid
                    .and_then(|pid| sys.process(Pid::from_u32(pid)))
                    .map(|p| p.name().to_string_lossy().into_owned());
                let (protocol, local_address, remote_address, status) =
                    match socket.protocol_socket_info {
                        ProtocolSocketInfo::Tcp(tcp) => (
                            Protocol::Tcp,
                            SocketAddr::new(tcp.local_addr, tcp.local_port).to_string(),
                            remote_endpoint(tcp.remote_addr, tcp.remote_port),
                            screaming_snake(&format!("{:?}", tcp.state)),
                        ),
                        ProtocolSocketInfo::Udp(udp) => (
                            Protocol::Udp,
                            SocketAddr::new(udp.local_addr, udp.local_port).to_string(),
                            Field::Unavailable,
                            "NONE".to_string(),
                        ),
                    };
                ConnectionInfo {
                    protocol,
                    local_address,
                    remote_address,
                    status,
                    pid: pid.into(),
                    process_name: process_name.into(),
                }
            })
            .collect())
    }
}

impl ProcessSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "processes"))]
    fn processes(&self) -> Result<ProcessEntries<'_>, SourceError> {
        let enumerated: Vec<Pid> = {
            let mut sys = self.lock_sys()?;
            sys.refresh_processes(ProcessesToUpdate::All, true);
            sys.processes().keys().copied().collect()
        };
        std::thread::sleep(self.cpu_sample);

        let mut sys = self.lock_sys()?;
        sys.refresh_processes(ProcessesToUpdate::All, true);
        let entries: Vec<Result<ProcessInfo, SkipReason>> = enumerated
            .into_iter()
            .map(|pid| {
                let Some(p) = sys.process(pid) else {
                    return Err(SkipReason::Vanished);
                };
                match p.status() {
                    ProcessStatus::Zombie => return Err(SkipReason::Zombie),
                    ProcessStatus::Dead => return Err(SkipReason::Vanished),
                    _ => {}
                }
                let start = p.start_time();
                Ok(ProcessInfo {
                    pid: pid.as_u32(),
                    name: p.name().to_string_lossy().into_owned(),
                    status: p.status().to_string().to_lowercase(),
                    start_time: (start > 0).then_some(start).into(),
                    memory_rss_bytes: p.memory(),
                    cpu_percent: p.cpu_usage() as f64,
                })
            })
            .collect();
        debug!(count = entries.len(), "processes enumerated");
        Ok(Box::new(entries.into_iter()))
    }
}

fn broadcast_of(addr: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(addr) | !u32::from(mask))
}

/// Listening sockets have no peer.
fn remote_endpoint(addr: IpAddr, port: u16) -> Field<String> {
    if addr.is_unspecified() && port == 0 {
        Field::Unavailable
    } else {
        Field::Available(SocketAddr::new(addr, port).to_string())
    }
}

/// `FinWait1` -> `FIN_WAIT1`.
fn screaming_snake(state: &str) -> String {
    let mut out = String::with_capacity(state.len() + 4);
    for (i, ch) in state.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}
