// OS-specific dispatch for routing, DNS and firewall probing.

mod chain;
pub mod parsers;
mod probe;

pub use chain::{FallbackChain, Probe, ProbeFailure, ProbeSource};
pub use probe::{HostProbe, SystemProbe};

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::models::{DnsConfig, Field, RoutingTable};

/// Operating system families with their own probe tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Os {
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "linux" => Os::Linux,
            "macos" => Os::MacOs,
            "windows" => Os::Windows,
            _ => Os::Other,
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Os::Linux => f.write_str("linux"),
            Os::MacOs => f.write_str("macos"),
            Os::Windows => f.write_str("windows"),
            Os::Other => f.write_str("other"),
        }
    }
}

pub fn routing_chain(os: Os) -> FallbackChain<RoutingTable> {
    FallbackChain::new(match os {
        Os::Linux => vec![
            Probe::command("ip", &["route", "show"], parsers::parse_ip_route),
            Probe::command("netstat", &["-rn"], parsers::parse_netstat_routes),
        ],
        Os::MacOs => vec![Probe::command("netstat", &["-rn"], parsers::parse_netstat_routes)],
        Os::Windows => vec![Probe::command("route", &["print"], parsers::raw_routes)],
        Os::Other => vec![],
    })
}

pub fn dns_chain(os: Os) -> FallbackChain<DnsConfig> {
    FallbackChain::new(match os {
        Os::Linux => vec![Probe::file("/etc/resolv.conf", parsers::parse_resolv_conf)],
        Os::MacOs => vec![Probe::command("scutil", &["--dns"], parsers::parse_scutil_dns)],
        Os::Windows => vec![Probe::command("ipconfig", &["/all"], parsers::parse_ipconfig_all)],
        Os::Other => vec![],
    })
}

/// Higher-level manager first, then the packet-filter tools.
pub fn firewall_chain(os: Os) -> FallbackChain<String> {
    FallbackChain::new(match os {
        Os::Linux => vec![
            Probe::command("ufw", &["status", "numbered"], parsers::ufw_active_rules),
            Probe::command("iptables", &["-L", "-n"], parsers::non_blank),
            Probe::command("nft", &["list", "ruleset"], parsers::non_blank),
        ],
        Os::MacOs => vec![Probe::command("pfctl", &["-sr"], parsers::non_blank)],
        Os::Windows => vec![Probe::command(
            "netsh",
            &["advfirewall", "firewall", "show", "rule", "name=all"],
            parsers::non_blank,
        )],
        Os::Other => vec![],
    })
}

/// Description recorded when every firewall probe failed.
pub fn firewall_exhausted(tried: &[&str], failures: &[ProbeFailure]) -> String {
    let tried = tried.join(", ");
    if failures.iter().any(ProbeFailure::is_permission_denied) {
        format!("firewall rules require elevated privileges (tried {})", tried)
    } else {
        format!("no supported firewall tool found (tried {})", tried)
    }
}

/// OS identity plus the probe capability used to query it.
#[derive(Clone)]
pub struct Platform {
    os: Os,
    probe: Arc<dyn HostProbe>,
}

impl Platform {
    pub fn new(os: Os, probe: Arc<dyn HostProbe>) -> Self {
        Self { os, probe }
    }

    pub fn detect(probe: Arc<dyn HostProbe>) -> Self {
        Self::new(Os::current(), probe)
    }

    #[instrument(skip(self), fields(os = %self.os, operation = "routing_table"))]
    pub async fn routing_table(&self) -> RoutingTable {
        match routing_chain(self.os).evaluate(self.probe.as_ref()).await {
            Ok(table) => table,
            Err(failures) => {
                if !failures.is_empty() {
                    warn!(attempts = failures.len(), "routing table unavailable");
                }
                RoutingTable::default()
            }
        }
    }

    #[instrument(skip(self), fields(os = %self.os, operation = "dns_config"))]
    pub async fn dns_config(&self) -> DnsConfig {
        match dns_chain(self.os).evaluate(self.probe.as_ref()).await {
            Ok(dns) => dns,
            Err(failures) => {
                if !failures.is_empty() {
                    warn!(attempts = failures.len(), "DNS configuration unavailable");
                }
                DnsConfig::default()
            }
        }
    }

    #[instrument(skip(self), fields(os = %self.os, operation = "firewall_rules"))]
    pub async fn firewall_rules(&self) -> Field<String> {
        let chain = firewall_chain(self.os);
        if chain.is_empty() {
            return Field::Unavailable;
        }
        match chain.evaluate(self.probe.as_ref()).await {
            Ok(rules) => Field::Available(rules),
            Err(failures) => {
                debug!(attempts = failures.len(), "firewall chain exhausted");
                Field::Available(firewall_exhausted(&chain.source_names(), &failures))
            }
        }
    }
}
