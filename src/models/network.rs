// Network interface, routing, connection and DNS models

use serde::Serialize;

use super::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Up,
    Down,
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Up => f.write_str("up"),
            LinkStatus::Down => f.write_str("down"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub status: Field<LinkStatus>,
    pub ipv4: Field<String>,
    pub ipv6: Field<String>,
    pub mac: Field<String>,
    pub netmask: Field<String>,
    pub broadcast: Field<String>,
    pub mtu: Field<u32>,
    pub speed_mbps: Field<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub destination: String,
    pub gateway: Field<String>,
    pub interface: Field<String>,
    pub netmask: Field<String>,
    pub flags: Field<String>,
    pub metric: Field<u32>,
}

/// Routing table from the platform's routing tool: parsed entries plus the raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingTable {
    pub entries: Vec<RouteEntry>,
    pub raw: Field<String>,
}

impl RoutingTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && !self.raw.is_available()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Protocol {
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("TCP"),
            Protocol::Udp => f.write_str("UDP"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub protocol: Protocol,
    pub local_address: String,
    pub remote_address: Field<String>,
    pub status: String,
    pub pid: Field<u32>,
    pub process_name: Field<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
    pub primary: Field<String>,
    pub secondary: Field<String>,
    pub search_domains: Vec<String>,
}

impl DnsConfig {
    /// Build from nameservers in resolver order; duplicates are dropped.
    pub fn from_servers(servers: &[String], search_domains: Vec<String>) -> Self {
        let mut unique: Vec<&String> = Vec::with_capacity(servers.len());
        for s in servers {
            if !unique.contains(&s) {
                unique.push(s);
            }
        }
        Self {
            primary: unique.first().map(|s| s.to_string()).into(),
            secondary: unique.get(1).map(|s| s.to_string()).into(),
            search_domains,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.primary.is_available()
            && !self.secondary.is_available()
            && self.search_domains.is_empty()
    }
}

/// Network collector output. `error` never replaces data already gathered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    pub interfaces: Vec<InterfaceInfo>,
    pub routing_table: RoutingTable,
    pub active_connections: Vec<ConnectionInfo>,
    pub dns: DnsConfig,
    pub firewall_rules: Field<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NetworkSnapshot {
    /// Append to the error marker, keeping earlier messages.
    pub fn push_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.error = Some(match self.error.take() {
            Some(prev) => format!("{}; {}", prev, message),
            None => message,
        });
    }
}
