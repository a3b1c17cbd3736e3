// Parsers for routing, DNS and firewall tool output.

use std::net::{IpAddr, Ipv4Addr};

use crate::models::{DnsConfig, Field, RouteEntry, RoutingTable};

/// IPv4 netmask for a prefix length (clamped to 32).
pub(crate) fn prefix_to_netmask(prefix: u8) -> Ipv4Addr {
    let prefix = prefix.min(32) as u32;
    let bits = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    };
    Ipv4Addr::from(bits)
}

const IP_ROUTE_TYPES: [&str; 9] = [
    "unicast",
    "local",
    "broadcast",
    "multicast",
    "throw",
    "unreachable",
    "prohibit",
    "blackhole",
    "nat",
];

const IP_ROUTE_KEYS: [&str; 12] = [
    "via", "dev", "metric", "proto", "scope", "src", "table", "mtu", "pref", "expires", "realm",
    "advmss",
];

fn netmask_for_destination(destination: &str) -> Field<String> {
    if destination == "default" {
        return Field::Available(Ipv4Addr::UNSPECIFIED.to_string());
    }
    match destination.split_once('/') {
        Some((addr, prefix)) => match (addr.parse::<Ipv4Addr>(), prefix.parse::<u8>()) {
            (Ok(_), Ok(p)) => Field::Available(prefix_to_netmask(p).to_string()),
            _ => Field::Unavailable,
        },
        None if destination.parse::<Ipv4Addr>().is_ok() => {
            Field::Available(Ipv4Addr::BROADCAST.to_string())
        }
        None => Field::Unavailable,
    }
}

fn parse_ip_route_line(line: &str) -> Option<RouteEntry> {
    let mut tokens = line.split_whitespace();
    let mut flags: Vec<String> = Vec::new();

    let mut first = tokens.next()?;
    if IP_ROUTE_TYPES.contains(&first) {
        flags.push(first.to_string());
        first = tokens.next()?;
    }

    let mut entry = RouteEntry {
        destination: first.to_string(),
        netmask: netmask_for_destination(first),
        ..Default::default()
    };

    while let Some(tok) = tokens.next() {
        if IP_ROUTE_KEYS.contains(&tok) {
            let Some(value) = tokens.next() else {
                flags.push(tok.to_string());
                break;
            };
            match tok {
                "via" => entry.gateway = Field::non_empty(value),
                "dev" => entry.interface = Field::non_empty(value),
                "metric" => entry.metric = value.parse().ok().into(),
                _ => flags.push(format!("{} {}", tok, value)),
            }
        } else {
            flags.push(tok.to_string());
        }
    }
    if !flags.is_empty() {
        entry.flags = Field::Available(flags.join(" "));
    }
    Some(entry)
}

/// Linux `ip route show`.
pub fn parse_ip_route(text: &str) -> Option<RoutingTable> {
    if text.trim().is_empty() {
        return None;
    }
    let entries = text
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with(char::is_whitespace))
        .filter_map(parse_ip_route_line)
        .collect();
    Some(RoutingTable {
        entries,
        raw: Field::Available(text.to_string()),
    })
}

/// `netstat -rn` on Linux and BSD/macOS: header-driven column mapping.
pub fn parse_netstat_routes(text: &str) -> Option<RoutingTable> {
    let mut entries = Vec::new();
    let mut columns: Option<Vec<String>> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.ends_with(':') {
            columns = None;
            continue;
        }
        if trimmed.starts_with("Destination") {
            columns = Some(
                trimmed
                    .split_whitespace()
                    .map(|c| c.to_lowercase())
                    .collect(),
            );
            continue;
        }
        let Some(cols) = columns.as_ref() else {
            continue;
        };
        let mut entry = RouteEntry::default();
        for (col, value) in cols.iter().zip(trimmed.split_whitespace()) {
            match col.as_str() {
                "destination" => entry.destination = value.to_string(),
                "gateway" => entry.gateway = Field::non_empty(value),
                "genmask" | "netmask" => entry.netmask = Field::non_empty(value),
                "flags" => entry.flags = Field::non_empty(value),
                "iface" | "netif" => entry.interface = Field::non_empty(value),
                "metric" => entry.metric = value.parse().ok().into(),
                _ => {}
            }
        }
        if !entry.destination.is_empty() {
            entries.push(entry);
        }
    }

    if entries.is_empty() {
        return None;
    }
    Some(RoutingTable {
        entries,
        raw: Field::Available(text.to_string()),
    })
}

/// Keep the tool output as raw text only (Windows `route print`).
pub fn raw_routes(text: &str) -> Option<RoutingTable> {
    if text.trim().is_empty() {
        return None;
    }
    Some(RoutingTable {
        entries: Vec::new(),
        raw: Field::Available(text.to_string()),
    })
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// `/etc/resolv.conf`. The last `search`/`domain` line wins, as in the resolver.
pub fn parse_resolv_conf(text: &str) -> Option<DnsConfig> {
    let mut servers = Vec::new();
    let mut search: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("nameserver") => {
                if let Some(server) = parts.next() {
                    servers.push(server.to_string());
                }
            }
            Some("search") | Some("domain") => {
                search = parts.map(str::to_string).collect();
            }
            _ => {}
        }
    }
    if servers.is_empty() && search.is_empty() {
        return None;
    }
    Some(DnsConfig::from_servers(&servers, search))
}

/// macOS `scutil --dns`.
pub fn parse_scutil_dns(text: &str) -> Option<DnsConfig> {
    let mut servers = Vec::new();
    let mut search = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once(" : ") else {
            continue;
        };
        let value = value.trim();
        if key.starts_with("nameserver") {
            servers.push(value.to_string());
        } else if key.starts_with("search domain") {
            push_unique(&mut search, value);
        }
    }
    if servers.is_empty() && search.is_empty() {
        return None;
    }
    Some(DnsConfig::from_servers(&servers, search))
}

#[derive(Clone, Copy, PartialEq)]
enum IpconfigKey {
    Servers,
    Search,
}

/// Windows `ipconfig /all`; handles values continued on the following lines.
pub fn parse_ipconfig_all(text: &str) -> Option<DnsConfig> {
    let mut servers = Vec::new();
    let mut search = Vec::new();
    let mut current: Option<IpconfigKey> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            current = None;
            continue;
        }
        let value = if let Some((key, value)) = line.split_once(" : ") {
            current = if key.contains("DNS Servers") {
                Some(IpconfigKey::Servers)
            } else if key.contains("DNS Suffix Search List") {
                Some(IpconfigKey::Search)
            } else {
                None
            };
            value.trim()
        } else {
            trimmed
        };
        match current {
            Some(IpconfigKey::Servers) => {
                if value.split('%').next().and_then(|v| v.parse::<IpAddr>().ok()).is_some() {
                    servers.push(value.to_string());
                }
            }
            Some(IpconfigKey::Search) => push_unique(&mut search, value),
            None => {}
        }
    }
    if servers.is_empty() && search.is_empty() {
        return None;
    }
    Some(DnsConfig::from_servers(&servers, search))
}

/// `ufw status numbered`: accepted only while ufw is active.
pub fn ufw_active_rules(text: &str) -> Option<String> {
    if text.contains("Status: active") {
        Some(text.to_string())
    } else {
        None
    }
}

/// Any non-blank output, verbatim.
pub fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
