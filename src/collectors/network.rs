// Network collector: five independent sub-collections joined into one snapshot.

use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::warn;

use super::{NetworkSource, panic_message};
use crate::error::SourceError;
use crate::models::{ConnectionInfo, InterfaceInfo, NetworkSnapshot};
use crate::platform::Platform;

pub async fn collect_network(source: Arc<dyn NetworkSource>, platform: &Platform) -> NetworkSnapshot {
    let iface_source = source.clone();
    let (interfaces, connections, routing_table, dns, firewall_rules) = tokio::join!(
        tokio::task::spawn_blocking(move || iface_source.interfaces()),
        tokio::task::spawn_blocking(move || source.connections()),
        guarded(platform.routing_table()),
        guarded(platform.dns_config()),
        guarded(platform.firewall_rules()),
    );

    let mut snapshot = NetworkSnapshot::default();
    let routing_table = settle(&mut snapshot, "routing", routing_table);
    let dns = settle(&mut snapshot, "dns", dns);
    let firewall_rules = settle(&mut snapshot, "firewall", firewall_rules);
    snapshot.routing_table = routing_table;
    snapshot.dns = dns;
    snapshot.firewall_rules = firewall_rules;

    match flatten(interfaces) {
        Ok(mut list) => {
            list.sort_by(|a: &InterfaceInfo, b| a.name.cmp(&b.name));
            snapshot.interfaces = list;
        }
        Err(e) => {
            warn!(error = %e, operation = "interfaces", "interface enumeration failed");
            snapshot.push_error(format!("interfaces: {}", e));
        }
    }
    match flatten(connections) {
        Ok(mut list) => {
            list.sort_by(|a: &ConnectionInfo, b| {
                (a.protocol, &a.local_address, a.remote_address.value())
                    .cmp(&(b.protocol, &b.local_address, b.remote_address.value()))
            });
            snapshot.active_connections = list;
        }
        Err(e) => {
            warn!(error = %e, operation = "connections", "connection enumeration failed");
            snapshot.push_error(format!("connections: {}", e));
        }
    }
    snapshot
}

/// Platform probes run inline, so a panicking probe is caught here.
async fn guarded<T>(probe: impl Future<Output = T>) -> Result<T, String> {
    AssertUnwindSafe(probe)
        .catch_unwind()
        .await
        .map_err(|payload| format!("probe panicked: {}", panic_message(&*payload)))
}

fn settle<T: Default>(snapshot: &mut NetworkSnapshot, part: &str, outcome: Result<T, String>) -> T {
    outcome.unwrap_or_else(|e| {
        warn!(error = %e, operation = part, "platform probe failed");
        snapshot.push_error(format!("{}: {}", part, e));
        T::default()
    })
}

fn flatten<T>(
    joined: Result<Result<T, SourceError>, tokio::task::JoinError>,
) -> Result<T, String> {
    match joined {
        Ok(inner) => inner.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}
