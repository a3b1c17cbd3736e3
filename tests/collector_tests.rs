// Collector isolation: every collector returns a usable snapshot

mod common;

use common::*;
use host_insights::collectors::*;
use host_insights::models::*;
use host_insights::platform::{Os, Platform};
use std::sync::Arc;

#[tokio::test]
async fn system_steps_fail_independently() {
    let snapshot = collect_system(Arc::new(FakeSystemSource { fail_cpu: true })).await;
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.hostname, Field::Available("build-01".to_string()));
    assert_eq!(snapshot.cpu_model, Field::Unavailable);
    assert_eq!(snapshot.logical_cores, Field::Unavailable);
    assert!(snapshot.total_memory_bytes.is_available());
    // the unreadable partition is skipped, the rest sorted by mountpoint
    let mounts: Vec<_> = snapshot.partitions.iter().map(|p| p.mountpoint.as_str()).collect();
    assert_eq!(mounts, vec!["/", "/home"]);
    assert_eq!(snapshot.partitions[0].used_bytes, 75);
}

#[tokio::test]
async fn panicking_system_source_yields_failed_snapshot() {
    let snapshot = collect_system(Arc::new(PanickingSource)).await;
    assert!(snapshot.error.is_some());
    assert_eq!(snapshot.os_name, Field::Unavailable);
    assert!(snapshot.partitions.is_empty());
}

#[tokio::test]
async fn vanished_process_shrinks_sequence_by_one() {
    let all = FakeProcessSource {
        entries: vec![Ok(process(1, "init")), Ok(process(2, "kthreadd")), Ok(process(3, "worker"))],
    };
    let racing = FakeProcessSource {
        entries: vec![
            Ok(process(1, "init")),
            Err(SkipReason::Vanished),
            Ok(process(3, "worker")),
        ],
    };
    let full = collect_processes(Arc::new(all)).await;
    let raced = collect_processes(Arc::new(racing)).await;
    assert_eq!(full.processes.len(), 3);
    assert_eq!(raced.processes.len(), full.processes.len() - 1);
}

#[tokio::test]
async fn zombies_and_denied_are_skipped() {
    let source = FakeProcessSource {
        entries: vec![
            Ok(process(900, "cron")),
            Err(SkipReason::Zombie),
            Err(SkipReason::AccessDenied),
            Ok(process(12, "systemd-journal")),
        ],
    };
    let snapshot = collect_processes(Arc::new(source)).await;
    let pids: Vec<u32> = snapshot.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![12, 900]);
}

#[tokio::test]
async fn broken_process_table_is_empty() {
    assert!(collect_processes(Arc::new(BrokenProcessTable)).await.is_empty());
    assert!(collect_processes(Arc::new(PanickingSource)).await.is_empty());
}

#[tokio::test]
async fn dns_failure_keeps_interfaces_and_connections() {
    let probe = Arc::new(
        FakeProbe::new()
            .file("/etc/resolv.conf", Err(denied("/etc/resolv.conf")))
            .command("ip", Ok("default via 10.0.0.1 dev eth0\n")),
    );
    let platform = Platform::new(Os::Linux, probe);
    let snapshot = collect_network(
        Arc::new(FakeNetworkSource {
            fail_connections: false,
        }),
        &platform,
    )
    .await;

    assert!(snapshot.dns.is_empty());
    assert_eq!(snapshot.error, None);
    let names: Vec<_> = snapshot.interfaces.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["eth0", "wlan0"]);
    assert_eq!(snapshot.active_connections.len(), 2);
    assert_eq!(snapshot.active_connections[0].protocol, Protocol::Tcp);
    assert_eq!(snapshot.routing_table.entries.len(), 1);
}

#[tokio::test]
async fn connection_failure_sets_marker_without_dropping_interfaces() {
    let platform = Platform::new(Os::Linux, Arc::new(FakeProbe::new()));
    let snapshot = collect_network(
        Arc::new(FakeNetworkSource {
            fail_connections: true,
        }),
        &platform,
    )
    .await;
    assert_eq!(snapshot.interfaces.len(), 2);
    assert!(snapshot.active_connections.is_empty());
    let error = snapshot.error.unwrap();
    assert!(error.starts_with("connections: "), "{}", error);
}

#[tokio::test]
async fn panicking_network_source_is_recorded() {
    let platform = Platform::new(Os::Other, Arc::new(FakeProbe::new()));
    let snapshot = collect_network(Arc::new(PanickingSource), &platform).await;
    assert!(snapshot.interfaces.is_empty());
    let error = snapshot.error.unwrap();
    assert!(error.contains("interfaces: ") && error.contains("; connections: "));
    assert_eq!(snapshot.firewall_rules, Field::Unavailable);
}

#[tokio::test]
async fn container_usage_failure_degrades_only_usage() {
    let runtime = FakeRuntime {
        containers: vec![container("b2", "web"), container("a1", "db")],
        broken_stats: vec!["b2".into()],
        ..Default::default()
    };
    let snapshot = collect_containers(&runtime).await;
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.containers.len(), 2);

    let db = &snapshot.containers[0];
    assert_eq!(db.name, "db");
    assert_eq!(db.cpu_percent, Field::Available(12.5));
    assert_eq!(db.memory_usage_bytes, Field::Available(64 * 1024 * 1024));

    let web = &snapshot.containers[1];
    assert_eq!(web.cpu_percent, Field::Unavailable);
    assert_eq!(web.memory_usage_bytes, Field::Unavailable);
    assert_eq!(web.status, Field::Available("running".to_string()));
    assert_eq!(web.ports.len(), 1);
}

#[tokio::test]
async fn container_gone_before_inspect_is_skipped() {
    let runtime = FakeRuntime {
        containers: vec![container("a1", "db"), container("c3", "job")],
        gone: vec!["c3".into()],
        ..Default::default()
    };
    let snapshot = collect_containers(&runtime).await;
    assert_eq!(snapshot.containers.len(), 1);
    assert_eq!(snapshot.containers[0].name, "db");
}

#[tokio::test]
async fn unreachable_runtime_is_expected_not_fatal() {
    let snapshot = collect_containers(&UnreachableRuntime::new("no such file or directory")).await;
    assert!(snapshot.containers.is_empty());
    assert!(snapshot.networks.is_empty());
    assert!(snapshot.volumes.is_empty());
    assert!(
        snapshot
            .error
            .unwrap()
            .starts_with("Error collecting Docker information: ")
    );
}

#[tokio::test]
async fn panicking_runtime_yields_failed_snapshot() {
    let snapshot = collect_containers(&PanickingRuntime).await;
    assert!(snapshot.is_empty());
    let error = snapshot.error.unwrap();
    assert!(error.starts_with("Error collecting Docker information: "), "{}", error);
    assert!(error.contains("runtime client exploded"), "{}", error);
}

#[tokio::test]
async fn panicking_host_degrades_only_platform_fields() {
    let platform = Platform::new(Os::Linux, Arc::new(PanickingHost));
    let snapshot = collect_network(
        Arc::new(FakeNetworkSource {
            fail_connections: false,
        }),
        &platform,
    )
    .await;
    assert_eq!(snapshot.interfaces.len(), 2);
    assert!(snapshot.routing_table.is_empty());
    assert_eq!(snapshot.dns, DnsConfig::default());
    assert_eq!(snapshot.firewall_rules, Field::Unavailable);
    let error = snapshot.error.unwrap();
    assert!(error.contains("routing: probe panicked"), "{}", error);
    assert!(error.contains("dns: probe panicked"), "{}", error);
    assert!(error.contains("firewall: probe panicked"), "{}", error);
}
