// Render the four snapshots as one ordered, AI-ready text report.

use anyhow::Context;
use std::path::Path;

use crate::models::*;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Rendering switches that are not part of the snapshot data.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Render container environment variables. They often carry secrets.
    pub include_env: bool,
}

pub fn format_report(
    system: &SystemSnapshot,
    network: &NetworkSnapshot,
    container: &ContainerSnapshot,
    process: &ProcessSnapshot,
) -> String {
    format_report_with(system, network, container, process, &ReportOptions::default())
}

pub fn format_report_with(
    system: &SystemSnapshot,
    network: &NetworkSnapshot,
    container: &ContainerSnapshot,
    process: &ProcessSnapshot,
    options: &ReportOptions,
) -> String {
    let mut out = Report::default();
    header(&mut out);
    system_section(&mut out, system);
    network_section(&mut out, network);
    if !container.is_empty() {
        container_section(&mut out, container, options);
    }
    if !process.is_empty() {
        process_section(&mut out, process);
    }
    out.line("### END OF REPORT ###");
    out.line(
        "Please ensure that all suggestions are verified and are in line with the latest \
         security best practices. Be prepared to provide further assistance and clarification \
         as needed.",
    );
    out.finish()
}

/// Write the report, creating parent directories as needed.
pub fn write_report_to_file(text: &str, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = text.len(), "report written");
    Ok(())
}

#[derive(Default)]
struct Report {
    lines: Vec<String>,
}

impl Report {
    fn line(&mut self, s: impl Into<String>) {
        self.lines.push(s.into());
    }

    fn item(&mut self, label: &str, value: impl std::fmt::Display) {
        self.lines.push(format!("- {}: {}", label, value));
    }

    fn sub(&mut self, label: &str, value: impl std::fmt::Display) {
        self.lines.push(format!("  - {}: {}", label, value));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn guidance(&mut self, text: &str) {
        self.line(text);
        self.blank();
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

fn header(out: &mut Report) {
    out.line("### AI SYSTEM INSIGHTS REPORT ###");
    out.line(
        "This report provides a detailed overview of the current system's state. Your task is \
         to use this information to assist with any queries or issues related to the system. \
         Please keep the following in mind:",
    );
    for directive in [
        "Be proactive in identifying potential issues or optimizations based on the data provided.",
        "Always search the web for additional, up-to-date information if needed to ensure that the advice provided is accurate and current.",
        "Ensure all recommendations adhere to the latest security best practices and are tailored to the specific configurations of this system.",
        "Verify the correctness of all information before making suggestions or changes.",
        "Offer specific suggestions and advice on how to address any concerns that might arise from the system's current state.",
        "Be prepared to answer follow-up questions with additional details or clarifications as needed.",
    ] {
        out.line(format!("- {}", directive));
    }
    out.blank();
}

fn gib(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / GIB)
}

fn system_section(out: &mut Report, s: &SystemSnapshot) {
    out.line("### Section 1: System Information ###");
    out.line("The following data provides an overview of the system's hardware and operating system:");
    if let Some(error) = &s.error {
        out.item("Collection Error", error);
    }
    out.item("Operating System", &s.os_name);
    out.item("OS Version", &s.os_version);
    out.item("Architecture", &s.architecture);
    out.item("Hostname", &s.hostname);
    out.item("CPU", &s.cpu_model);
    out.item("Physical Cores", &s.physical_cores);
    out.item("Logical Cores", &s.logical_cores);
    out.item("CPU Frequency", s.cpu_frequency_mhz.render(|f| format!("{} MHz", f)));
    out.item("Memory", s.total_memory_bytes.render(|b| gib(*b)));
    out.item("Available Memory", s.available_memory_bytes.render(|b| gib(*b)));
    if s.partitions.is_empty() {
        out.item("Disk", NOT_AVAILABLE);
    } else {
        out.line("- Disk:");
        for p in &s.partitions {
            out.sub(
                &p.mountpoint,
                format!(
                    "{} used of {} ({:.1}%), device {}, filesystem {}",
                    gib(p.used_bytes),
                    gib(p.total_bytes),
                    p.usage_percent,
                    p.device,
                    p.fs_type
                ),
            );
        }
    }
    out.blank();
    out.guidance(
        "Review this information to ensure the system is running optimally. If any \
         configurations seem suboptimal, provide recommendations.",
    );
}

fn network_section(out: &mut Report, n: &NetworkSnapshot) {
    out.line("### Section 2: Network Information ###");
    out.line(
        "Details regarding network interfaces, routing, active connections, DNS configuration, \
         and firewall rules:",
    );
    if let Some(error) = &n.error {
        out.item("Collection Error", error);
    }

    out.line("#### 2.1 Network Interfaces ####");
    if n.interfaces.is_empty() {
        out.line(format!("- {}", NOT_AVAILABLE));
        out.blank();
    }
    for iface in &n.interfaces {
        out.item("Interface", &iface.name);
        out.sub("Status", &iface.status);
        out.sub("IPv4 Address", &iface.ipv4);
        out.sub("IPv6 Address", &iface.ipv6);
        out.sub("MAC Address", &iface.mac);
        out.sub("Netmask", &iface.netmask);
        out.sub("Broadcast", &iface.broadcast);
        out.sub("MTU", &iface.mtu);
        out.sub("Speed", iface.speed_mbps.render(|s| format!("{} Mbps", s)));
        out.blank();
    }
    out.guidance(
        "Check the status and configurations of the network interfaces. Provide guidance if \
         any interfaces are down or misconfigured.",
    );

    out.line("#### 2.2 Routing Table ####");
    routing(out, &n.routing_table);
    out.guidance(
        "Analyze the routing table for any potential misconfigurations or routes that might \
         affect network performance. Offer insights on improving routing efficiency.",
    );

    out.line("#### 2.3 Active Connections ####");
    if n.active_connections.is_empty() {
        out.line(format!("- {}", NOT_AVAILABLE));
        out.blank();
    }
    for conn in &n.active_connections {
        out.item("Protocol", conn.protocol);
        out.sub("Local Address", &conn.local_address);
        out.sub("Remote Address", &conn.remote_address);
        out.sub("Status", &conn.status);
        out.sub(
            "Associated Process",
            format!("{} (PID: {})", conn.process_name, conn.pid),
        );
        out.blank();
    }
    out.guidance(
        "Review active connections to ensure there are no unauthorized or suspicious \
         activities. Provide advice on securing network traffic where necessary.",
    );

    out.line("#### 2.4 DNS Configuration ####");
    out.item("Primary DNS", &n.dns.primary);
    out.item("Secondary DNS", &n.dns.secondary);
    out.item("Search Domains", join_or_na(&n.dns.search_domains, ", "));
    out.blank();
    out.guidance(
        "Evaluate the DNS settings. Suggest improvements if the current configuration might \
         cause resolution delays or other issues.",
    );

    out.line("#### 2.5 Firewall Rules ####");
    out.line(n.firewall_rules.render(|r| r.trim_end().to_string()));
    out.blank();
    out.guidance(
        "Check the firewall rules for any gaps in security. Recommend changes to tighten \
         security if necessary.",
    );
}

fn routing(out: &mut Report, table: &RoutingTable) {
    if !table.entries.is_empty() {
        for route in &table.entries {
            out.item("Destination", &route.destination);
            out.sub("Gateway", &route.gateway);
            out.sub("Interface", &route.interface);
            out.sub("Netmask", &route.netmask);
            out.sub("Flags", &route.flags);
            out.sub("Metric", &route.metric);
            out.blank();
        }
        return;
    }
    match &table.raw {
        Field::Available(raw) => out.line(raw.trim_end()),
        Field::Unavailable => out.line(format!("- {}", NOT_AVAILABLE)),
    }
    out.blank();
}

fn container_section(out: &mut Report, c: &ContainerSnapshot, options: &ReportOptions) {
    out.line("### Section 3: Docker Information ###");
    out.line("Information about Docker containers, networks, and volumes on the system:");
    if let Some(error) = &c.error {
        out.item("Collection Error", error);
    }

    out.line("#### 3.1 Containers ####");
    if c.containers.is_empty() {
        out.line(format!("- {}", NOT_AVAILABLE));
        out.blank();
    }
    for container in &c.containers {
        out.item("Container Name", &container.name);
        out.sub("Image", join_or_na(&container.image_tags, ", "));
        out.sub("Status", &container.status);
        out.sub(
            "Ports",
            join_or_na(container.ports.iter().map(|p| p.to_string()), ", "),
        );
        out.sub("CPU Usage", container.cpu_percent.render(|p| format!("{:.2}%", p)));
        out.sub(
            "Memory Usage",
            container.memory_usage_bytes.render(|b| format!("{} bytes", b)),
        );
        out.sub("Health Status", &container.health_status);
        out.sub("Restart Policy", &container.restart_policy);
        out.sub(
            "Mounts",
            join_or_na(container.mounts.iter().map(|m| m.to_string()), ", "),
        );
        out.sub(
            "Networks",
            join_or_na(container.networks.iter().map(|n| n.to_string()), ", "),
        );
        if options.include_env {
            out.sub("Environment", join_or_na(&container.env, ", "));
        }
        out.blank();
    }
    out.guidance(
        "Examine the state of Docker containers. If any containers are underperforming or \
         experiencing issues, suggest troubleshooting steps or optimizations.",
    );

    out.line("#### 3.2 Networks ####");
    if c.networks.is_empty() {
        out.line(format!("- {}", NOT_AVAILABLE));
        out.blank();
    }
    for network in &c.networks {
        out.item("Network Name", &network.name);
        out.sub("ID", &network.id);
        out.sub("Driver", &network.driver);
        out.sub("Subnet", &network.subnet);
        out.sub("Gateway", &network.gateway);
        out.sub("Connected Containers", join_or_na(&network.containers, ", "));
        out.blank();
    }
    out.guidance(
        "Assess the Docker network configurations. Provide recommendations if there are any \
         security or performance concerns.",
    );

    out.line("#### 3.3 Volumes ####");
    if c.volumes.is_empty() {
        out.line(format!("- {}", NOT_AVAILABLE));
        out.blank();
    }
    for volume in &c.volumes {
        out.item("Volume Name", &volume.name);
        out.sub("Mountpoint", &volume.mountpoint);
        out.sub("Driver", &volume.driver);
        out.sub(
            "Labels",
            join_or_na(volume.labels.iter().map(|(k, v)| format!("{}={}", k, v)), ", "),
        );
        out.blank();
    }
    out.guidance(
        "Review Docker volumes. If there are storage or access issues, offer potential solutions.",
    );
}

fn process_section(out: &mut Report, p: &ProcessSnapshot) {
    out.line("### Section 4: Running Services ###");
    out.line("The following services are currently running on the system:");
    for process in &p.processes {
        out.item("Service Name", format!("{} (PID: {})", process.name, process.pid));
        out.sub("Status", &process.status);
        out.sub("Start Time", process.start_time.render(|t| utc_timestamp(*t)));
        out.sub("Memory Usage", format!("{} bytes", process.memory_rss_bytes));
        out.sub("CPU Usage", format!("{:.1}%", process.cpu_percent));
        out.blank();
    }
    out.guidance(
        "Ensure that all critical services are running as expected. If any services are \
         misbehaving or consuming excessive resources, suggest corrective actions.",
    );
}

fn utc_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
