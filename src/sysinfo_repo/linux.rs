// Linux-specific helpers: /proc/cpuinfo and /sys/class/net.

/// Read first "model name" from /proc/cpuinfo (Linux). Prefer over sysinfo when it returns "cpu0" etc.
pub(super) fn read_cpu_model_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        return parse_cpu_model(&content);
    }
    #[cfg(not(target_os = "linux"))]
    None
}

#[cfg(any(target_os = "linux", test))]
fn parse_cpu_model(cpuinfo: &str) -> Option<String> {
    let line = cpuinfo.lines().find(|l| l.starts_with("model name"))?;
    line.find(": ")
        .map(|i| line[i + 2..].trim())
        .filter(|s| !s.is_empty() && *s != "cpu0")
        .map(str::to_string)
}

#[cfg(target_os = "linux")]
fn read_net_attr(interface_name: &str, attr: &str) -> Option<String> {
    let path = format!("/sys/class/net/{}/{}", interface_name, attr);
    std::fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

/// Link speed in Mbps from /sys/class/net/<interface>/speed. Virtual links report -1.
pub(super) fn interface_speed_mbps(interface_name: &str) -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        let mbps = read_net_attr(interface_name, "speed")?.parse::<i64>().ok()?;
        return (mbps > 0).then_some(mbps as u64);
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        None
    }
}

pub(super) fn interface_mtu(interface_name: &str) -> Option<u32> {
    #[cfg(target_os = "linux")]
    {
        return read_net_attr(interface_name, "mtu")?.parse().ok();
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        None
    }
}

/// Administrative state (IFF_UP), falling back to operstate.
pub(super) fn interface_is_up(interface_name: &str) -> Option<bool> {
    #[cfg(target_os = "linux")]
    {
        if let Some(up) = read_net_attr(interface_name, "flags").and_then(|f| parse_iff_up(&f)) {
            return Some(up);
        }
        return read_net_attr(interface_name, "operstate").map(|s| s == "up" || s == "unknown");
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        None
    }
}

fn parse_iff_up(flags: &str) -> Option<bool> {
    let flags = u32::from_str_radix(flags.trim().trim_start_matches("0x"), 16).ok()?;
    Some(flags & 0x1 != 0)
}
