// Docker container, network and volume models

use serde::Serialize;
use std::collections::BTreeMap;

use super::Field;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: String,
    pub host_ip: Field<String>,
    pub host_port: Field<String>,
}

impl std::fmt::Display for PortMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.host_ip, &self.host_port) {
            (Field::Available(ip), Field::Available(port)) => {
                write!(f, "{}:{}->{}", ip, port, self.container_port)
            }
            (Field::Unavailable, Field::Available(port)) => {
                write!(f, "{}->{}", port, self.container_port)
            }
            _ => f.write_str(&self.container_port),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountInfo {
    pub source: Field<String>,
    pub destination: String,
    pub mode: Field<String>,
}

impl std::fmt::Display for MountInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.destination)?;
        if let Field::Available(mode) = &self.mode {
            write!(f, " ({})", mode)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttachment {
    pub network: String,
    pub ip_address: Field<String>,
}

impl std::fmt::Display for NetworkAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.ip_address {
            Field::Available(ip) => write!(f, "{} ({})", self.network, ip),
            Field::Unavailable => f.write_str(&self.network),
        }
    }
}

/// Resource usage from one stats sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerUsage {
    pub cpu_percent: f64,
    pub memory_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub image_tags: Vec<String>,
    pub status: Field<String>,
    pub ports: Vec<PortMapping>,
    pub cpu_percent: Field<f64>,
    pub memory_usage_bytes: Field<u64>,
    pub env: Vec<String>,
    pub health_status: String,
    pub restart_policy: Field<String>,
    pub mounts: Vec<MountInfo>,
    pub networks: Vec<NetworkAttachment>,
}

impl ContainerInfo {
    pub fn with_usage(mut self, usage: Option<ContainerUsage>) -> Self {
        self.cpu_percent = usage.map(|u| u.cpu_percent).into();
        self.memory_usage_bytes = usage.map(|u| u.memory_bytes).into();
        self
    }
}

/// Health status text used when the image defines no health check.
pub const NO_HEALTH_CHECK: &str = "No health check";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerNetworkInfo {
    pub name: String,
    pub id: String,
    pub driver: Field<String>,
    pub subnet: Field<String>,
    pub gateway: Field<String>,
    pub containers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub name: String,
    pub mountpoint: Field<String>,
    pub driver: Field<String>,
    pub labels: BTreeMap<String, String>,
}

/// Container collector output. A runtime failure leaves all three lists empty
/// and sets `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    pub containers: Vec<ContainerInfo>,
    pub networks: Vec<ContainerNetworkInfo>,
    pub volumes: Vec<VolumeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContainerSnapshot {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// True when there is nothing to report, regardless of `error`.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.networks.is_empty() && self.volumes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_mapping_display() {
        let p = PortMapping {
            container_port: "80/tcp".into(),
            host_ip: Field::Available("0.0.0.0".into()),
            host_port: Field::Available("8080".into()),
        };
        assert_eq!(p.to_string(), "0.0.0.0:8080->80/tcp");
        let unpublished = PortMapping {
            container_port: "443/tcp".into(),
            host_ip: Field::Unavailable,
            host_port: Field::Unavailable,
        };
        assert_eq!(unpublished.to_string(), "443/tcp");
    }

    #[test]
    fn with_usage_none_degrades_both_fields() {
        let c = ContainerInfo {
            id: "abc".into(),
            name: "web".into(),
            image_tags: vec![],
            status: Field::Available("running".into()),
            ports: vec![],
            cpu_percent: Field::Available(1.0),
            memory_usage_bytes: Field::Available(1),
            env: vec![],
            health_status: NO_HEALTH_CHECK.into(),
            restart_policy: Field::Unavailable,
            mounts: vec![],
            networks: vec![],
        }
        .with_usage(None);
        assert_eq!(c.cpu_percent, Field::Unavailable);
        assert_eq!(c.memory_usage_bytes, Field::Unavailable);
    }

    #[test]
    fn failed_snapshot_is_empty() {
        let s = ContainerSnapshot::failed("daemon down");
        assert!(s.is_empty());
        assert_eq!(s.error.as_deref(), Some("daemon down"));
    }
}
