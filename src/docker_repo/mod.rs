// Container runtime access via bollard

mod stats;

use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    InspectContainerOptions, ListContainersOptions, ListNetworksOptions, ListVolumesOptions,
    StatsOptions,
};
use futures_util::StreamExt;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tracing::instrument;

use crate::collectors::ContainerRuntime;
use crate::error::RuntimeError;
use crate::models::*;

pub struct DockerRepo {
    docker: Docker,
    timeout: Duration,
}

impl DockerRepo {
    /// Build a client for the local daemon. Nothing is sent until the first call.
    pub fn connect(timeout: Duration) -> anyhow::Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker, timeout })
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, bollard::errors::Error>>,
    ) -> Result<T, RuntimeError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(RuntimeError::from),
            Err(_) => Err(RuntimeError::Timeout {
                operation,
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }

    async fn image_tags(&self, image: &str) -> Vec<String> {
        match self.bounded("inspect_image", self.docker.inspect_image(image)).await {
            Ok(inspect) => inspect.repo_tags.unwrap_or_default(),
            Err(e) => {
                tracing::debug!(image, error = %e, "image tags unavailable");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ContainerRuntime for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    async fn list_containers(&self) -> Result<Vec<String>, RuntimeError> {
        let options = ListContainersOptions {
            all: false,
            ..Default::default()
        };
        let containers = self
            .bounded("list_containers", self.docker.list_containers(Some(options)))
            .await?;
        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "inspect_container"))]
    async fn inspect_container(&self, id: &str) -> Result<ContainerInfo, RuntimeError> {
        let inspect = self
            .bounded(
                "inspect_container",
                self.docker
                    .inspect_container(id, None::<InspectContainerOptions>),
            )
            .await?;

        let config = inspect.config.unwrap_or_default();
        let image_tags = match inspect.image.as_deref() {
            Some(image) => self.image_tags(image).await,
            None => Vec::new(),
        };
        let image_tags = if image_tags.is_empty() {
            config.image.clone().into_iter().collect()
        } else {
            image_tags
        };

        let state = inspect.state.unwrap_or_default();
        let health_status = state
            .health
            .and_then(|h| h.status)
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NO_HEALTH_CHECK.to_string());

        let restart_policy = inspect
            .host_config
            .and_then(|h| h.restart_policy)
            .and_then(|r| r.name)
            .map(|n| Field::non_empty(n.to_string()))
            .unwrap_or_default();

        let settings = inspect.network_settings.unwrap_or_default();
        let mut ports: Vec<PortMapping> = Vec::new();
        let port_map: BTreeMap<_, _> = settings.ports.unwrap_or_default().into_iter().collect();
        for (container_port, bindings) in port_map {
            match bindings.filter(|b| !b.is_empty()) {
                Some(bindings) => ports.extend(bindings.into_iter().map(|b| PortMapping {
                    container_port: container_port.clone(),
                    host_ip: b.host_ip.map(Field::non_empty).unwrap_or_default(),
                    host_port: b.host_port.map(Field::non_empty).unwrap_or_default(),
                })),
                None => ports.push(PortMapping {
                    container_port,
                    host_ip: Field::Unavailable,
                    host_port: Field::Unavailable,
                }),
            }
        }

        let mut networks: Vec<NetworkAttachment> = settings
            .networks
            .unwrap_or_default()
            .into_iter()
            .map(|(network, endpoint)| NetworkAttachment {
                network,
                ip_address: endpoint.ip_address.map(Field::non_empty).unwrap_or_default(),
            })
            .collect();
        networks.sort_by(|a, b| a.network.cmp(&b.network));

        let mounts = inspect
            .mounts
            .unwrap_or_default()
            .into_iter()
            .map(|m| MountInfo {
                source: m.source.map(Field::non_empty).unwrap_or_default(),
                destination: m.destination.unwrap_or_default(),
                mode: m.mode.map(Field::non_empty).unwrap_or_default(),
            })
            .collect();

        let name = inspect
            .name
            .map(|n| n.trim_start_matches('/').to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.to_string());

        Ok(ContainerInfo {
            id: inspect.id.unwrap_or_else(|| id.to_string()),
            name,
            image_tags,
            status: state
                .status
                .map(|s| Field::non_empty(s.to_string()))
                .unwrap_or_default(),
            ports,
            cpu_percent: Field::Unavailable,
            memory_usage_bytes: Field::Unavailable,
            env: config.env.unwrap_or_default(),
            health_status,
            restart_policy,
            mounts,
            networks,
        })
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "container_usage"))]
    async fn container_usage(&self, id: &str) -> Result<ContainerUsage, RuntimeError> {
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        let sample = self
            .bounded("stats", async { stream.next().await.transpose() })
            .await?
            .ok_or_else(|| RuntimeError::MalformedStats(id.to_string()))?;
        stats::usage_from_stats(&sample).ok_or_else(|| RuntimeError::MalformedStats(id.to_string()))
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_networks"))]
    async fn list_networks(&self) -> Result<Vec<ContainerNetworkInfo>, RuntimeError> {
        let networks = self
            .bounded(
                "list_networks",
                self.docker.list_networks(None::<ListNetworksOptions>),
            )
            .await?;
        Ok(networks
            .into_iter()
            .map(|n| {
                let ipam = n
                    .ipam
                    .and_then(|i| i.config)
                    .and_then(|c| c.into_iter().next());
                let mut containers: Vec<String> = n
                    .containers
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(cid, c)| c.name.filter(|s| !s.is_empty()).unwrap_or(cid))
                    .collect();
                containers.sort();
                let (subnet, gateway) = match ipam {
                    Some(cfg) => (
                        cfg.subnet.map(Field::non_empty).unwrap_or_default(),
                        cfg.gateway.map(Field::non_empty).unwrap_or_default(),
                    ),
                    None => (Field::Unavailable, Field::Unavailable),
                };
                ContainerNetworkInfo {
                    name: n.name.unwrap_or_default(),
                    id: n.id.unwrap_or_default(),
                    driver: n.driver.map(Field::non_empty).unwrap_or_default(),
                    subnet,
                    gateway,
                    containers,
                }
            })
            .collect())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_volumes"))]
    async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, RuntimeError> {
        let response = self
            .bounded(
                "list_volumes",
                self.docker.list_volumes(None::<ListVolumesOptions>),
            )
            .await?;
        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| VolumeInfo {
                name: v.name,
                mountpoint: Field::non_empty(v.mountpoint),
                driver: Field::non_empty(v.driver),
                labels: v.labels.into_iter().collect(),
            })
            .collect())
    }
}
