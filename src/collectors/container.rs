// Container collector: list, inspect, sample usage, then networks and volumes.

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::join_all;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, warn};

use super::{ContainerRuntime, panic_message};
use crate::error::RuntimeError;
use crate::models::{
    ContainerInfo, ContainerNetworkInfo, ContainerSnapshot, ContainerUsage, VolumeInfo,
};

pub async fn collect_containers(runtime: &dyn ContainerRuntime) -> ContainerSnapshot {
    let outcome = AssertUnwindSafe(try_collect(runtime))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(RuntimeError::Panicked(panic_message(&*payload))));
    match outcome {
        Ok(snapshot) => {
            info!(
                containers = snapshot.containers.len(),
                networks = snapshot.networks.len(),
                volumes = snapshot.volumes.len(),
                "container scan complete"
            );
            snapshot
        }
        Err(e) => {
            warn!(error = %e, operation = "collect_containers", "container runtime unavailable");
            ContainerSnapshot::failed(format!("Error collecting Docker information: {}", e))
        }
    }
}

async fn try_collect(runtime: &dyn ContainerRuntime) -> Result<ContainerSnapshot, RuntimeError> {
    let ids = runtime.list_containers().await?;

    let mut inspected = Vec::with_capacity(ids.len());
    for id in &ids {
        match runtime.inspect_container(id).await {
            Ok(info) => inspected.push(info),
            Err(e) => debug!(container = %id, error = %e, "container skipped"),
        }
    }

    let usages = join_all(inspected.iter().map(|c| runtime.container_usage(&c.id))).await;
    let mut containers: Vec<ContainerInfo> = inspected
        .into_iter()
        .zip(usages)
        .map(|(info, usage)| {
            let usage = usage
                .map_err(|e| debug!(container = %info.name, error = %e, "usage unavailable"))
                .ok();
            info.with_usage(usage)
        })
        .collect();
    containers.sort_by(|a, b| a.name.cmp(&b.name));

    let mut networks = runtime.list_networks().await?;
    networks.sort_by(|a, b| a.name.cmp(&b.name));
    let mut volumes = runtime.list_volumes().await?;
    volumes.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ContainerSnapshot {
        containers,
        networks,
        volumes,
        error: None,
    })
}

/// Runtime stand-in used when the client could not even be constructed.
pub struct UnreachableRuntime {
    reason: String,
}

impl UnreachableRuntime {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn err(&self) -> RuntimeError {
        RuntimeError::Unreachable(self.reason.clone())
    }
}

#[async_trait]
impl ContainerRuntime for UnreachableRuntime {
    async fn list_containers(&self) -> Result<Vec<String>, RuntimeError> {
        Err(self.err())
    }

    async fn inspect_container(&self, _id: &str) -> Result<ContainerInfo, RuntimeError> {
        Err(self.err())
    }

    async fn container_usage(&self, _id: &str) -> Result<ContainerUsage, RuntimeError> {
        Err(self.err())
    }

    async fn list_networks(&self) -> Result<Vec<ContainerNetworkInfo>, RuntimeError> {
        Err(self.err())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, RuntimeError> {
        Err(self.err())
    }
}
