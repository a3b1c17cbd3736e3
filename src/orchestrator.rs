// Run the selected collectors concurrently and assemble one HostReport.

use std::sync::Arc;

use crate::collectors::{
    ContainerRuntime, NetworkSource, ProcessSource, SystemSource, collect_containers,
    collect_network, collect_processes, collect_system,
};
use crate::models::{
    ContainerSnapshot, HostReport, NetworkSnapshot, ProcessSnapshot, SystemSnapshot,
};
use crate::platform::Platform;

/// Sources and capabilities injected into the collectors.
#[derive(Clone)]
pub struct CollectorDeps {
    pub system: Arc<dyn SystemSource>,
    pub network: Arc<dyn NetworkSource>,
    pub process: Arc<dyn ProcessSource>,
    pub runtime: Arc<dyn ContainerRuntime>,
    pub platform: Arc<Platform>,
}

/// Which collectors to run. Unselected ones contribute an empty snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub system: bool,
    pub network: bool,
    pub container: bool,
    pub process: bool,
}

impl Selection {
    pub fn all() -> Self {
        Self {
            system: true,
            network: true,
            container: true,
            process: true,
        }
    }

    pub fn none() -> Self {
        Self {
            system: false,
            network: false,
            container: false,
            process: false,
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

#[tracing::instrument(level = "debug", skip(deps))]
pub async fn gather(deps: &CollectorDeps, selection: Selection) -> HostReport {
    let (system, network, container, process) = tokio::join!(
        async {
            if selection.system {
                collect_system(deps.system.clone()).await
            } else {
                SystemSnapshot::default()
            }
        },
        async {
            if selection.network {
                collect_network(deps.network.clone(), &deps.platform).await
            } else {
                NetworkSnapshot::default()
            }
        },
        async {
            if selection.container {
                collect_containers(deps.runtime.as_ref()).await
            } else {
                ContainerSnapshot::default()
            }
        },
        async {
            if selection.process {
                collect_processes(deps.process.clone()).await
            } else {
                ProcessSnapshot::default()
            }
        },
    );
    HostReport {
        system,
        network,
        container,
        process,
    }
}
