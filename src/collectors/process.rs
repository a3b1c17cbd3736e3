// Process collector: keep what can be read, count what vanished.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{ProcessSource, SkipReason};
use crate::models::ProcessSnapshot;

pub async fn collect_processes(source: Arc<dyn ProcessSource>) -> ProcessSnapshot {
    match tokio::task::spawn_blocking(move || scan(source.as_ref())).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, operation = "collect_processes", "process scan aborted");
            ProcessSnapshot::default()
        }
    }
}

fn scan(source: &dyn ProcessSource) -> ProcessSnapshot {
    let entries = match source.processes() {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, operation = "processes", "process enumeration failed");
            return ProcessSnapshot::default();
        }
    };

    let mut processes = Vec::new();
    let (mut vanished, mut denied, mut zombies) = (0usize, 0usize, 0usize);
    for entry in entries {
        match entry {
            Ok(p) => processes.push(p),
            Err(reason) => {
                debug!(?reason, "process skipped");
                match reason {
                    SkipReason::Vanished => vanished += 1,
                    SkipReason::AccessDenied | SkipReason::Unreadable => denied += 1,
                    SkipReason::Zombie => zombies += 1,
                }
            }
        }
    }
    processes.sort_by_key(|p| p.pid);
    info!(
        collected = processes.len(),
        vanished, denied, zombies, "process scan complete"
    );
    ProcessSnapshot { processes }
}
