// Optional DockerRepo tests when Docker daemon is available

use host_insights::collectors::{ContainerRuntime, collect_containers};
use host_insights::docker_repo::DockerRepo;
use std::time::Duration;

#[tokio::test]
async fn docker_repo_collects_when_daemon_is_up() {
    let repo = match DockerRepo::connect(Duration::from_secs(10)) {
        Ok(r) => r,
        Err(_) => return, // Skip when Docker is not available (e.g. CI without Docker)
    };
    if repo.list_containers().await.is_err() {
        return; // Client built but no daemon listening
    }
    let snapshot = collect_containers(&repo).await;
    assert_eq!(snapshot.error, None);
    assert!(snapshot.networks.iter().all(|n| !n.id.is_empty()));
}
