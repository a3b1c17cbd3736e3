// Library for the binary and integration tests

pub mod collectors;
pub mod config;
pub mod docker_repo;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod platform;
pub mod report;
pub mod sysinfo_repo;
pub mod version;
