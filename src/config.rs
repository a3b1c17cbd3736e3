use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Looked up in the working directory when neither `--config` nor `CONFIG_FILE` is given.
pub const DEFAULT_CONFIG_FILE: &str = "host-insights.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub commands: CommandsConfig,
    pub docker: DockerConfig,
    pub processes: ProcessesConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Upper bound for each routing/DNS/firewall command.
    pub timeout_ms: u64,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    pub timeout_ms: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessesConfig {
    /// Window per-process CPU usage is measured over.
    pub cpu_sample_ms: u64,
}

impl Default for ProcessesConfig {
    fn default() -> Self {
        Self { cpu_sample_ms: 250 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub include_env: bool,
    pub output_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_env: false,
            output_path: PathBuf::from("host_insights_prompt.txt"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl AppConfig {
    /// `explicit` (from `--config`) wins, then `CONFIG_FILE`, then `host-insights.toml`
    /// if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var("CONFIG_FILE") {
                Ok(p) => Some(PathBuf::from(p)),
                Err(_) => {
                    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                    local.exists().then_some(local)
                }
            },
        };
        match path {
            Some(path) => {
                let s = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Self::load_from_str(&s)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.commands.timeout_ms > 0,
            "commands.timeout_ms must be > 0, got {}",
            self.commands.timeout_ms
        );
        anyhow::ensure!(
            self.docker.timeout_ms > 0,
            "docker.timeout_ms must be > 0, got {}",
            self.docker.timeout_ms
        );
        anyhow::ensure!(
            self.processes.cpu_sample_ms >= 100,
            "processes.cpu_sample_ms must be >= 100, got {}",
            self.processes.cpu_sample_ms
        );
        anyhow::ensure!(
            !self.report.output_path.as_os_str().is_empty(),
            "report.output_path must be non-empty"
        );
        anyhow::ensure!(
            !self.logging.level.trim().is_empty(),
            "logging.level must be non-empty"
        );
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.commands.timeout_ms)
    }

    pub fn docker_timeout(&self) -> Duration {
        Duration::from_millis(self.docker.timeout_ms)
    }

    pub fn cpu_sample(&self) -> Duration {
        Duration::from_millis(self.processes.cpu_sample_ms)
    }
}
