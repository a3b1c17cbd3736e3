use anyhow::Result;
use clap::Parser;
use host_insights::collectors::{ContainerRuntime, UnreachableRuntime};
use host_insights::orchestrator::{CollectorDeps, Selection};
use host_insights::platform::{Platform, SystemProbe};
use host_insights::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// Gather system, network, Docker and process insights into one AI-ready report.
#[derive(Parser, Debug)]
#[command(name = "host-insights", version)]
struct Cli {
    /// Collect everything and print the full report (default)
    #[arg(long)]
    all: bool,

    /// Collect system information only (JSON)
    #[arg(long)]
    system: bool,

    /// Collect network information only (JSON)
    #[arg(long)]
    network: bool,

    /// Collect Docker information only (JSON)
    #[arg(long)]
    docker: bool,

    /// Collect running services only (JSON)
    #[arg(long)]
    services: bool,

    /// Print the whole report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write the report to a file; without a value the configured path is used
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    output: Option<Option<PathBuf>>,

    /// Config file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    /// First category flag given, in `--system`, `--network`, `--docker`, `--services` order.
    fn single_category(&self) -> Option<Selection> {
        if self.all {
            return None;
        }
        let only = Selection::none();
        if self.system {
            Some(Selection { system: true, ..only })
        } else if self.network {
            Some(Selection { network: true, ..only })
        } else if self.docker {
            Some(Selection { container: true, ..only })
        } else if self.services {
            Some(Selection { process: true, ..only })
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app_config = config::AppConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&app_config.logging.level));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(name = version::NAME, version = version::VERSION, "starting");

    let sysinfo_repo = Arc::new(sysinfo_repo::SysinfoRepo::new(app_config.cpu_sample()));
    let runtime: Arc<dyn ContainerRuntime> =
        match docker_repo::DockerRepo::connect(app_config.docker_timeout()) {
            Ok(repo) => Arc::new(repo),
            Err(e) => {
                tracing::warn!(error = %e, operation = "docker_connect", "Docker client unavailable");
                Arc::new(UnreachableRuntime::new(e.to_string()))
            }
        };
    let platform = Arc::new(Platform::detect(Arc::new(SystemProbe::new(
        app_config.command_timeout(),
    ))));
    let deps = CollectorDeps {
        system: sysinfo_repo.clone(),
        network: sysinfo_repo.clone(),
        process: sysinfo_repo,
        runtime,
        platform,
    };

    let output = match cli.single_category() {
        Some(selection) => {
            let host = orchestrator::gather(&deps, selection).await;
            if selection.system {
                serde_json::to_string_pretty(&host.system)?
            } else if selection.network {
                serde_json::to_string_pretty(&host.network)?
            } else if selection.container {
                serde_json::to_string_pretty(&host.container)?
            } else {
                serde_json::to_string_pretty(&host.process)?
            }
        }
        None => {
            let host = orchestrator::gather(&deps, Selection::all()).await;
            if cli.json {
                serde_json::to_string_pretty(&host)?
            } else {
                report::format_report_with(
                    &host.system,
                    &host.network,
                    &host.container,
                    &host.process,
                    &report::ReportOptions {
                        include_env: app_config.report.include_env,
                    },
                )
            }
        }
    };

    match cli.output {
        Some(path) => {
            let path = path.unwrap_or_else(|| app_config.report.output_path.clone());
            report::write_report_to_file(&output, &path)?;
            eprintln!("Report saved to {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}
