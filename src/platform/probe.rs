// External command and file access for platform probing, bounded by a timeout.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::error::CommandError;

/// Capability to run an external command or read a host file.
/// Injected into `Platform` so tests can fake the host.
#[async_trait]
pub trait HostProbe: Send + Sync {
    /// Run `program` with `args`; returns stdout on a zero exit.
    async fn run_command(&self, program: &str, args: &[&str]) -> Result<String, CommandError>;

    async fn read_file(&self, path: &str) -> Result<String, CommandError>;
}

/// Real host probe backed by `tokio::process` and `tokio::fs`.
pub struct SystemProbe {
    timeout: Duration,
}

impl SystemProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl HostProbe for SystemProbe {
    async fn run_command(&self, program: &str, args: &[&str]) -> Result<String, CommandError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(CommandError::from_io(program, &e)),
            Err(_) => {
                return Err(CommandError::TimedOut {
                    program: program.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
        };
        debug!(
            program,
            code = ?output.status.code(),
            stdout_len = output.stdout.len(),
            "command finished"
        );
        interpret_output(
            program,
            output.status.success(),
            output.status.code(),
            &output.stdout,
            &output.stderr,
        )
    }

    async fn read_file(&self, path: &str) -> Result<String, CommandError> {
        match tokio::time::timeout(self.timeout, tokio::fs::read_to_string(path)).await {
            Ok(Ok(s)) => Ok(s),
            Ok(Err(e)) => Err(CommandError::from_io(path, &e)),
            Err(_) => Err(CommandError::TimedOut {
                program: path.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}

const PERMISSION_HINTS: [&str; 5] = [
    "permission denied",
    "operation not permitted",
    "must be root",
    "need to be root",
    "are you root",
];

/// Turn a finished process into stdout or a typed error.
pub(crate) fn interpret_output(
    program: &str,
    success: bool,
    code: Option<i32>,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<String, CommandError> {
    if success {
        return Ok(String::from_utf8_lossy(stdout).into_owned());
    }
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    let lower = stderr.to_lowercase();
    if PERMISSION_HINTS.iter().any(|h| lower.contains(h)) {
        return Err(CommandError::PermissionDenied {
            program: program.to_string(),
        });
    }
    Err(CommandError::Failed {
        program: program.to_string(),
        code,
        stderr,
    })
}
