// Typed errors for probes, sources and the container runtime.

use thiserror::Error;

/// Failure of one external command or file read used for platform probing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{program}: command not found")]
    NotFound { program: String },

    #[error("{program}: requires elevated privileges")]
    PermissionDenied { program: String },

    #[error("{program}: exited with {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program}: timed out after {timeout_ms} ms")]
    TimedOut { program: String, timeout_ms: u64 },

    #[error("{program}: {reason}")]
    Io { program: String, reason: String },
}

impl CommandError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, CommandError::PermissionDenied { .. })
    }

    /// Map an I/O error from spawning or reading into the closest variant.
    pub fn from_io(program: &str, e: &std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => CommandError::NotFound {
                program: program.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => CommandError::PermissionDenied {
                program: program.to_string(),
            },
            _ => CommandError::Io {
                program: program.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

/// Failure talking to the container runtime.
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    #[error("container runtime unreachable: {0}")]
    Unreachable(String),

    #[error("{operation} timed out after {timeout_ms} ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("container {0} not found")]
    NotFound(String),

    #[error("malformed stats for container {0}")]
    MalformedStats(String),

    #[error("{0}")]
    Api(String),

    #[error("container runtime panicked: {0}")]
    Panicked(String),
}

impl From<bollard::errors::Error> for RuntimeError {
    fn from(e: bollard::errors::Error) -> Self {
        match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                message,
            } => RuntimeError::NotFound(message),
            bollard::errors::Error::IOError { err } => RuntimeError::Unreachable(err.to_string()),
            other => RuntimeError::Api(other.to_string()),
        }
    }
}

/// Failure of a host telemetry source (sysinfo, sockets).
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("{0} lock poisoned")]
    Lock(&'static str),

    #[error("{what} unavailable: {reason}")]
    Unavailable { what: &'static str, reason: String },
}
