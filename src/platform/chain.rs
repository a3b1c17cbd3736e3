// Ordered (source, parser) fallback chains.

use tracing::debug;

use super::probe::HostProbe;
use crate::error::CommandError;

/// Where a probe reads its raw text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSource {
    Command {
        program: &'static str,
        args: &'static [&'static str],
    },
    File(&'static str),
}

impl ProbeSource {
    /// Program name or file path.
    pub fn name(&self) -> &'static str {
        match *self {
            ProbeSource::Command { program, .. } => program,
            ProbeSource::File(path) => path,
        }
    }

    async fn fetch(&self, host: &dyn HostProbe) -> Result<String, CommandError> {
        match *self {
            ProbeSource::Command { program, args } => host.run_command(program, args).await,
            ProbeSource::File(path) => host.read_file(path).await,
        }
    }
}

/// One step of a chain. `parse` returns `None` to reject the text and move on.
pub struct Probe<T> {
    pub source: ProbeSource,
    pub parse: fn(&str) -> Option<T>,
}

impl<T> Probe<T> {
    pub const fn command(
        program: &'static str,
        args: &'static [&'static str],
        parse: fn(&str) -> Option<T>,
    ) -> Self {
        Self {
            source: ProbeSource::Command { program, args },
            parse,
        }
    }

    pub const fn file(path: &'static str, parse: fn(&str) -> Option<T>) -> Self {
        Self {
            source: ProbeSource::File(path),
            parse,
        }
    }
}

/// Why a single probe did not produce a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeFailure {
    Command(CommandError),
    Rejected(&'static str),
}

impl ProbeFailure {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ProbeFailure::Command(e) if e.is_permission_denied())
    }
}

pub struct FallbackChain<T> {
    probes: Vec<Probe<T>>,
}

impl<T> FallbackChain<T> {
    pub fn new(probes: Vec<Probe<T>>) -> Self {
        Self { probes }
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.source.name()).collect()
    }

    /// Try each probe in order; first accepted value wins.
    /// On exhaustion returns every failure in probe order.
    pub async fn evaluate(&self, host: &dyn HostProbe) -> Result<T, Vec<ProbeFailure>> {
        let mut failures = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            let name = probe.source.name();
            match probe.source.fetch(host).await {
                Ok(text) => match (probe.parse)(&text) {
                    Some(value) => return Ok(value),
                    None => {
                        debug!(source = name, "probe output rejected, falling back");
                        failures.push(ProbeFailure::Rejected(name));
                    }
                },
                Err(e) => {
                    debug!(source = name, error = %e, "probe failed, falling back");
                    failures.push(ProbeFailure::Command(e));
                }
            }
        }
        Err(failures)
    }
}
