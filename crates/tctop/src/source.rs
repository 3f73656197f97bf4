//! Access to `tc` output.
//!
//! [`TcSource`] is the seam between the monitor and the system: the real
//! implementation runs the `tc` binary, tests feed captured text.

use std::future::Future;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Something that can produce `tc` text dumps for one interface.
///
/// Each call returns the complete, buffered output of one invocation.
pub trait TcSource {
    /// Output of `tc filter show dev <interface>`.
    fn filter_dump(&self) -> impl Future<Output = Result<String>> + Send;

    /// Output of `tc -s class show dev <interface>`.
    fn class_dump(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Runs the `tc` program.
#[derive(Debug, Clone)]
pub struct TcCommand {
    program: String,
    interface: String,
}

impl TcCommand {
    /// Default program name, looked up in `PATH`.
    pub const DEFAULT_PROGRAM: &'static str = "tc";

    /// Query `interface` using `tc` from `PATH`.
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            program: Self::DEFAULT_PROGRAM.to_string(),
            interface: interface.into(),
        }
    }

    /// Use a different `tc` binary.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Interface being queried.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::debug!(%command, "running");

        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| Error::Utf8 { command })
    }
}

impl TcSource for TcCommand {
    async fn filter_dump(&self) -> Result<String> {
        self.run(&["filter", "show", "dev", &self.interface]).await
    }

    async fn class_dump(&self) -> Result<String> {
        self.run(&["-s", "class", "show", "dev", &self.interface]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program() {
        let tc = TcCommand::new("eth0").program("/nonexistent/tc");
        let err = tc.filter_dump().await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failing_program() {
        // `false` ignores its arguments and exits 1
        let tc = TcCommand::new("eth0").program("false");
        let err = tc.class_dump().await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn test_output_is_buffered() {
        // `echo` prints its arguments, standing in for tc
        let tc = TcCommand::new("lo").program("echo");
        let out = tc.class_dump().await.unwrap();
        assert_eq!(out, "-s class show dev lo\n");
    }
}
