//! Executes formatted commands, or simulates them.

use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::command::CommandLine;
use crate::schema::Effect;

/// Default limit on how long a single command may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for an [`Executor`], fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Report success without starting any process.
    pub simulate: bool,
    /// Kill commands that run longer than this. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl ExecutorConfig {
    pub fn simulated() -> Self {
        Self {
            simulate: true,
            ..Self::default()
        }
    }

    pub fn live(timeout: Option<Duration>) -> Self {
        Self {
            simulate: false,
            timeout,
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            simulate: true,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Outcome of one command, consumed by the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub succeeded: bool,
    pub raw_output: Option<String>,
    pub error_detail: Option<String>,
}

impl ExecutionResult {
    pub fn success(raw_output: Option<String>) -> Self {
        Self {
            succeeded: true,
            raw_output,
            error_detail: None,
        }
    }

    pub fn failure(error_detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            raw_output: None,
            error_detail: Some(error_detail.into()),
        }
    }

    pub fn simulated() -> Self {
        Self::success(None)
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Launches commands on behalf of the [`Executor`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandLine) -> io::Result<ProcessOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandLine) -> io::Result<ProcessOutput> {
        let output = tokio::process::Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs commands according to its [`ExecutorConfig`].
#[derive(Clone)]
pub struct Executor {
    config: ExecutorConfig,
    runner: Arc<dyn CommandRunner>,
}

impl Executor {
    /// Creates an executor that launches real processes when not simulating.
    pub fn new(config: ExecutorConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemRunner))
    }

    pub fn with_runner(config: ExecutorConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    /// Executes a command and captures its outcome.
    ///
    /// Simulation only skips commands that change the system; read-only
    /// commands always run. Never fails: launch errors, non-zero exits and
    /// timeouts all become a failed [`ExecutionResult`]. Nothing is retried.
    pub async fn execute(&self, command: &CommandLine, effect: Effect) -> ExecutionResult {
        if self.config.simulate && effect != Effect::ReadOnly {
            info!("Simulating: {}", command);
            return ExecutionResult::simulated();
        }

        info!("Executing: {}", command);
        let run = self.runner.run(command);
        let output = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(output) => output,
                Err(_) => {
                    warn!("Command timed out after {:?}: {}", limit, command);
                    return ExecutionResult::failure(format!(
                        "Command timed out after {:?}",
                        limit
                    ));
                }
            },
            None => run.await,
        };

        match output {
            Ok(output) if output.exit_code == Some(0) => {
                debug!("Command succeeded ({} bytes of output)", output.stdout.len());
                ExecutionResult::success(Some(output.stdout))
            }
            Ok(output) => {
                let status = output
                    .exit_code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "none".to_string());
                warn!("Command exited with status {}: {}", status, command);

                let stderr = output.stderr.trim();
                let detail = if stderr.is_empty() {
                    format!("Command exited with status {}", status)
                } else {
                    stderr.to_string()
                };
                ExecutionResult {
                    succeeded: false,
                    raw_output: Some(output.stdout),
                    error_detail: Some(detail),
                }
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                warn!("Executable not found: {}", command.program());
                ExecutionResult::failure(format!("Executable not found: {}", command.program()))
            }
            Err(error) => {
                warn!("Failed to launch '{}': {}", command.program(), error);
                ExecutionResult::failure(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRunner {
        output: ProcessOutput,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommandRunner for FixedRunner {
        async fn run(&self, _command: &CommandLine) -> io::Result<ProcessOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    struct MissingRunner;

    #[async_trait]
    impl CommandRunner for MissingRunner {
        async fn run(&self, _command: &CommandLine) -> io::Result<ProcessOutput> {
            Err(io::Error::new(io::ErrorKind::NotFound, "program not found"))
        }
    }

    struct SlowRunner;

    #[async_trait]
    impl CommandRunner for SlowRunner {
        async fn run(&self, _command: &CommandLine) -> io::Result<ProcessOutput> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ProcessOutput::default())
        }
    }

    fn command() -> CommandLine {
        CommandLine::new("powershell.exe", ["-Command", "Get-Date"])
    }

    fn fixed(exit_code: i32, stdout: &str, stderr: &str) -> Arc<FixedRunner> {
        Arc::new(FixedRunner {
            output: ProcessOutput {
                exit_code: Some(exit_code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_simulation_skips_changes() {
        let runner = fixed(1, "", "boom");
        let executor = Executor::with_runner(ExecutorConfig::simulated(), runner.clone());

        let result = executor.execute(&command(), Effect::Modifying).await;

        assert_eq!(result, ExecutionResult::simulated());
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_simulation_still_runs_read_only_commands() {
        let runner = fixed(0, "rules", "");
        let executor = Executor::with_runner(ExecutorConfig::simulated(), runner.clone());

        let result = executor.execute(&command(), Effect::ReadOnly).await;

        assert_eq!(result.raw_output.as_deref(), Some("rules"));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let runner = fixed(0, "done", "");
        let executor = Executor::with_runner(ExecutorConfig::live(None), runner.clone());

        let result = executor.execute(&command(), Effect::Modifying).await;

        assert!(result.succeeded);
        assert_eq!(result.raw_output.as_deref(), Some("done"));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let executor = Executor::with_runner(ExecutorConfig::live(None), fixed(1, "", " denied \n"));

        let result = executor.execute(&command(), Effect::Modifying).await;

        assert!(!result.succeeded);
        assert_eq!(result.error_detail.as_deref(), Some("denied"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_without_stderr() {
        let executor = Executor::with_runner(ExecutorConfig::live(None), fixed(5, "", ""));

        let result = executor.execute(&command(), Effect::Modifying).await;

        assert_eq!(
            result.error_detail.as_deref(),
            Some("Command exited with status 5")
        );
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let executor = Executor::with_runner(ExecutorConfig::live(None), Arc::new(MissingRunner));

        let result = executor.execute(&command(), Effect::Modifying).await;

        assert!(!result.succeeded);
        assert_eq!(
            result.error_detail.as_deref(),
            Some("Executable not found: powershell.exe")
        );
    }

    #[tokio::test]
    async fn test_timeout() {
        let config = ExecutorConfig::live(Some(Duration::from_millis(20)));
        let executor = Executor::with_runner(config, Arc::new(SlowRunner));

        let result = executor.execute(&command(), Effect::Modifying).await;

        assert!(!result.succeeded);
        assert_eq!(
            result.error_detail.as_deref(),
            Some("Command timed out after 20ms")
        );
    }
}
