//! Shared test helpers for bastion_core tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bastion_core::{
    CommandLine, CommandRunner, Dispatcher, Executor, ExecutorConfig, ProcessOutput, ToolRegistry,
};
use serde_json::{Map, Value};

/// A runner that records every command and answers with a fixed output.
pub struct RecordingRunner {
    output: ProcessOutput,
    commands: Mutex<Vec<CommandLine>>,
}

impl RecordingRunner {
    pub fn succeeding(stdout: &str) -> Arc<Self> {
        Self::with_output(0, stdout, "")
    }

    pub fn failing(exit_code: i32, stderr: &str) -> Arc<Self> {
        Self::with_output(exit_code, "", stderr)
    }

    pub fn with_output(exit_code: i32, stdout: &str, stderr: &str) -> Arc<Self> {
        Arc::new(Self {
            output: ProcessOutput {
                exit_code: Some(exit_code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
            commands: Mutex::new(Vec::new()),
        })
    }

    pub fn commands(&self) -> Vec<CommandLine> {
        self.commands.lock().expect("Runner lock poisoned").clone()
    }

    /// The PowerShell script of the only recorded command.
    pub fn only_script(&self) -> String {
        let commands = self.commands();
        assert_eq!(commands.len(), 1, "Expected exactly one command");
        commands[0].args().last().cloned().expect("Command has no arguments")
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandLine) -> io::Result<ProcessOutput> {
        self.commands
            .lock()
            .expect("Runner lock poisoned")
            .push(command.clone());
        Ok(self.output.clone())
    }
}

/// Routes pipeline logs to the test harness output.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A dispatcher over the standard catalog that really "executes" through `runner`.
pub fn live_dispatcher(runner: Arc<RecordingRunner>) -> Dispatcher {
    init_logging();
    let registry = ToolRegistry::standard().expect("Standard catalog must register");
    Dispatcher::new(registry, Executor::with_runner(ExecutorConfig::live(None), runner))
}

/// A dispatcher over the standard catalog in simulation mode.
pub fn simulated_dispatcher(runner: Arc<RecordingRunner>) -> Dispatcher {
    init_logging();
    let registry = ToolRegistry::standard().expect("Standard catalog must register");
    Dispatcher::new(
        registry,
        Executor::with_runner(ExecutorConfig::simulated(), runner),
    )
}

/// Converts a `json!` object into an argument map.
pub fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("Expected a JSON object"),
    }
}
