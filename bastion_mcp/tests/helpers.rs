//! Shared test helpers for bastion_mcp tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bastion_core::{
    CommandLine, CommandRunner, Dispatcher, Executor, ExecutorConfig, ProcessOutput, ToolRegistry,
};
use bastion_mcp::BastionMcpServer;
use rmcp::model::{CallToolResult, JsonObject, RawContent};
use serde_json::Value;

/// Extract the text content from a CallToolResult.
pub fn get_text(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1, "Expected exactly one content item");
    match &result.content[0].raw {
        RawContent::Text(text_content) => text_content.text.clone(),
        _ => panic!("Expected text content"),
    }
}

/// Check if the result is a success.
pub fn is_success(result: &CallToolResult) -> bool {
    result.is_error == Some(false)
}

/// Check if the result is an error.
pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

/// Converts a `json!` object into tool call arguments.
pub fn arguments(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => panic!("Expected a JSON object"),
    }
}

/// A runner that counts commands and answers with a fixed output.
pub struct CountingRunner {
    output: ProcessOutput,
    commands: Mutex<Vec<CommandLine>>,
}

impl CountingRunner {
    pub fn new(exit_code: i32, stdout: &str, stderr: &str) -> Arc<Self> {
        Arc::new(Self {
            output: ProcessOutput {
                exit_code: Some(exit_code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
            commands: Mutex::new(Vec::new()),
        })
    }

    pub fn count(&self) -> usize {
        self.commands.lock().expect("Runner lock poisoned").len()
    }
}

#[async_trait]
impl CommandRunner for CountingRunner {
    async fn run(&self, command: &CommandLine) -> io::Result<ProcessOutput> {
        self.commands
            .lock()
            .expect("Runner lock poisoned")
            .push(command.clone());
        Ok(self.output.clone())
    }
}

/// Create a server over the standard catalog with the given runner.
pub fn create_server(config: ExecutorConfig, runner: Arc<CountingRunner>) -> BastionMcpServer {
    let registry = ToolRegistry::standard().expect("Standard catalog must register");
    BastionMcpServer::new(Dispatcher::new(
        registry,
        Executor::with_runner(config, runner),
    ))
}
