use std::fmt;

/// Failures that end a CLI run.
///
/// Details are printed through `ui` where they occur; the variant only
/// decides the message summary and exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliError {
    /// The async runtime could not be started.
    RuntimeError,
    /// The tool catalog failed to register.
    CatalogError,
    /// The tool name or its arguments were rejected.
    InputError,
    /// The MCP server stopped with an error.
    ServerError,
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InputError => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            CliError::RuntimeError => "Failed to start the async runtime",
            CliError::CatalogError => "Failed to register the tool catalog",
            CliError::InputError => "Invalid tool invocation",
            CliError::ServerError => "MCP server failed",
        };
        write!(f, "{}", message)
    }
}

impl std::error::Error for CliError {}
