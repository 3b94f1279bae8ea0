mod call;
mod serve;
mod tools;

pub use call::call_tool;
pub use serve::serve;
pub use tools::list_tools;

use crate::errors::CliError;
use crate::ui;

/// Creates the tokio runtime the async core runs on.
fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new().map_err(|e| {
        ui::error_with_details("Failed to create async runtime", &e.to_string());
        CliError::RuntimeError
    })
}
