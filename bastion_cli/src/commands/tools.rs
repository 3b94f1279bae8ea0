use bastion_core::ToolRegistry;

use crate::errors::CliError;
use crate::ui::{self, OutputFormat};

/// Describes every registered tool.
pub fn list_tools(output_format: OutputFormat) -> Result<(), CliError> {
    ui::header("Listing tools");
    let registry = ToolRegistry::standard().map_err(|e| {
        ui::error_with_details("Failed to register tools", &e.to_string());
        CliError::CatalogError
    })?;

    let tools = registry.describe();
    ui::success(&format!("Found {} tools", tools.len()));

    match output_format {
        OutputFormat::Pretty => ui::pretty_output_tool_list(&tools),
        OutputFormat::Json => ui::json_output(&tools),
    }
    Ok(())
}
