use serde_json::{Map, Value, json};

use bastion_core::{DispatchError, Dispatcher, ExecutorConfig};

use super::runtime;
use crate::errors::CliError;
use crate::ui::{self, OutputFormat};

/// Runs one tool invocation locally and prints its report.
pub fn call_tool(
    config: ExecutorConfig,
    tool: &str,
    arguments: Vec<(String, Value)>,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    ui::header(&format!("Calling {}", tool));
    if config.simulate {
        ui::info("Simulation mode: changes will be reported but not made");
    }

    let dispatcher = Dispatcher::standard(config).map_err(|e| {
        ui::error_with_details("Failed to register tools", &e.to_string());
        CliError::CatalogError
    })?;
    let arguments: Map<String, Value> = arguments.into_iter().collect();
    ui::debug(&format!("Arguments: {}", Value::Object(arguments.clone())));

    let rt = runtime()?;
    let spinner = ui::spinner(&format!("Running {}", tool));
    let result = rt.block_on(dispatcher.call(tool, arguments));
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            ui::success(&format!("{} finished", tool));
            match output_format {
                OutputFormat::Pretty => ui::raw_output(&report),
                OutputFormat::Json => ui::json_output(&json!({
                    "tool": tool,
                    "simulated": config.simulate,
                    "result": report,
                })),
            }
            Ok(())
        }
        Err(DispatchError::NotFound(name)) => {
            ui::error(&format!(
                "Unknown tool '{}'. Run 'bastion tools' to see available tools.",
                name
            ));
            Err(CliError::InputError)
        }
        Err(DispatchError::Validation { error, .. }) => {
            ui::error_with_details("Invalid arguments", &error.to_string());
            Err(CliError::InputError)
        }
    }
}
