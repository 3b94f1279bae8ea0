mod cli;
mod commands;
mod errors;
mod ui;

use std::process::ExitCode;

use clap::Parser;

use cli::{BastionCli, BastionCliCommand};

fn main() -> ExitCode {
    let cli = BastionCli::parse();
    ui::init_logging(cli.verbose);

    let config = cli.executor_config();
    ui::debug(&format!(
        "Executor: simulate={}, timeout={:?}",
        config.simulate, config.timeout
    ));

    let result = match cli.command {
        BastionCliCommand::Serve {
            transport,
            bind,
            path,
        } => commands::serve(config, transport, bind, &path),
        BastionCliCommand::Tools => commands::list_tools(cli.format),
        BastionCliCommand::Call { tool, args } => {
            commands::call_tool(config, &tool, args, cli.format)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::debug(&format!("Exiting: {}", e));
            ExitCode::from(e.exit_code())
        }
    }
}
