//! Terminal output for the CLI.
//!
//! Status lines go to stderr so that stdout carries only results, and stays
//! free for the MCP stdio transport.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use bastion_core::{ParameterSpec, ToolDescriptor};
use clap::ValueEnum;
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use serde::Serialize;

static PROGRESS: LazyLock<MultiProgress> = LazyLock::new(MultiProgress::new);

/// How results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Installs env_logger behind the progress bridge, writing to stderr.
///
/// `RUST_LOG` overrides the level chosen by `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .target(env_logger::Target::Stderr)
            .build();
    let level = logger.filter();

    if LogWrapper::new(PROGRESS.clone(), logger).try_init().is_ok() {
        log::set_max_level(level);
    }
}

pub fn header(message: &str) {
    eprintln!("{}", style(message).bold().cyan());
}

pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", style("•").blue(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), style(message).yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

pub fn error_with_details(message: &str, details: &str) {
    error(message);
    eprintln!("  {}", style(details).dim());
}

pub fn debug(message: &str) {
    log::debug!("{}", message);
}

/// Starts a spinner that stays out of the way of log lines.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = PROGRESS.add(ProgressBar::new_spinner());
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn raw_output(text: &str) {
    println!("{}", text);
}

pub fn json_output<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error_with_details("Failed to serialize output", &e.to_string()),
    }
}

pub fn pretty_output_tool_list(tools: &[&ToolDescriptor]) {
    for tool in tools {
        println!();
        println!(
            "{} {}",
            style(&tool.name).bold(),
            style(format!("({:?})", tool.effect)).dim()
        );
        println!("  {}", tool.description);
        for parameter in &tool.parameters {
            println!("    {}", describe_parameter(parameter));
        }
    }
}

fn describe_parameter(parameter: &ParameterSpec) -> String {
    let mut line = format!("{}: {}", style(&parameter.name).cyan(), parameter.kind);

    if !parameter.allowed_values.is_empty() {
        line.push_str(&format!(" [{}]", parameter.allowed_values.join(" | ")));
    }
    if let Some((min, max)) = parameter.range {
        line.push_str(&format!(" ({}..={})", min, max));
    }
    match &parameter.default {
        Some(default) => line.push_str(&format!(" = {}", default)),
        None => line.push_str(&format!(" {}", style("required").yellow())),
    }
    line.push_str(&format!(" - {}", parameter.description));
    line
}
