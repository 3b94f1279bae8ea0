use std::net::SocketAddr;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde_json::Value;

use bastion_core::ExecutorConfig;
use bastion_mcp::{DEFAULT_HTTP_BIND, DEFAULT_HTTP_PATH};

use super::ui::OutputFormat;

/// Defines the top-level interface for the Bastion CLI with clap.
#[derive(Parser, Debug)]
#[command(name = "bastion")]
#[command(version, about = "Bastion CLI: Windows administration tools for AI assistants.")]
pub struct BastionCli {
    /// Report commands as successful without running them (true or false).
    #[arg(
        long,
        global = true,
        env = "BASTION_SIMULATE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub simulate: bool,

    /// Seconds a command may run before it is killed (0 waits forever).
    #[arg(long, global = true, env = "BASTION_TIMEOUT_SECS", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Enable verbose output?
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: BastionCliCommand,
}

impl BastionCli {
    /// Executor settings selected by the global options.
    pub fn executor_config(&self) -> ExecutorConfig {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        ExecutorConfig {
            simulate: self.simulate,
            timeout,
        }
    }
}

/// Defines the available subcommands of the Bastion CLI.
#[derive(Subcommand, Debug, PartialEq)]
pub enum BastionCliCommand {
    /// Run the MCP server.
    Serve {
        /// Transport to serve MCP on
        #[arg(short, long, default_value_t = Transport::Stdio)]
        transport: Transport,
        /// Address the HTTP transport listens on
        #[arg(long, default_value = DEFAULT_HTTP_BIND)]
        bind: SocketAddr,
        /// Path of the HTTP endpoint
        #[arg(long, default_value = DEFAULT_HTTP_PATH)]
        path: String,
    },
    /// Describe every available tool and its parameters.
    Tools,
    /// Run a single tool and print its report.
    Call {
        /// Tool name (e.g. disable_ad_account)
        tool: String,
        /// Tool argument (can be repeated). Values are read as JSON when possible, e.g. local_port=443.
        #[arg(short, long = "arg", value_name = "NAME=VALUE", value_parser = parse_argument)]
        args: Vec<(String, Value)>,
    },
}

/// MCP transports the server can run on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    Http,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http => write!(f, "http"),
        }
    }
}

/// Parses `name=value`, reading the value as JSON and falling back to a string.
fn parse_argument(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing argument name in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}
