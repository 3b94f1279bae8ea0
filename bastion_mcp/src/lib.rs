//! MCP server for Bastion.
//!
//! This crate exposes the Bastion tool catalog to AI assistants over the
//! Model Context Protocol, on stdio or streamable HTTP.

pub mod resources;
pub mod schema;
mod server;

pub use server::{BastionMcpServer, DEFAULT_HTTP_BIND, DEFAULT_HTTP_PATH, ServerError};
