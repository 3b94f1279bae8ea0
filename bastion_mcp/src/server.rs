//! Core MCP server implementation for Bastion.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, warn};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    model::*,
    service::RequestContext,
    transport::{
        stdio,
        streamable_http_server::{
            StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
        },
    },
};

use bastion_core::{DispatchError, Dispatcher, ExecutorConfig, RegistryError};

use crate::{resources, schema};

/// Default address of the streamable HTTP transport.
pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8081";

/// Default path of the streamable HTTP endpoint.
pub const DEFAULT_HTTP_PATH: &str = "/mcp";

/// Error type for MCP server operations.
#[derive(Debug)]
pub enum ServerError {
    /// The tool catalog could not be registered
    Registry(RegistryError),
    /// The HTTP endpoint path is not usable
    InvalidPath(String),
    /// Socket error on the HTTP transport
    Io(std::io::Error),
    /// MCP protocol error
    Mcp(String),
}

impl From<RegistryError> for ServerError {
    fn from(err: RegistryError) -> Self {
        ServerError::Registry(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(err)
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Registry(err) => write!(f, "Registry error: {}", err),
            ServerError::InvalidPath(path) => {
                write!(f, "Invalid endpoint path '{}': must start with '/'", path)
            }
            ServerError::Io(err) => write!(f, "I/O error: {}", err),
            ServerError::Mcp(msg) => write!(f, "MCP error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

/// MCP server over the Bastion tool catalog.
///
/// Every registered tool is listed with a schema built from its declared
/// parameters, and calls go through the dispatcher's validate, execute and
/// report pipeline. Handlers share only the immutable dispatcher.
#[derive(Clone)]
pub struct BastionMcpServer {
    dispatcher: Arc<Dispatcher>,
}

impl BastionMcpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Create a server over the standard catalog.
    pub fn standard(config: ExecutorConfig) -> Result<Self, ServerError> {
        debug!(
            "Creating MCP server (simulate={}, timeout={:?})",
            config.simulate, config.timeout
        );
        Ok(Self::new(Dispatcher::standard(config)?))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The MCP tools advertised to clients, in catalog order.
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .describe()
            .into_iter()
            .map(schema::to_mcp_tool)
            .collect()
    }

    /// Run one tool call.
    ///
    /// Unknown tools are a protocol error. Invalid arguments produce an error
    /// result carrying the validation message. Anything that got as far as
    /// execution is a successful result whose text is the tool's report.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Tool: {}", name);

        match self
            .dispatcher
            .call(name, arguments.unwrap_or_default())
            .await
        {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(DispatchError::NotFound(name)) => Err(McpError::invalid_params(
                format!(
                    "Unknown tool '{}'. Use tools/list to see available tools.",
                    name
                ),
                None,
            )),
            Err(DispatchError::Validation { tool, error }) => {
                warn!("Rejected call to '{}': {}", tool, error);
                Ok(CallToolResult::error(vec![Content::text(error.to_string())]))
            }
        }
    }

    /// Serve MCP over stdio (stdin/stdout).
    ///
    /// This method blocks until the connection is closed.
    pub async fn serve_stdio(self) -> Result<(), ServerError> {
        info!("Starting MCP server on stdio");
        let service = self
            .serve(stdio())
            .await
            .map_err(|e| ServerError::Mcp(format!("Failed to start server: {}", e)))?;
        service
            .waiting()
            .await
            .map_err(|e| ServerError::Mcp(format!("Server error: {}", e)))?;
        Ok(())
    }

    /// Serve MCP over streamable HTTP at `http://{bind}{path}`.
    ///
    /// This method blocks until Ctrl-C is received.
    pub async fn serve_http(self, bind: SocketAddr, path: &str) -> Result<(), ServerError> {
        if !path.starts_with('/') {
            return Err(ServerError::InvalidPath(path.to_string()));
        }

        let server = self;
        let service = StreamableHttpService::new(
            move || Ok(server.clone()),
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig::default(),
        );

        // axum refuses to nest at the root.
        let router = if path == "/" {
            axum::Router::new().fallback_service(service)
        } else {
            axum::Router::new().nest_service(path, service)
        };

        let listener = tokio::net::TcpListener::bind(bind).await?;
        info!("Starting MCP server on http://{}{}", bind, path);

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down MCP server");
            })
            .await?;
        Ok(())
    }

    fn instructions(&self) -> String {
        let mode = if self.dispatcher.executor().config().simulate {
            "Simulation mode is on: changes are reported as successful without being made. \
             Read-only tools still query the live system."
        } else {
            "Commands run against the live system."
        };
        format!(
            "Bastion MCP server. Use tools to review and change Windows firewall rules \
             and Active Directory users, groups and delegation. Read the job descriptions \
             before changing an account's access. {}",
            mode
        )
    }
}

impl ServerHandler for BastionMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(self.instructions()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.tools();
        debug!("Listing {} tools", tools.len());

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(&request.name, request.arguments).await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        debug!("Listing resources");

        Ok(ListResourcesResult {
            resources: resources::list(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = &request.uri;
        debug!("Reading resource: {}", uri);

        let text = resources::read(uri).ok_or_else(|| {
            McpError::resource_not_found(format!("Unknown resource URI: {}", uri), None)
        })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri.clone())],
        })
    }
}
