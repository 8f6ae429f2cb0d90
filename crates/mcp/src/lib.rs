//! MCP (Model Context Protocol) layer for the hearth planner.
//!
//! Implements the MCP protocol over JSON-RPC 2.0, exposing the planner's
//! tool catalogue to LLM agents over stdio or HTTP.
//!
//! # Architecture
//!
//! - **types**: JSON-RPC 2.0 and MCP-specific protocol types
//! - **transport**: Pluggable transport layer (stdio, channels)
//! - **server**: MCP server wrapping a `ToolRegistry`
//! - **error**: Unified error types
//!
//! # Usage
//!
//! ```no_run
//! use hearth_mcp::server::McpServer;
//! use hearth_mcp::transport::StdioTransport;
//! use hearth_tools::{ToolContext, ToolRegistry};
//!
//! # async fn example(context: ToolContext) {
//! let mut registry = ToolRegistry::new();
//! hearth_tools::register_all(&mut registry).unwrap();
//! let server = McpServer::new(registry, context);
//! let mut transport = StdioTransport::new();
//! server.run(&mut transport).await.unwrap();
//! # }
//! ```

pub mod error;
pub mod server;
pub mod transport;
pub mod types;

pub use error::McpError;
pub use server::McpServer;
pub use transport::{ChannelTransport, McpTransport, StdioTransport};
pub use types::*;
