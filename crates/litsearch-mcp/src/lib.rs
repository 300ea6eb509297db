//! Litsearch MCP Server
//!
//! Model Context Protocol server exposing query generation, query titles and
//! confidence analysis as tools for AI assistants.

pub mod protocol;
mod server;
pub mod tools;

pub use server::{start_server, McpServer};
