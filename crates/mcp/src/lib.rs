// MCP (Model Context Protocol) server exposing the datetool clock as tools

pub mod codec;
pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
