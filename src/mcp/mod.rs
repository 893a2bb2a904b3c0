//! MCP server module
//!
//! Exposes the service tools over the Model Context Protocol.

mod server;

pub use server::NomadService;
