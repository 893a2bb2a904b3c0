//! Service tools
//!
//! Transport-independent operations behind the MCP and HTTP surfaces.

pub mod bmi;
pub mod products;
pub mod status;
