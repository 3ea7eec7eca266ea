// Adapters layer: concrete implementations of the domain ports.

pub mod dynamo;
pub mod http;
pub mod local;
pub mod memory;
