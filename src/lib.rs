pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

#[cfg(feature = "lambda")]
pub use adapters::dynamo::DynamoCacheStore;

pub use adapters::http::{HttpEphemeris, HttpHouseSystem};
pub use adapters::{local::LocalCacheStore, memory::MemoryCacheStore};
pub use config::{lambda::LambdaConfig, EngineConfig};
pub use core::assembler::NatalChartAssembler;
pub use utils::error::{ChartError, Result};
