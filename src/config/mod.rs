//! Configuration loading and management for the Payroll Engine.
//!
//! This module loads the engine configuration from a YAML file: the server
//! bind address, upstream service URLs, HTTP client settings, and the
//! business policies applied during calculation.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Tax service: {}", config.services().tax);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CalculationPolicy, EngineConfig, HttpClientConfig, PaidLeavePolicy, ServerConfig,
    ServiceEndpoints, TaxPolicy,
};
