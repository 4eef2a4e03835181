//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{CalculationPolicy, EngineConfig, ServiceEndpoints};

/// Loads and provides access to engine configuration.
///
/// # File Layout
///
/// ```text
/// server:
///   bind_address: "0.0.0.0:8080"
/// services:
///   employee: "http://localhost:8081/v1/employees/"
///   ...
/// http:
///   timeout_secs: 10
/// policy:
///   paid_leave:
///     statuses: [PAID, APPROVED]
///     hours_per_day: 8
///   tax:
///     require_open_top_bracket: false
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml").unwrap();
/// println!("Listening on {}", loader.config().server.bind_address);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is not valid configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, path_str)
    }

    /// Parses configuration from an in-memory YAML document.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>".to_string())
    }

    fn parse(content: &str, path: String) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;

        if config.policy.paid_leave.hours_per_day.is_sign_negative() {
            return Err(EngineError::ConfigParseError {
                path,
                message: "policy.paid_leave.hours_per_day must not be negative".to_string(),
            });
        }

        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the upstream service locations.
    pub fn services(&self) -> &ServiceEndpoints {
        &self.config.services
    }

    /// Returns the calculation rules.
    pub fn policy(&self) -> &CalculationPolicy {
        &self.config.policy
    }
}
