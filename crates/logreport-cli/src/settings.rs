//! Resolves the run configuration from an optional `--config` path.
//!
//! Logging is configured from the result, so nothing here can log yet.
//! Problems are collected and emitted once the dispatcher is in place.

use logreport_core::config::{self, Config, Overrides};
use std::path::Path;

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// Config file problems that were recovered from by using defaults
    pub warnings: Vec<String>,
    /// Set when the merged values are unusable; `config` then holds defaults
    pub error: Option<logreport_core::Error>,
}

pub fn load(path: Option<&Path>) -> LoadedConfig {
    let mut warnings = Vec::new();

    let overrides = match path {
        Some(path) => match config::read_overrides(path) {
            Ok(overrides) => overrides,
            Err(e) => {
                warnings.push(format!("Can't use config file {}: {}", path.display(), e));
                Overrides::new()
            }
        },
        None => Overrides::new(),
    };

    match Config::merged_with_warnings(&overrides) {
        Ok((config, legacy)) => {
            warnings.extend(legacy);
            LoadedConfig {
                config,
                warnings,
                error: None,
            }
        }
        Err(e) => LoadedConfig {
            config: Config::default(),
            warnings,
            error: Some(e),
        },
    }
}
