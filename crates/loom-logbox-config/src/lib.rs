// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Loom error overlay symbolicator.
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. A TOML file (`loom-logbox.toml` unless another path is given)
//! 3. Environment variables (`LOOM_LOGBOX_*`)
//!
//! ```toml
//! [symbolication]
//! backend = "source_maps"
//! source_map_dir = "dist"
//! context_lines = 3
//!
//! [logging]
//! level = "info"
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::LogBoxConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBoxConfig {
	pub symbolication: SymbolicationConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from `./loom-logbox.toml` and the environment.
pub fn load_config() -> Result<LogBoxConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::local()),
		Box::new(EnvSource::new()),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<std::path::PathBuf>) -> Result<LogBoxConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::new()),
	])
}

/// Merge `sources` in precedence order and resolve the result.
pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<LogBoxConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = LogBoxConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: LogBoxConfigLayer) -> Result<LogBoxConfig, ConfigError> {
	let symbolication = layer.symbolication.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	symbolication.validate()?;

	info!(
		backend = %symbolication.backend,
		endpoint = %symbolication.endpoint,
		source_map_dir = ?symbolication.source_map_dir,
		cache = symbolication.cache,
		"configuration loaded"
	);

	Ok(LogBoxConfig { symbolication, logging })
}
