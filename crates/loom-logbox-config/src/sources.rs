// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::LogBoxConfigLayer;
use crate::sections::{LoggingConfigLayer, SymbolicationConfigLayer, SymbolicatorBackend};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<LogBoxConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<LogBoxConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(LogBoxConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// `loom-logbox.toml` in the working directory.
	pub fn local() -> Self {
		Self::new("loom-logbox.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<LogBoxConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(LogBoxConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: LogBoxConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable source.
///
/// Convention: LOOM_LOGBOX_<SECTION>_<FIELD>
pub struct EnvSource {
	lookup: Lookup,
}

impl EnvSource {
	pub fn new() -> Self {
		Self::with_lookup(|name| std::env::var(name).ok())
	}

	/// Reads variables through `lookup` instead of the process environment.
	pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
		Self {
			lookup: Box::new(lookup),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}

	fn flag(&self, name: &str) -> Option<bool> {
		self.var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parse<T: std::str::FromStr>(&self, name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v
				.parse()
				.map(Some)
				.map_err(|_| ConfigError::invalid_value(name, format!("invalid {kind} value '{v}'"))),
			None => Ok(None),
		}
	}

	fn load_symbolication(&self) -> Result<SymbolicationConfigLayer, ConfigError> {
		let backend = match self.var("LOOM_LOGBOX_SYMBOLICATION_BACKEND") {
			Some(v) => Some(v.parse::<SymbolicatorBackend>().map_err(|e| {
				ConfigError::invalid_value("LOOM_LOGBOX_SYMBOLICATION_BACKEND", e.to_string())
			})?),
			None => None,
		};

		Ok(SymbolicationConfigLayer {
			backend,
			source_map_dir: self.var("LOOM_LOGBOX_SYMBOLICATION_SOURCE_MAP_DIR").map(PathBuf::from),
			endpoint: self.var("LOOM_LOGBOX_SYMBOLICATION_ENDPOINT"),
			request_timeout_secs: self.parse("LOOM_LOGBOX_SYMBOLICATION_REQUEST_TIMEOUT_SECS", "u64")?,
			context_lines: self.parse("LOOM_LOGBOX_SYMBOLICATION_CONTEXT_LINES", "usize")?,
			cache: self.flag("LOOM_LOGBOX_SYMBOLICATION_CACHE"),
		})
	}

	fn load_logging(&self) -> LoggingConfigLayer {
		LoggingConfigLayer {
			level: self.var("LOOM_LOGBOX_LOGGING_LEVEL"),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<LogBoxConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(LogBoxConfigLayer {
			symbolication: Some(self.load_symbolication()?),
			logging: Some(self.load_logging()),
		})
	}
}
