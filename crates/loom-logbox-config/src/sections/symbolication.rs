// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolication backend configuration section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8081";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Where stacks are sent for symbolication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicatorBackend {
	/// Local source map files.
	SourceMaps,
	/// A development server's `/symbolicate` endpoint.
	#[default]
	Http,
}

impl std::fmt::Display for SymbolicatorBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SymbolicatorBackend::SourceMaps => write!(f, "source_maps"),
			SymbolicatorBackend::Http => write!(f, "http"),
		}
	}
}

impl std::str::FromStr for SymbolicatorBackend {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().replace('-', "_").as_str() {
			"source_maps" => Ok(SymbolicatorBackend::SourceMaps),
			"http" => Ok(SymbolicatorBackend::Http),
			_ => Err(ConfigError::InvalidValue {
				key: "backend".to_string(),
				message: format!("unknown backend '{s}', expected 'source_maps' or 'http'"),
			}),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SymbolicationConfigLayer {
	pub backend: Option<SymbolicatorBackend>,
	pub source_map_dir: Option<PathBuf>,
	pub endpoint: Option<String>,
	pub request_timeout_secs: Option<u64>,
	pub context_lines: Option<usize>,
	pub cache: Option<bool>,
}

impl SymbolicationConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.backend.is_some() {
			self.backend = other.backend;
		}
		if other.source_map_dir.is_some() {
			self.source_map_dir = other.source_map_dir;
		}
		if other.endpoint.is_some() {
			self.endpoint = other.endpoint;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
		if other.context_lines.is_some() {
			self.context_lines = other.context_lines;
		}
		if other.cache.is_some() {
			self.cache = other.cache;
		}
	}

	pub fn finalize(self) -> SymbolicationConfig {
		SymbolicationConfig {
			backend: self.backend.unwrap_or_default(),
			source_map_dir: self.source_map_dir,
			endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
			request_timeout_secs: self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
			context_lines: self.context_lines.unwrap_or(DEFAULT_CONTEXT_LINES),
			cache: self.cache.unwrap_or(true),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolicationConfig {
	pub backend: SymbolicatorBackend,
	/// Directory scanned for `*.map` files by the `source_maps` backend.
	pub source_map_dir: Option<PathBuf>,
	/// Base URL of the development server for the `http` backend.
	pub endpoint: String,
	pub request_timeout_secs: u64,
	/// Lines of source shown around the highlighted line in code frames.
	pub context_lines: usize,
	/// Share results between identical stacks.
	pub cache: bool,
}

impl SymbolicationConfig {
	pub fn request_timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.request_timeout_secs)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		match self.backend {
			SymbolicatorBackend::Http if self.endpoint.trim().is_empty() => {
				return Err(ConfigError::validation("symbolication.endpoint is required for the http backend"));
			}
			SymbolicatorBackend::SourceMaps if self.source_map_dir.is_none() => {
				return Err(ConfigError::validation(
					"symbolication.source_map_dir is required for the source_maps backend",
				));
			}
			_ => {}
		}

		if self.request_timeout_secs == 0 {
			return Err(ConfigError::validation("symbolication.request_timeout_secs must be greater than 0"));
		}

		Ok(())
	}
}

impl Default for SymbolicationConfig {
	fn default() -> Self {
		SymbolicationConfigLayer::default().finalize()
	}
}
