// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Builds the configured symbolication backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use loom_logbox_config::{SymbolicationConfig, SymbolicatorBackend};
use loom_logbox_symbolicate::{
	CachedSymbolicator, DirectorySourceMaps, HttpSymbolicator, SourceMapSymbolicator, Symbolicator,
};
use tracing::info;

pub fn build(config: &SymbolicationConfig) -> Result<Arc<dyn Symbolicator>> {
	let backend: Arc<dyn Symbolicator> = match config.backend {
		SymbolicatorBackend::SourceMaps => {
			let dir = config
				.source_map_dir
				.as_deref()
				.context("symbolication.source_map_dir is not set")?;
			let maps = DirectorySourceMaps::load(dir)
				.with_context(|| format!("failed to load source maps from {}", dir.display()))?;
			info!(dir = %dir.display(), maps = maps.len(), "using source map symbolication");
			Arc::new(SourceMapSymbolicator::new(maps).with_context_lines(config.context_lines))
		}
		SymbolicatorBackend::Http => {
			let http = HttpSymbolicator::new(&config.endpoint, config.request_timeout())
				.context("failed to create symbolication client")?;
			info!(endpoint = %http.endpoint(), "using development server symbolication");
			Arc::new(http)
		}
	};

	if config.cache {
		Ok(Arc::new(CachedSymbolicator::new(backend)))
	} else {
		Ok(backend)
	}
}
