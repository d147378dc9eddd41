// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map lookup by generated file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::sourcemap::SourceMap;

/// Finds the source map for a generated file.
pub trait SourceMapLookup: Send + Sync {
	fn source_map(&self, file: &str) -> Option<Arc<SourceMap>>;
}

/// File name of a frame's file, ignoring directories and query strings.
///
/// `http://localhost:8081/index.bundle?platform=ios` becomes `index.bundle`.
pub fn generated_file_name(file: &str) -> &str {
	let without_query = file.split(['?', '#']).next().unwrap_or(file);
	without_query
		.rsplit(['/', '\\'])
		.next()
		.unwrap_or(without_query)
}

/// Source maps held in memory, keyed by generated file name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceMaps {
	maps: HashMap<String, Arc<SourceMap>>,
}

impl InMemorySourceMaps {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, generated_file: impl Into<String>, map: SourceMap) {
		self.maps.insert(generated_file.into(), Arc::new(map));
	}

	/// Parses and inserts a source map.
	pub fn add(&mut self, generated_file: impl Into<String>, data: &[u8]) -> Result<()> {
		self.insert(generated_file, SourceMap::from_slice(data)?);
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.maps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.maps.is_empty()
	}
}

impl SourceMapLookup for InMemorySourceMaps {
	fn source_map(&self, file: &str) -> Option<Arc<SourceMap>> {
		self
			.maps
			.get(file)
			.or_else(|| self.maps.get(generated_file_name(file)))
			.cloned()
	}
}

/// Source maps loaded from `*.map` files in a directory.
///
/// `index.bundle.map` serves frames whose file is `index.bundle`.
#[derive(Debug, Clone, Default)]
pub struct DirectorySourceMaps {
	maps: InMemorySourceMaps,
}

impl DirectorySourceMaps {
	pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
		let dir = dir.as_ref();
		let mut maps = InMemorySourceMaps::new();

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();
			let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
				continue;
			};
			let Some(generated) = name.strip_suffix(".map") else {
				continue;
			};

			let data = std::fs::read(&path)?;
			match maps.add(generated, &data) {
				Ok(()) => debug!(path = %path.display(), "loaded source map"),
				Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable source map"),
			}
		}

		debug!(dir = %dir.display(), count = maps.len(), "source map directory loaded");
		Ok(Self { maps })
	}

	pub fn len(&self) -> usize {
		self.maps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.maps.is_empty()
	}
}

impl SourceMapLookup for DirectorySourceMaps {
	fn source_map(&self, file: &str) -> Option<Arc<SourceMap>> {
		self.maps.source_map(file)
	}
}
