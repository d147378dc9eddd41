// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source Map v3 parsing and position lookup.

use serde::Deserialize;

use crate::error::{Result, SymbolicateError};
use crate::vlq::{decode_mappings, MappingIndex};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
	version: u32,
	#[serde(default)]
	file: Option<String>,
	#[serde(default)]
	source_root: Option<String>,
	sources: Vec<Option<String>>,
	#[serde(default)]
	sources_content: Vec<Option<String>>,
	#[serde(default)]
	names: Vec<String>,
	mappings: String,
}

/// A parsed source map ready for lookups.
#[derive(Debug, Clone)]
pub struct SourceMap {
	pub file: Option<String>,
	sources: Vec<String>,
	sources_content: Vec<Option<String>>,
	names: Vec<String>,
	mappings: MappingIndex,
}

/// Where a generated position came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
	/// Source path with `sourceRoot` applied.
	pub source: String,
	/// 1-indexed.
	pub line: u32,
	/// 0-indexed.
	pub column: u32,
	pub name: Option<String>,
}

impl SourceMap {
	pub fn from_slice(data: &[u8]) -> Result<Self> {
		let raw: RawSourceMap = serde_json::from_slice(data)?;

		if raw.version != 3 {
			return Err(SymbolicateError::InvalidSourceMapVersion(raw.version));
		}

		let root = raw
			.source_root
			.as_deref()
			.map(|r| r.trim_end_matches('/'))
			.filter(|r| !r.is_empty());
		let sources = raw
			.sources
			.into_iter()
			.map(|s| {
				let s = s.unwrap_or_default();
				match root {
					Some(root) => format!("{root}/{s}"),
					None => s,
				}
			})
			.collect();

		Ok(Self {
			file: raw.file,
			sources,
			sources_content: raw.sources_content,
			names: raw.names,
			mappings: decode_mappings(&raw.mappings)?,
		})
	}

	/// Looks up a generated position: 1-indexed line, 0-indexed column.
	pub fn lookup(&self, line: u32, column: u32) -> Result<Option<OriginalPosition>> {
		let Some(mapping) = self.mappings.find(line.saturating_sub(1), column) else {
			return Ok(None);
		};

		let source = self
			.sources
			.get(mapping.source as usize)
			.ok_or(SymbolicateError::InvalidSourceIndex(mapping.source))?;

		Ok(Some(OriginalPosition {
			source: source.clone(),
			line: mapping.original_line + 1,
			column: mapping.original_column,
			name: mapping.name.and_then(|n| self.names.get(n as usize).cloned()),
		}))
	}

	/// Embedded content of a resolved source path, if the map carries it.
	pub fn source_content(&self, source: &str) -> Option<&str> {
		let index = self.sources.iter().position(|s| s == source)?;
		self.sources_content.get(index)?.as_deref()
	}

	pub fn sources(&self) -> &[String] {
		&self.sources
	}

	pub fn mapping_count(&self) -> usize {
		self.mappings.len()
	}
}
