// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local symbolication through source maps.

use async_trait::async_trait;
use loom_logbox_core::{CodeFrame, StackFrame, SymbolicatedStack, SymbolicationFailure};
use tracing::{debug, instrument, warn};

use crate::code_frame::code_frame;
use crate::lookup::SourceMapLookup;
use crate::service::Symbolicator;

/// Lines of context above and below the highlighted line.
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Symbolicates stacks with source maps from a [`SourceMapLookup`].
///
/// Frames without a source map or without a mapping are kept as they are.
pub struct SourceMapSymbolicator<L> {
	lookup: L,
	context_lines: usize,
}

impl<L: SourceMapLookup> SourceMapSymbolicator<L> {
	pub fn new(lookup: L) -> Self {
		Self {
			lookup,
			context_lines: DEFAULT_CONTEXT_LINES,
		}
	}

	pub fn with_context_lines(mut self, context_lines: usize) -> Self {
		self.context_lines = context_lines;
		self
	}

	/// Maps every frame and renders a code frame for the first visible
	/// frame whose original source is embedded.
	pub fn symbolicate_frames(&self, stack: &[StackFrame]) -> SymbolicatedStack {
		let mut code: Option<CodeFrame> = None;

		let frames = stack
			.iter()
			.map(|frame| {
				let Some(mapped) = self.map_frame(frame) else {
					return frame.clone();
				};
				if code.is_none() && !mapped.frame.collapse {
					code = mapped.code_frame;
				}
				mapped.frame
			})
			.collect();

		SymbolicatedStack {
			stack: frames,
			code_frame: code,
		}
	}

	fn map_frame(&self, frame: &StackFrame) -> Option<MappedFrame> {
		let (Some(file), Some(line), Some(column)) = (&frame.file, frame.line_number, frame.column) else {
			return None;
		};

		let Some(map) = self.lookup.source_map(file) else {
			debug!(file = %file, "no source map for frame");
			return None;
		};

		let original = match map.lookup(line, column) {
			Ok(Some(original)) => original,
			Ok(None) => {
				debug!(file = %file, line, column, "no mapping for position");
				return None;
			}
			Err(e) => {
				warn!(file = %file, error = %e, "source map lookup failed");
				return None;
			}
		};

		let code_frame = map
			.source_content(&original.source)
			.and_then(|content| code_frame(&original.source, content, original.line, original.column, self.context_lines));

		let method_name = match original.name {
			Some(name) if frame.method_name.is_empty() => name,
			_ => frame.method_name.clone(),
		};

		Some(MappedFrame {
			frame: StackFrame {
				file: Some(original.source),
				method_name,
				line_number: Some(original.line),
				column: Some(original.column),
				arguments: frame.arguments.clone(),
				collapse: frame.collapse,
			},
			code_frame,
		})
	}
}

struct MappedFrame {
	frame: StackFrame,
	code_frame: Option<CodeFrame>,
}

#[async_trait]
impl<L: SourceMapLookup> Symbolicator for SourceMapSymbolicator<L> {
	#[instrument(skip_all, fields(frame_count = stack.len()))]
	async fn symbolicate(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack, SymbolicationFailure> {
		Ok(self.symbolicate_frames(stack))
	}
}
