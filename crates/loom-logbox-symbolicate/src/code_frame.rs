// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Code frame rendering from embedded source content.

use loom_logbox_core::{CodeFrame, CodeLocation};

/// Extracts source lines around `line` (1-indexed).
///
/// Returns (pre_context, context_line, post_context), or `None` when the
/// line is outside the source.
pub fn extract_context(source: &str, line: usize, context_lines: usize) -> Option<(Vec<&str>, &str, Vec<&str>)> {
	let lines: Vec<&str> = source.lines().collect();
	let idx = line.checked_sub(1)?;
	let context_line = *lines.get(idx)?;

	let pre = lines[idx.saturating_sub(context_lines)..idx].to_vec();
	let post_end = (idx + 1 + context_lines).min(lines.len());
	let post = lines[idx + 1..post_end].to_vec();

	Some((pre, context_line, post))
}

/// Renders a plain-text code frame with a line-number gutter and a caret
/// under `column` (0-indexed) of `line` (1-indexed).
pub fn render_code_frame(source: &str, line: u32, column: u32, context_lines: usize) -> Option<String> {
	let line = line as usize;
	let (pre, target, post) = extract_context(source, line, context_lines)?;

	let first = line - pre.len();
	let last = line + post.len();
	let width = last.to_string().len();

	let mut out = Vec::with_capacity(pre.len() + post.len() + 2);
	for (offset, text) in pre.iter().enumerate() {
		out.push(format!("  {:>width$} | {}", first + offset, text));
	}
	out.push(format!("> {:>width$} | {}", line, target));
	out.push(format!("  {:>width$} | {}^", "", " ".repeat(column as usize)));
	for (offset, text) in post.iter().enumerate() {
		out.push(format!("  {:>width$} | {}", line + 1 + offset, text));
	}

	Some(out.join("\n"))
}

/// Builds a [`CodeFrame`] for a resolved position.
pub fn code_frame(
	file_name: &str,
	source: &str,
	line: u32,
	column: u32,
	context_lines: usize,
) -> Option<CodeFrame> {
	let content = render_code_frame(source, line, column, context_lines)?;
	Some(CodeFrame {
		content,
		location: Some(CodeLocation { row: line, column }),
		file_name: file_name.to_string(),
	})
}
