// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Owned snapshots of log entries for rendering.

use loom_logbox_core::{CodeFrame, LogId, LogLevel, LogMessage, StackFrame, StackKind, SymbolicationStatus};
use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;

/// One channel as the overlay renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelView {
	pub status: SymbolicationStatus,
	/// The symbolicated stack when complete, the raw one otherwise.
	pub stack: Vec<StackFrame>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ChannelView {
	fn of(entry: &LogEntry, kind: StackKind) -> Self {
		let channel = entry.channel(kind);
		Self {
			status: channel.status(),
			stack: entry.available_stack(kind).to_vec(),
			error: channel.error().map(|e| e.to_string()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogView {
	pub id: LogId,
	pub level: LogLevel,
	#[serde(rename = "type")]
	pub log_type: String,
	pub message: LogMessage,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_frame: Option<CodeFrame>,
	pub is_component_error: bool,
	pub count: u64,
	pub stack: ChannelView,
	pub component: ChannelView,
}

impl LogView {
	pub fn channel(&self, kind: StackKind) -> &ChannelView {
		match kind {
			StackKind::Stack => &self.stack,
			StackKind::Component => &self.component,
		}
	}
}

impl From<&LogEntry> for LogView {
	fn from(entry: &LogEntry) -> Self {
		Self {
			id: entry.id(),
			level: entry.level(),
			log_type: entry.log_type().to_string(),
			message: entry.message().clone(),
			category: entry.category().map(str::to_string),
			code_frame: entry.code_frame().cloned(),
			is_component_error: entry.is_component_error(),
			count: entry.count(),
			stack: ChannelView::of(entry, StackKind::Stack),
			component: ChannelView::of(entry, StackKind::Component),
		}
	}
}

impl LogEntry {
	pub fn view(&self) -> LogView {
		LogView::from(self)
	}
}
