// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A log entry and its two symbolication channels.
//!
//! Each entry tracks the `stack` and `component` channels independently:
//!
//! ```text
//! NONE ──request──▶ PENDING ──resolve──▶ COMPLETE ──retry──▶ PENDING
//!                          └──reject───▶ FAILED   ──retry──▶ PENDING
//! ```
//!
//! Requests arriving while a call is in flight join it instead of issuing a
//! new one. Observers are notified once per transition into COMPLETE or
//! FAILED, and immediately when they register on a channel that is already
//! in one of those states.

use std::sync::OnceLock;

use loom_logbox_core::{
	component_stack_to_stack, CodeFrame, ComponentFrame, LogId, LogLevel, LogMessage, StackFrame, StackKind,
	SymbolicatedStack, SymbolicationState, SymbolicationStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::channel::StackChannel;
use crate::dispatch::{Dispatcher, RequestId, Settlement};
use crate::observer::Observer;

/// Log type used when the data does not name one.
pub const DEFAULT_LOG_TYPE: &str = "error";

/// Initial channel states, e.g. when restoring a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolicationSeed {
	#[serde(default)]
	pub stack: SymbolicationState,
	#[serde(default)]
	pub component: SymbolicationState,
}

/// Everything needed to construct a [`LogEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryData {
	pub level: LogLevel,
	#[serde(default, rename = "type")]
	pub log_type: Option<String>,
	pub message: LogMessage,
	#[serde(default)]
	pub stack: Vec<StackFrame>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub component_stack: Option<Vec<ComponentFrame>>,
	#[serde(default)]
	pub code_frame: Option<CodeFrame>,
	#[serde(default)]
	pub is_component_error: bool,
	#[serde(default)]
	pub symbolicated: Option<SymbolicationSeed>,
}

impl LogEntryData {
	pub fn new(level: LogLevel, message: impl Into<LogMessage>, stack: Vec<StackFrame>) -> Self {
		Self {
			level,
			log_type: None,
			message: message.into(),
			stack,
			category: None,
			component_stack: None,
			code_frame: None,
			is_component_error: false,
			symbolicated: None,
		}
	}

	pub fn with_type(mut self, log_type: impl Into<String>) -> Self {
		self.log_type = Some(log_type.into());
		self
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	pub fn with_component_stack(mut self, component_stack: Vec<ComponentFrame>) -> Self {
		self.component_stack = Some(component_stack);
		self
	}

	pub fn with_code_frame(mut self, code_frame: CodeFrame) -> Self {
		self.code_frame = Some(code_frame);
		self
	}

	pub fn with_symbolicated(mut self, seed: SymbolicationSeed) -> Self {
		self.symbolicated = Some(seed);
		self
	}
}

#[derive(Debug, Default)]
struct Channels {
	stack: StackChannel,
	component: StackChannel,
}

/// One entry of the error overlay.
///
/// Must be driven from within a tokio runtime: symbolication calls are
/// spawned as tasks and their results are fed back through
/// [`LogEntry::apply_settlement`].
#[derive(Debug)]
pub struct LogEntry {
	id: LogId,
	level: LogLevel,
	log_type: String,
	message: LogMessage,
	category: Option<String>,
	stack: Vec<StackFrame>,
	component_stack: Option<Vec<ComponentFrame>>,
	code_frame: Option<CodeFrame>,
	is_component_error: bool,
	count: u64,
	channels: Channels,
	derived_component_stack: OnceLock<Vec<StackFrame>>,
	next_request: u64,
	dispatcher: Dispatcher,
}

impl LogEntry {
	pub fn new(data: LogEntryData, dispatcher: Dispatcher) -> Self {
		Self::with_id(LogId::new(), data, dispatcher)
	}

	pub fn with_id(id: LogId, data: LogEntryData, dispatcher: Dispatcher) -> Self {
		let seed = data.symbolicated.unwrap_or_default();
		Self {
			id,
			level: data.level,
			log_type: data.log_type.unwrap_or_else(|| DEFAULT_LOG_TYPE.to_string()),
			message: data.message,
			category: data.category,
			stack: data.stack,
			component_stack: data.component_stack,
			code_frame: data.code_frame,
			is_component_error: data.is_component_error,
			count: 1,
			channels: Channels {
				stack: StackChannel::new(seed.stack),
				component: StackChannel::new(seed.component),
			},
			derived_component_stack: OnceLock::new(),
			next_request: 0,
			dispatcher,
		}
	}

	pub fn id(&self) -> LogId {
		self.id
	}

	pub fn level(&self) -> LogLevel {
		self.level
	}

	pub fn log_type(&self) -> &str {
		&self.log_type
	}

	pub fn message(&self) -> &LogMessage {
		&self.message
	}

	pub fn category(&self) -> Option<&str> {
		self.category.as_deref()
	}

	/// The raw JavaScript stack as captured.
	pub fn raw_stack(&self) -> &[StackFrame] {
		&self.stack
	}

	pub fn component_stack(&self) -> Option<&[ComponentFrame]> {
		self.component_stack.as_deref()
	}

	/// Only replaced by a successful symbolication that returns one.
	pub fn code_frame(&self) -> Option<&CodeFrame> {
		self.code_frame.as_ref()
	}

	pub fn is_component_error(&self) -> bool {
		self.is_component_error
	}

	/// How many times this log occurred.
	pub fn count(&self) -> u64 {
		self.count
	}

	pub fn increment_count(&mut self) {
		self.count = self.count.saturating_add(1);
	}

	pub fn channel(&self, kind: StackKind) -> &StackChannel {
		match kind {
			StackKind::Stack => &self.channels.stack,
			StackKind::Component => &self.channels.component,
		}
	}

	fn channel_mut(&mut self, kind: StackKind) -> &mut StackChannel {
		match kind {
			StackKind::Stack => &mut self.channels.stack,
			StackKind::Component => &mut self.channels.component,
		}
	}

	pub fn status(&self, kind: StackKind) -> SymbolicationStatus {
		self.channel(kind).status()
	}

	pub fn has_component_stack(&self) -> bool {
		self.component_stack.as_ref().is_some_and(|c| !c.is_empty())
	}

	/// Whether requests for `kind` can ever leave NONE.
	pub fn can_symbolicate(&self, kind: StackKind) -> bool {
		match kind {
			StackKind::Stack => true,
			StackKind::Component => self.has_component_stack(),
		}
	}

	/// The unsymbolicated stack for `kind`.
	///
	/// For the component kind this is the component stack translated into
	/// stack frames, computed on first access and kept for the lifetime of
	/// the entry. An entry without component frames yields an empty stack.
	pub fn stack(&self, kind: StackKind) -> &[StackFrame] {
		match kind {
			StackKind::Stack => &self.stack,
			StackKind::Component => match self.component_stack.as_deref() {
				Some(frames) if !frames.is_empty() => self
					.derived_component_stack
					.get_or_init(|| component_stack_to_stack(frames))
					.as_slice(),
				_ => &[],
			},
		}
	}

	/// The best stack to show right now: the symbolicated one when complete,
	/// the unsymbolicated one otherwise.
	pub fn available_stack(&self, kind: StackKind) -> &[StackFrame] {
		match self.channel(kind).stack() {
			Some(resolved) => resolved,
			None => self.stack(kind),
		}
	}

	/// Requests symbolication of `kind`.
	///
	/// Joins a call already in flight, and notifies `observer` right away
	/// when the channel is already COMPLETE or FAILED. Never retries.
	pub fn symbolicate(&mut self, kind: StackKind, observer: Option<Observer>) {
		self.request(kind, false, observer);
	}

	/// Forces a fresh symbolication of `kind`, evicting any cached result
	/// for its stack first.
	pub fn retry_symbolicate(&mut self, kind: StackKind, observer: Option<Observer>) {
		self.request(kind, true, observer);
	}

	fn request(&mut self, kind: StackKind, retry: bool, observer: Option<Observer>) {
		if !self.can_symbolicate(kind) {
			debug!(log_id = %self.id, %kind, retry, "no component stack, ignoring symbolication request");
			return;
		}

		let channel = self.channel_mut(kind);
		channel.register(observer);
		let status = channel.status();
		let joinable = channel.in_flight().is_some();

		match status {
			SymbolicationStatus::Complete | SymbolicationStatus::Failed if !retry => {
				self.flush(kind);
			}
			SymbolicationStatus::Pending if joinable => {
				if retry {
					self.dispatcher.evict(self.stack(kind));
				}
				debug!(log_id = %self.id, %kind, retry, "joining symbolication in flight");
			}
			_ => {
				if retry {
					self.dispatcher.evict(self.stack(kind));
				}
				self.begin(kind);
			}
		}
	}

	fn begin(&mut self, kind: StackKind) {
		self.next_request += 1;
		let request_id = RequestId(self.next_request);
		let stack = self.stack(kind).to_vec();

		let channel = self.channel_mut(kind);
		let previous = channel.status();
		channel.begin(request_id);

		debug!(
			log_id = %self.id,
			%kind,
			%request_id,
			%previous,
			frame_count = stack.len(),
			"symbolication started"
		);
		self.dispatcher.dispatch(self.id, kind, request_id, stack);
	}

	/// Applies the result of an external call.
	///
	/// Results for another entry, or for a call that is no longer the one in
	/// flight on the channel, are discarded and `false` is returned.
	pub fn apply_settlement(&mut self, settlement: Settlement) -> bool {
		let Settlement {
			log_id,
			kind,
			request_id,
			result,
		} = settlement;

		if log_id != self.id {
			warn!(log_id = %self.id, settlement_log_id = %log_id, "settlement routed to the wrong log");
			return false;
		}

		if self.channel(kind).in_flight() != Some(request_id) {
			debug!(log_id = %self.id, %kind, %request_id, "discarding superseded settlement");
			return false;
		}

		let next = match result {
			Ok(SymbolicatedStack { stack, code_frame }) => {
				if let Some(code_frame) = code_frame {
					self.code_frame = Some(code_frame);
				}
				SymbolicationState::Complete { stack }
			}
			Err(error) => {
				warn!(log_id = %self.id, %kind, error = %error, "symbolication failed");
				SymbolicationState::Failed { error }
			}
		};

		if self.channel_mut(kind).settle(next) {
			info!(log_id = %self.id, %kind, status = %self.status(kind), "symbolication settled");
			self.flush(kind);
		}
		true
	}

	fn flush(&mut self, kind: StackKind) {
		let notified = self.channel_mut(kind).flush();
		if notified > 0 {
			debug!(log_id = %self.id, %kind, notified, "flushed observers");
		}
	}
}
