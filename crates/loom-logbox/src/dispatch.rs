// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Issuing external symbolication calls and routing their results back.
//!
//! A call runs as its own tokio task. Its result comes back as a
//! [`Settlement`] message on the settlement channel, and whoever owns the
//! entries applies it with [`crate::LogEntry::apply_settlement`]. Entries are
//! therefore only ever mutated by their owner.

use std::fmt;
use std::sync::Arc;

use loom_logbox_core::{LogId, StackFrame, StackKind, SymbolicatedStack, SymbolicationFailure};
use loom_logbox_symbolicate::Symbolicator;
use tokio::sync::mpsc;
use tracing::debug;

/// Identifies one external call issued for an entry's channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub(crate) u64);

impl fmt::Display for RequestId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// The outcome of one external call.
#[derive(Debug, Clone)]
pub struct Settlement {
	pub log_id: LogId,
	pub kind: StackKind,
	pub request_id: RequestId,
	pub result: Result<SymbolicatedStack, SymbolicationFailure>,
}

/// Hands stacks to a [`Symbolicator`] without waiting for the result.
#[derive(Clone)]
pub struct Dispatcher {
	symbolicator: Arc<dyn Symbolicator>,
	settlements: mpsc::UnboundedSender<Settlement>,
}

impl Dispatcher {
	/// Creates a dispatcher and the receiving end of its settlements.
	pub fn new(symbolicator: Arc<dyn Symbolicator>) -> (Self, mpsc::UnboundedReceiver<Settlement>) {
		let (settlements, rx) = mpsc::unbounded_channel();
		(
			Self {
				symbolicator,
				settlements,
			},
			rx,
		)
	}

	pub(crate) fn evict(&self, stack: &[StackFrame]) {
		self.symbolicator.evict(stack);
	}

	/// Starts the call on the current tokio runtime and returns immediately.
	pub(crate) fn dispatch(&self, log_id: LogId, kind: StackKind, request_id: RequestId, stack: Vec<StackFrame>) {
		let symbolicator = Arc::clone(&self.symbolicator);
		let settlements = self.settlements.clone();

		tokio::spawn(async move {
			let result = symbolicator.symbolicate(&stack).await;
			let settlement = Settlement {
				log_id,
				kind,
				request_id,
				result,
			};
			if settlements.send(settlement).is_err() {
				debug!(%log_id, %kind, %request_id, "settlement receiver gone, dropping result");
			}
		});
	}
}

impl fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatcher")
			.field("closed", &self.settlements.is_closed())
			.finish_non_exhaustive()
	}
}
