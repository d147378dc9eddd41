// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scripted symbolicator and observers shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loom_logbox_core::{StackFrame, SymbolicatedStack, SymbolicationFailure, SymbolicationStatus};
use loom_logbox_symbolicate::Symbolicator;
use tokio::sync::Semaphore;

use crate::observer::Observer;

/// Records every call and eviction; each call waits for one permit from
/// [`Scripted::release`] and then returns the current outcome.
pub(crate) struct Scripted {
	calls: Mutex<Vec<Vec<StackFrame>>>,
	evictions: Mutex<Vec<Vec<StackFrame>>>,
	outcome: Mutex<Result<SymbolicatedStack, SymbolicationFailure>>,
	gate: Semaphore,
}

impl Scripted {
	pub(crate) fn resolving(stack: Vec<StackFrame>) -> Arc<Self> {
		Arc::new(Self {
			calls: Mutex::new(Vec::new()),
			evictions: Mutex::new(Vec::new()),
			outcome: Mutex::new(Ok(SymbolicatedStack {
				stack,
				code_frame: None,
			})),
			gate: Semaphore::new(0),
		})
	}

	pub(crate) fn rejecting(message: &str) -> Arc<Self> {
		let scripted = Self::resolving(Vec::new());
		scripted.set_outcome(Err(SymbolicationFailure::msg(message)));
		scripted
	}

	pub(crate) fn set_outcome(&self, outcome: Result<SymbolicatedStack, SymbolicationFailure>) {
		*self.outcome.lock().unwrap() = outcome;
	}

	pub(crate) fn release(&self, calls: usize) {
		self.gate.add_permits(calls);
	}

	pub(crate) fn call_count(&self) -> usize {
		self.calls.lock().unwrap().len()
	}

	pub(crate) fn evictions(&self) -> Vec<Vec<StackFrame>> {
		self.evictions.lock().unwrap().clone()
	}
}

#[async_trait]
impl Symbolicator for Scripted {
	async fn symbolicate(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack, SymbolicationFailure> {
		self.calls.lock().unwrap().push(stack.to_vec());
		if let Ok(permit) = self.gate.acquire().await {
			permit.forget();
		}
		self.outcome.lock().unwrap().clone()
	}

	fn evict(&self, stack: &[StackFrame]) {
		self.evictions.lock().unwrap().push(stack.to_vec());
	}
}

pub(crate) type Seen = Arc<Mutex<Vec<SymbolicationStatus>>>;

pub(crate) fn seen() -> Seen {
	Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn recording(seen: &Seen) -> Observer {
	let seen = Arc::clone(seen);
	Observer::new(move |status| seen.lock().unwrap().push(status))
}
