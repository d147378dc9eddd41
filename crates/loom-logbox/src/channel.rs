// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One symbolication channel: state, waiting observers and the call in
//! flight.

use loom_logbox_core::{StackFrame, SymbolicationFailure, SymbolicationState, SymbolicationStatus};

use crate::dispatch::RequestId;
use crate::observer::{Observer, ObserverSet};

#[derive(Debug, Default)]
pub struct StackChannel {
	state: SymbolicationState,
	observers: ObserverSet,
	in_flight: Option<RequestId>,
}

impl StackChannel {
	pub(crate) fn new(state: SymbolicationState) -> Self {
		Self {
			state,
			observers: ObserverSet::default(),
			in_flight: None,
		}
	}

	pub fn state(&self) -> &SymbolicationState {
		&self.state
	}

	pub fn status(&self) -> SymbolicationStatus {
		self.state.status()
	}

	/// Resolved stack; only present when complete.
	pub fn stack(&self) -> Option<&[StackFrame]> {
		self.state.stack()
	}

	/// Backend error; only present when failed.
	pub fn error(&self) -> Option<&SymbolicationFailure> {
		self.state.error()
	}

	pub fn observer_count(&self) -> usize {
		self.observers.len()
	}

	/// The external call whose settlement this channel will accept.
	pub fn in_flight(&self) -> Option<RequestId> {
		self.in_flight
	}

	pub(crate) fn register(&mut self, observer: Option<Observer>) {
		if let Some(observer) = observer {
			self.observers.insert(observer);
		}
	}

	/// Enters PENDING for a new call, dropping any previous stack or error.
	pub(crate) fn begin(&mut self, request_id: RequestId) {
		self.state = SymbolicationState::Pending;
		self.in_flight = Some(request_id);
	}

	/// Stores the outcome of the in-flight call.
	///
	/// Returns true when the channel just reached a terminal status it was
	/// not already in, i.e. when observers must be flushed.
	pub(crate) fn settle(&mut self, state: SymbolicationState) -> bool {
		let last = self.status();
		self.state = state;
		self.in_flight = None;

		let status = self.status();
		last != status && status.is_terminal()
	}

	/// Notifies every registered observer with the current status and
	/// clears the set. Returns how many were notified.
	pub(crate) fn flush(&mut self) -> usize {
		let status = self.status();
		let observers = self.observers.take();
		let notified = observers.len();
		for observer in observers {
			observer.notify(status);
		}
		notified
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	fn recording(seen: &Arc<Mutex<Vec<SymbolicationStatus>>>) -> Observer {
		let seen = Arc::clone(seen);
		Observer::new(move |status| seen.lock().unwrap().push(status))
	}

	#[test]
	fn test_begin_discards_previous_result() {
		let mut channel = StackChannel::new(SymbolicationState::Complete {
			stack: vec![StackFrame::new("a.ts", "f", 1, 0)],
		});

		channel.begin(RequestId(1));

		assert_eq!(channel.status(), SymbolicationStatus::Pending);
		assert!(channel.stack().is_none());
		assert_eq!(channel.in_flight(), Some(RequestId(1)));
	}

	#[test]
	fn test_settle_reports_terminal_transition() {
		let mut channel = StackChannel::default();
		channel.begin(RequestId(1));

		assert!(channel.settle(SymbolicationState::Failed {
			error: SymbolicationFailure::msg("E1"),
		}));
		assert_eq!(channel.in_flight(), None);
		assert_eq!(channel.error().map(|e| e.to_string()), Some("E1".to_string()));
	}

	#[test]
	fn test_settle_into_same_status_does_not_flush() {
		let mut channel = StackChannel::new(SymbolicationState::Complete { stack: Vec::new() });

		assert!(!channel.settle(SymbolicationState::Complete { stack: Vec::new() }));
	}

	#[test]
	fn test_flush_notifies_once_and_clears() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let mut channel = StackChannel::default();
		channel.register(Some(recording(&seen)));
		channel.register(Some(recording(&seen)));
		channel.register(None);
		channel.begin(RequestId(7));
		channel.settle(SymbolicationState::Complete { stack: Vec::new() });

		assert_eq!(channel.flush(), 2);
		assert_eq!(channel.flush(), 0);
		assert_eq!(
			*seen.lock().unwrap(),
			vec![SymbolicationStatus::Complete, SymbolicationStatus::Complete]
		);
		assert_eq!(channel.observer_count(), 0);
	}
}
