// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Observers waiting for a channel to settle.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use loom_logbox_core::SymbolicationStatus;

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a registered observer.
///
/// Registering a second observer with an id already waiting on a channel is
/// a no-op, so one observer is never notified twice by the same flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
	/// Allocates a process-unique id.
	pub fn next() -> Self {
		Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for ObserverId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "observer-{}", self.0)
	}
}

type Callback = Box<dyn FnOnce(SymbolicationStatus) + Send>;

/// A one-shot callback invoked with the channel status at flush time.
pub struct Observer {
	id: ObserverId,
	callback: Callback,
}

impl Observer {
	pub fn new(callback: impl FnOnce(SymbolicationStatus) + Send + 'static) -> Self {
		Self::with_id(ObserverId::next(), callback)
	}

	pub fn with_id(id: ObserverId, callback: impl FnOnce(SymbolicationStatus) + Send + 'static) -> Self {
		Self {
			id,
			callback: Box::new(callback),
		}
	}

	pub fn id(&self) -> ObserverId {
		self.id
	}

	pub(crate) fn notify(self, status: SymbolicationStatus) {
		(self.callback)(status)
	}
}

impl fmt::Debug for Observer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observer").field("id", &self.id).finish_non_exhaustive()
	}
}

/// Observers registered on one channel, in registration order.
#[derive(Debug, Default)]
pub(crate) struct ObserverSet {
	observers: Vec<Observer>,
}

impl ObserverSet {
	/// Returns false, dropping `observer`, when its id is already present.
	pub(crate) fn insert(&mut self, observer: Observer) -> bool {
		if self.contains(observer.id) {
			return false;
		}
		self.observers.push(observer);
		true
	}

	pub(crate) fn contains(&self, id: ObserverId) -> bool {
		self.observers.iter().any(|o| o.id == id)
	}

	pub(crate) fn len(&self) -> usize {
		self.observers.len()
	}

	/// Empties the set, handing the observers to the caller.
	pub(crate) fn take(&mut self) -> Vec<Observer> {
		std::mem::take(&mut self.observers)
	}
}
