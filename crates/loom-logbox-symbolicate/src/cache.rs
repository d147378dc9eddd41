// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared symbolication cache keyed by stack value.
//!
//! The cache does not care which stack kind a stack came from: two log
//! entries with an identical stack share one call and one result. Failures
//! are cached the same way as successes until the stack is evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use loom_logbox_core::{StackFrame, SymbolicatedStack, SymbolicationFailure};
use tracing::{debug, instrument};

use crate::service::Symbolicator;

type PendingResult = Shared<BoxFuture<'static, Result<SymbolicatedStack, SymbolicationFailure>>>;

/// Wraps a [`Symbolicator`] so identical stacks are symbolicated once.
pub struct CachedSymbolicator<S> {
	inner: Arc<S>,
	entries: Mutex<HashMap<Vec<StackFrame>, PendingResult>>,
}

impl<S: Symbolicator + 'static> CachedSymbolicator<S> {
	pub fn new(inner: S) -> Self {
		Self {
			inner: Arc::new(inner),
			entries: Mutex::new(HashMap::new()),
		}
	}

	/// Number of cached stacks, settled or not.
	pub fn len(&self) -> usize {
		self.entries().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn contains(&self, stack: &[StackFrame]) -> bool {
		self.entries().contains_key(stack)
	}

	fn entries(&self) -> MutexGuard<'_, HashMap<Vec<StackFrame>, PendingResult>> {
		// The map stays consistent even if a holder panicked.
		self.entries.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

#[async_trait]
impl<S: Symbolicator + 'static> Symbolicator for CachedSymbolicator<S> {
	#[instrument(skip_all, fields(frame_count = stack.len()))]
	async fn symbolicate(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack, SymbolicationFailure> {
		let pending = {
			let mut entries = self.entries();
			match entries.get(stack) {
				Some(existing) => {
					debug!("reusing cached symbolication");
					existing.clone()
				}
				None => {
					let inner = Arc::clone(&self.inner);
					let owned = stack.to_vec();
					let fresh = async move { inner.symbolicate(&owned).await }
						.boxed()
						.shared();
					entries.insert(stack.to_vec(), fresh.clone());
					fresh
				}
			}
		};

		pending.await
	}

	fn evict(&self, stack: &[StackFrame]) {
		if self.entries().remove(stack).is_some() {
			debug!(frame_count = stack.len(), "evicted cached symbolication");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct CountingSymbolicator {
		calls: Arc<AtomicUsize>,
		fail: bool,
	}

	#[async_trait]
	impl Symbolicator for CountingSymbolicator {
		async fn symbolicate(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack, SymbolicationFailure> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if self.fail {
				return Err(SymbolicationFailure::msg("offline"));
			}
			Ok(SymbolicatedStack {
				stack: stack.to_vec(),
				code_frame: None,
			})
		}
	}

	fn counting(fail: bool) -> (CachedSymbolicator<CountingSymbolicator>, Arc<AtomicUsize>) {
		let calls = Arc::new(AtomicUsize::new(0));
		let cache = CachedSymbolicator::new(CountingSymbolicator {
			calls: Arc::clone(&calls),
			fail,
		});
		(cache, calls)
	}

	fn stack() -> Vec<StackFrame> {
		vec![StackFrame::new("a.js", "main", 10, 2)]
	}

	#[tokio::test]
	async fn test_identical_stacks_share_one_call() {
		let (cache, calls) = counting(false);

		let first = cache.symbolicate(&stack()).await.unwrap();
		let second = cache.symbolicate(&stack()).await.unwrap();

		assert_eq!(first, second);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(cache.contains(&stack()));
	}

	#[tokio::test]
	async fn test_concurrent_requests_share_one_call() {
		let (cache, calls) = counting(false);
		let stack = stack();

		let (a, b) = tokio::join!(cache.symbolicate(&stack), cache.symbolicate(&stack));

		assert!(a.is_ok() && b.is_ok());
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_failures_are_cached_until_evicted() {
		let (cache, calls) = counting(true);

		assert!(cache.symbolicate(&stack()).await.is_err());
		assert!(cache.symbolicate(&stack()).await.is_err());
		assert_eq!(calls.load(Ordering::SeqCst), 1);

		cache.evict(&stack());
		assert!(cache.is_empty());

		assert!(cache.symbolicate(&stack()).await.is_err());
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_distinct_stacks_are_separate_entries() {
		let (cache, calls) = counting(false);

		cache.symbolicate(&stack()).await.unwrap();
		cache
			.symbolicate(&[StackFrame::new("b.js", "other", 1, 0)])
			.await
			.unwrap();

		assert_eq!(cache.len(), 2);
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn test_evicting_unknown_stack_is_noop() {
		let (cache, _) = counting(false);
		cache.evict(&stack());
		assert!(cache.is_empty());
	}
}
