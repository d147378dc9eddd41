// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The interface the tracker consumes to symbolicate a stack.

use std::sync::Arc;

use async_trait::async_trait;
use loom_logbox_core::{StackFrame, SymbolicatedStack, SymbolicationFailure};

/// An external symbolication service.
#[async_trait]
pub trait Symbolicator: Send + Sync {
	/// Maps a bundled stack back to original source positions.
	async fn symbolicate(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack, SymbolicationFailure>;

	/// Drops any cached result for an identical stack.
	fn evict(&self, _stack: &[StackFrame]) {}
}

#[async_trait]
impl<S: Symbolicator + ?Sized> Symbolicator for Arc<S> {
	async fn symbolicate(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack, SymbolicationFailure> {
		(**self).symbolicate(stack).await
	}

	fn evict(&self, stack: &[StackFrame]) {
		(**self).evict(stack)
	}
}
