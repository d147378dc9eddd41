// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the log tracker.

use loom_logbox_core::LogId;
use thiserror::Error;

/// Errors returned by [`crate::LogBoxHandle`].
#[derive(Debug, Error)]
pub enum TrackerError {
	/// No entry with this id is tracked.
	#[error("log not found: {0}")]
	LogNotFound(LogId),

	/// The entry went away before its symbolication settled.
	#[error("log {0} was removed before symbolication settled")]
	Removed(LogId),

	/// The event loop has stopped.
	#[error("log box event loop has shut down")]
	Closed,
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
