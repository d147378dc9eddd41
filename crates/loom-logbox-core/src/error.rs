// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the log model.

use thiserror::Error;

/// Errors raised while parsing log model values.
#[derive(Debug, Error)]
pub enum LogBoxError {
	#[error("invalid log level: {0}")]
	InvalidLevel(String),

	#[error("invalid stack kind: {0}")]
	InvalidStackKind(String),

	#[error("invalid symbolication status: {0}")]
	InvalidStatus(String),
}

/// Result type for log model operations.
pub type Result<T> = std::result::Result<T, LogBoxError>;
