// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for symbolication backends.

use loom_logbox_core::SymbolicationFailure;
use thiserror::Error;

/// Errors that can occur during symbolication.
#[derive(Debug, Error)]
pub enum SymbolicateError {
	#[error("Invalid source map JSON: {0}")]
	InvalidSourceMapJson(#[from] serde_json::Error),

	#[error("Invalid source map version: expected 3, got {0}")]
	InvalidSourceMapVersion(u32),

	#[error("Invalid VLQ character: {0}")]
	InvalidVlqChar(char),

	#[error("Unterminated VLQ segment: {0}")]
	UnterminatedVlq(String),

	#[error("VLQ value out of range: {0}")]
	VlqOverflow(String),

	#[error("Invalid source index: {0}")]
	InvalidSourceIndex(u32),

	#[error("Invalid symbolication endpoint: {0}")]
	InvalidEndpoint(String),

	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("Symbolication server returned {status}: {message}")]
	Server { status: u16, message: String },

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl From<SymbolicateError> for SymbolicationFailure {
	fn from(error: SymbolicateError) -> Self {
		SymbolicationFailure::new(error)
	}
}

pub type Result<T> = std::result::Result<T, SymbolicateError>;
