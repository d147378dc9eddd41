// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod logging;
mod symbolication;

pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use symbolication::{
	SymbolicationConfig, SymbolicationConfigLayer, SymbolicatorBackend, DEFAULT_CONTEXT_LINES, DEFAULT_ENDPOINT,
	DEFAULT_REQUEST_TIMEOUT_SECS,
};
