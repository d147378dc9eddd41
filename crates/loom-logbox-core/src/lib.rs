// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom error overlay log model.
//!
//! This crate provides the shared vocabulary used by the symbolication
//! tracker (`loom-logbox`) and the symbolication backends
//! (`loom-logbox-symbolicate`):
//!
//! - Stack frames, UI component frames and rendered code frames
//! - Log levels and messages
//! - The two stack kinds tracked per log entry
//! - Per-channel symbolication status and state
//! - The opaque failure value produced by a symbolication backend

pub mod error;
pub mod frame;
pub mod log;
pub mod state;

pub use error::{LogBoxError, Result};
pub use frame::{component_stack_to_stack, CodeFrame, CodeLocation, ComponentFrame, StackFrame};
pub use log::{LogLevel, LogMessage, Substitution};
pub use state::{
	StackKind, SymbolicatedStack, SymbolicationFailure, SymbolicationState, SymbolicationStatus,
};

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a single log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct LogId(pub Uuid);

impl LogId {
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Default for LogId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for LogId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for LogId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}
