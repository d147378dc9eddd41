// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolication status and per-channel state.

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LogBoxError;
use crate::frame::{CodeFrame, StackFrame};

/// Which of the two stacks of a log entry a request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackKind {
	/// The JavaScript stack trace.
	Stack,
	/// The UI component stack.
	Component,
}

impl StackKind {
	pub const ALL: [StackKind; 2] = [StackKind::Stack, StackKind::Component];
}

impl fmt::Display for StackKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Stack => write!(f, "stack"),
			Self::Component => write!(f, "component"),
		}
	}
}

impl FromStr for StackKind {
	type Err = LogBoxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"stack" => Ok(Self::Stack),
			"component" => Ok(Self::Component),
			_ => Err(LogBoxError::InvalidStackKind(s.to_string())),
		}
	}
}

/// Symbolication status of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolicationStatus {
	None,
	Pending,
	Complete,
	Failed,
}

impl SymbolicationStatus {
	/// COMPLETE and FAILED; no further transition happens without a retry.
	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Complete | Self::Failed)
	}
}

impl fmt::Display for SymbolicationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => write!(f, "NONE"),
			Self::Pending => write!(f, "PENDING"),
			Self::Complete => write!(f, "COMPLETE"),
			Self::Failed => write!(f, "FAILED"),
		}
	}
}

impl FromStr for SymbolicationStatus {
	type Err = LogBoxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"NONE" => Ok(Self::None),
			"PENDING" => Ok(Self::Pending),
			"COMPLETE" => Ok(Self::Complete),
			"FAILED" => Ok(Self::Failed),
			_ => Err(LogBoxError::InvalidStatus(s.to_string())),
		}
	}
}

/// Opaque error produced by a symbolication backend.
///
/// Stored verbatim on a failed channel. Cloning shares the underlying error.
#[derive(Clone)]
pub struct SymbolicationFailure(Arc<dyn StdError + Send + Sync + 'static>);

#[derive(Debug)]
struct OpaqueFailure(String);

impl fmt::Display for OpaqueFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl StdError for OpaqueFailure {}

impl SymbolicationFailure {
	pub fn new<E>(error: E) -> Self
	where
		E: StdError + Send + Sync + 'static,
	{
		Self(Arc::new(error))
	}

	/// Failure carrying only a message.
	pub fn msg(message: impl Into<String>) -> Self {
		Self::new(OpaqueFailure(message.into()))
	}

	pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
		self.0.downcast_ref::<E>()
	}
}

impl fmt::Debug for SymbolicationFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SymbolicationFailure").field(&self.0).finish()
	}
}

impl fmt::Display for SymbolicationFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl PartialEq for SymbolicationFailure {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0) || self.to_string() == other.to_string()
	}
}

impl Serialize for SymbolicationFailure {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for SymbolicationFailure {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let message = String::deserialize(deserializer)?;
		Ok(Self::msg(message))
	}
}

/// Successful result of a symbolication call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolicatedStack {
	pub stack: Vec<StackFrame>,
	#[serde(default)]
	pub code_frame: Option<CodeFrame>,
}

/// State of one symbolication channel.
///
/// The resolved stack exists only when complete and the error only when
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolicationState {
	#[default]
	None,
	Pending,
	Complete { stack: Vec<StackFrame> },
	Failed { error: SymbolicationFailure },
}

impl SymbolicationState {
	pub fn status(&self) -> SymbolicationStatus {
		match self {
			Self::None => SymbolicationStatus::None,
			Self::Pending => SymbolicationStatus::Pending,
			Self::Complete { .. } => SymbolicationStatus::Complete,
			Self::Failed { .. } => SymbolicationStatus::Failed,
		}
	}

	pub fn stack(&self) -> Option<&[StackFrame]> {
		match self {
			Self::Complete { stack } => Some(stack),
			_ => None,
		}
	}

	pub fn error(&self) -> Option<&SymbolicationFailure> {
		match self {
			Self::Failed { error } => Some(error),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_terminal_statuses() {
		assert!(!SymbolicationStatus::None.is_terminal());
		assert!(!SymbolicationStatus::Pending.is_terminal());
		assert!(SymbolicationStatus::Complete.is_terminal());
		assert!(SymbolicationStatus::Failed.is_terminal());
	}

	#[test]
	fn test_state_payload_matches_status() {
		let complete = SymbolicationState::Complete {
			stack: vec![StackFrame::new("a.ts", "f", 5, 1)],
		};
		assert_eq!(complete.status(), SymbolicationStatus::Complete);
		assert!(complete.stack().is_some());
		assert!(complete.error().is_none());

		let failed = SymbolicationState::Failed {
			error: SymbolicationFailure::msg("E1"),
		};
		assert_eq!(failed.status(), SymbolicationStatus::Failed);
		assert!(failed.stack().is_none());
		assert_eq!(failed.error().map(|e| e.to_string()), Some("E1".to_string()));

		assert!(SymbolicationState::Pending.stack().is_none());
		assert!(SymbolicationState::Pending.error().is_none());
	}

	#[test]
	fn test_failure_keeps_source_error() {
		let io = std::io::Error::new(std::io::ErrorKind::NotFound, "bundle.js.map");
		let failure = SymbolicationFailure::new(io);

		assert_eq!(failure.to_string(), "bundle.js.map");
		assert!(failure.downcast_ref::<std::io::Error>().is_some());
	}

	#[test]
	fn test_state_serializes_with_status_tag() {
		let state = SymbolicationState::Failed {
			error: SymbolicationFailure::msg("unreachable"),
		};

		let json = serde_json::to_value(&state).unwrap();
		assert_eq!(json["status"], "FAILED");
		assert_eq!(json["error"], "unreachable");

		let parsed: SymbolicationState = serde_json::from_value(json).unwrap();
		assert_eq!(parsed, state);
	}

	#[test]
	fn test_none_state_deserializes() {
		let state: SymbolicationState = serde_json::from_str(r#"{"status": "NONE"}"#).unwrap();
		assert_eq!(state, SymbolicationState::None);
	}

	proptest! {
		#[test]
		fn stack_kind_roundtrip(kind in prop_oneof![Just(StackKind::Stack), Just(StackKind::Component)]) {
			let parsed: StackKind = kind.to_string().parse().unwrap();
			prop_assert_eq!(kind, parsed);
		}

		#[test]
		fn status_roundtrip(status in prop_oneof![
			Just(SymbolicationStatus::None),
			Just(SymbolicationStatus::Pending),
			Just(SymbolicationStatus::Complete),
			Just(SymbolicationStatus::Failed),
		]) {
			let parsed: SymbolicationStatus = status.to_string().parse().unwrap();
			prop_assert_eq!(status, parsed);
		}

		#[test]
		fn unknown_status_rejected(s in "[a-z]{1,12}") {
			prop_assert!(s.parse::<SymbolicationStatus>().is_err());
		}
	}
}
