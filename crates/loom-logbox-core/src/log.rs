// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log level and message types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LogBoxError;

/// Severity of a log entry shown in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
	Warn,
	Error,
	/// Uncaught exception that brought the app down
	Fatal,
	/// Bundler syntax error
	Syntax,
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Warn => write!(f, "warn"),
			Self::Error => write!(f, "error"),
			Self::Fatal => write!(f, "fatal"),
			Self::Syntax => write!(f, "syntax"),
		}
	}
}

impl FromStr for LogLevel {
	type Err = LogBoxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"warn" => Ok(Self::Warn),
			"error" => Ok(Self::Error),
			"fatal" => Ok(Self::Fatal),
			"syntax" => Ok(Self::Syntax),
			_ => Err(LogBoxError::InvalidLevel(s.to_string())),
		}
	}
}

/// A highlighted range inside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
	pub offset: usize,
	pub length: usize,
}

/// The message of a log entry with its format substitutions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
	pub content: String,
	#[serde(default)]
	pub substitutions: Vec<Substitution>,
}

impl LogMessage {
	pub fn new(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			substitutions: Vec::new(),
		}
	}
}

impl From<&str> for LogMessage {
	fn from(content: &str) -> Self {
		Self::new(content)
	}
}
