// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as loaded from one source.

use serde::{Deserialize, Serialize};

use crate::sections::{LoggingConfigLayer, SymbolicationConfigLayer};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogBoxConfigLayer {
	pub symbolication: Option<SymbolicationConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

impl LogBoxConfigLayer {
	/// Overlays `other` on top of `self`, field by field.
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.symbolication, other.symbolication, SymbolicationConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	let Some(other) = other else {
		return;
	};
	match base {
		Some(existing) => merge(existing, other),
		None => *base = Some(other),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sections::SymbolicatorBackend;

	#[test]
	fn test_merge_fills_missing_sections() {
		let mut base = LogBoxConfigLayer::default();
		base.merge(LogBoxConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("warn".to_string()),
			}),
			..Default::default()
		});

		assert_eq!(base.logging.unwrap().level.as_deref(), Some("warn"));
		assert!(base.symbolication.is_none());
	}

	#[test]
	fn test_merge_is_field_wise() {
		let mut base = LogBoxConfigLayer {
			symbolication: Some(SymbolicationConfigLayer {
				endpoint: Some("http://devbox:8081".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(LogBoxConfigLayer {
			symbolication: Some(SymbolicationConfigLayer {
				backend: Some(SymbolicatorBackend::Http),
				..Default::default()
			}),
			..Default::default()
		});

		let symbolication = base.symbolication.unwrap();
		assert_eq!(symbolication.endpoint.as_deref(), Some("http://devbox:8081"));
		assert_eq!(symbolication.backend, Some(SymbolicatorBackend::Http));
	}
}
