// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack, component and code frame types.

use serde::{Deserialize, Serialize};

/// A single frame of a JavaScript stack trace.
///
/// Serialized in camelCase, the shape symbolication servers exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
	/// Bundled (or, once symbolicated, original) file path or URL.
	#[serde(default)]
	pub file: Option<String>,
	/// Function name, or the component label for frames derived from a
	/// component stack.
	#[serde(default)]
	pub method_name: String,
	/// 1-indexed line.
	#[serde(default)]
	pub line_number: Option<u32>,
	/// 0-indexed column.
	#[serde(default)]
	pub column: Option<u32>,
	#[serde(default)]
	pub arguments: Vec<String>,
	/// Frames marked as collapsed are framework internals hidden by default.
	#[serde(default)]
	pub collapse: bool,
}

impl StackFrame {
	/// Creates a frame at a generated position.
	pub fn new(file: impl Into<String>, method_name: impl Into<String>, line: u32, column: u32) -> Self {
		Self {
			file: Some(file.into()),
			method_name: method_name.into(),
			line_number: Some(line),
			column: Some(column),
			..Self::default()
		}
	}
}

/// Row/column position inside a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeLocation {
	pub row: u32,
	pub column: u32,
}

/// A frame of a UI component stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFrame {
	pub file_name: String,
	/// Component label, e.g. `in App (at App.js:12)`.
	pub content: String,
	#[serde(default)]
	pub location: Option<CodeLocation>,
}

impl ComponentFrame {
	/// Translates the component frame into the common stack frame shape.
	///
	/// A missing location maps to line 0, column 0.
	pub fn to_stack_frame(&self) -> StackFrame {
		let location = self.location.unwrap_or_default();
		StackFrame {
			file: Some(self.file_name.clone()),
			method_name: self.content.clone(),
			line_number: Some(location.row),
			column: Some(location.column),
			arguments: Vec::new(),
			collapse: false,
		}
	}
}

/// Translates a whole component stack, preserving frame order.
pub fn component_stack_to_stack(component_stack: &[ComponentFrame]) -> Vec<StackFrame> {
	component_stack
		.iter()
		.map(ComponentFrame::to_stack_frame)
		.collect()
}

/// Rendered source context around a symbolicated position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFrame {
	pub content: String,
	#[serde(default)]
	pub location: Option<CodeLocation>,
	pub file_name: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_component_frame_with_location() {
		let frame = ComponentFrame {
			file_name: "App.js".to_string(),
			content: "in App".to_string(),
			location: Some(CodeLocation { row: 12, column: 4 }),
		};

		let stack_frame = frame.to_stack_frame();

		assert_eq!(stack_frame.file.as_deref(), Some("App.js"));
		assert_eq!(stack_frame.method_name, "in App");
		assert_eq!(stack_frame.line_number, Some(12));
		assert_eq!(stack_frame.column, Some(4));
		assert!(stack_frame.arguments.is_empty());
	}

	#[test]
	fn test_component_frame_without_location_maps_to_origin() {
		let frame = ComponentFrame {
			file_name: "View.js".to_string(),
			content: "in View".to_string(),
			location: None,
		};

		let stack_frame = frame.to_stack_frame();

		assert_eq!(stack_frame.line_number, Some(0));
		assert_eq!(stack_frame.column, Some(0));
	}

	#[test]
	fn test_component_stack_preserves_order() {
		let frames = vec![
			ComponentFrame {
				file_name: "a.js".to_string(),
				content: "in A".to_string(),
				location: None,
			},
			ComponentFrame {
				file_name: "b.js".to_string(),
				content: "in B".to_string(),
				location: None,
			},
		];

		let stack = component_stack_to_stack(&frames);

		let files: Vec<_> = stack.iter().filter_map(|f| f.file.as_deref()).collect();
		assert_eq!(files, vec!["a.js", "b.js"]);
	}

	#[test]
	fn test_stack_frame_wire_shape() {
		let frame = StackFrame::new("index.bundle", "render", 10, 2);

		let json = serde_json::to_value(&frame).unwrap();

		assert_eq!(json["file"], "index.bundle");
		assert_eq!(json["methodName"], "render");
		assert_eq!(json["lineNumber"], 10);
		assert_eq!(json["column"], 2);
	}

	#[test]
	fn test_stack_frame_defaults_missing_fields() {
		let frame: StackFrame = serde_json::from_str(r#"{"methodName": "anonymous"}"#).unwrap();

		assert_eq!(frame.file, None);
		assert_eq!(frame.line_number, None);
		assert!(!frame.collapse);
	}
}
