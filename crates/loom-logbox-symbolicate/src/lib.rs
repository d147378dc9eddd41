// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack symbolication backends for the Loom error overlay.
//!
//! This crate provides:
//! - The [`Symbolicator`] interface the log tracker consumes
//! - [`CachedSymbolicator`], a cache shared by every log entry and keyed by
//!   stack value, with eviction for forced retries
//! - [`SourceMapSymbolicator`], which maps frames through Source Map v3 files
//!   and renders a code frame from embedded sources
//! - [`HttpSymbolicator`], a client for a development server's
//!   `/symbolicate` endpoint
//!
//! # Example
//!
//! ```
//! use loom_logbox_core::StackFrame;
//! use loom_logbox_symbolicate::{InMemorySourceMaps, SourceMapSymbolicator};
//!
//! let mut maps = InMemorySourceMaps::new();
//! maps.add(
//!     "bundle.js",
//!     br#"{"version": 3, "sources": ["src/app.ts"], "names": [], "mappings": "AAAA"}"#,
//! )
//! .unwrap();
//!
//! let symbolicator = SourceMapSymbolicator::new(maps);
//! let result = symbolicator.symbolicate_frames(&[StackFrame::new("bundle.js", "main", 1, 0)]);
//! assert_eq!(result.stack[0].file.as_deref(), Some("src/app.ts"));
//! ```

pub mod cache;
pub mod code_frame;
pub mod error;
pub mod http;
pub mod lookup;
pub mod processor;
pub mod service;
pub mod sourcemap;
pub mod vlq;

pub use cache::CachedSymbolicator;
pub use code_frame::{extract_context, render_code_frame};
pub use error::{Result, SymbolicateError};
pub use http::HttpSymbolicator;
pub use lookup::{DirectorySourceMaps, InMemorySourceMaps, SourceMapLookup};
pub use processor::{SourceMapSymbolicator, DEFAULT_CONTEXT_LINES};
pub use service::Symbolicator;
pub use sourcemap::{OriginalPosition, SourceMap};
