// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end tests of the log box over real symbolication backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use loom_logbox::{LogBox, LogEntryData};
use loom_logbox_core::{
	CodeLocation, ComponentFrame, LogLevel, StackFrame, StackKind, SymbolicatedStack, SymbolicationFailure,
	SymbolicationStatus,
};
use loom_logbox_symbolicate::{CachedSymbolicator, InMemorySourceMaps, SourceMapSymbolicator, Symbolicator};

// Generated line 1 col 0 -> src/app.ts 1:0, generated line 2 col 2 -> src/app.ts 2:2.
const MAP: &str = r#"{
	"version": 3,
	"sources": ["src/app.ts"],
	"sourcesContent": ["function main() {\n  throw new Error('boom');\n}\n"],
	"names": ["main"],
	"mappings": "AAAAA;EACE"
}"#;

fn source_maps() -> SourceMapSymbolicator<InMemorySourceMaps> {
	let mut maps = InMemorySourceMaps::new();
	maps.add("bundle.js", MAP.as_bytes()).unwrap();
	SourceMapSymbolicator::new(maps)
}

fn bundle_stack() -> Vec<StackFrame> {
	vec![StackFrame::new("http://localhost:8081/bundle.js", "main", 2, 4)]
}

/// Counts calls reaching the wrapped backend.
struct Counting<S> {
	inner: S,
	calls: AtomicUsize,
}

impl<S> Counting<S> {
	fn new(inner: S) -> Self {
		Self {
			inner,
			calls: AtomicUsize::new(0),
		}
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl<S: Symbolicator> Symbolicator for Counting<S> {
	async fn symbolicate(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack, SymbolicationFailure> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.inner.symbolicate(stack).await
	}
}

/// Fails the first call, then delegates.
struct FailsOnce<S> {
	inner: S,
	failed: AtomicUsize,
}

#[async_trait]
impl<S: Symbolicator> Symbolicator for FailsOnce<S> {
	async fn symbolicate(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack, SymbolicationFailure> {
		if self.failed.fetch_add(1, Ordering::SeqCst) == 0 {
			return Err(SymbolicationFailure::msg("dev server unreachable"));
		}
		self.inner.symbolicate(stack).await
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stack_symbolicated_through_source_maps() {
	let (logbox, handle) = LogBox::new(Arc::new(source_maps()));
	let task = logbox.spawn();

	let id = handle
		.add(LogEntryData::new(LogLevel::Fatal, "boom", bundle_stack()))
		.await
		.unwrap();

	let status = handle.symbolicate(id, StackKind::Stack).await.unwrap();
	assert_eq!(status, SymbolicationStatus::Complete);

	let view = handle.view(id).await.unwrap();
	let frame = &view.stack.stack[0];
	assert_eq!(frame.file.as_deref(), Some("src/app.ts"));
	assert_eq!(frame.line_number, Some(2));
	assert_eq!(frame.column, Some(2));

	let code_frame = view.code_frame.unwrap();
	assert_eq!(code_frame.file_name, "src/app.ts");
	assert!(code_frame.content.contains("throw new Error('boom');"));

	handle.shutdown().await.unwrap();
	task.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_requests_share_one_backend_call() {
	let backend = Arc::new(Counting::new(source_maps()));
	let (logbox, handle) = LogBox::new(Arc::new(CachedSymbolicator::new(Arc::clone(&backend))));
	logbox.spawn();

	let first = handle
		.add(LogEntryData::new(LogLevel::Error, "boom", bundle_stack()))
		.await
		.unwrap();
	let second = handle
		.add(LogEntryData::new(LogLevel::Error, "boom again", bundle_stack()))
		.await
		.unwrap();

	let (a, b, c) = tokio::join!(
		handle.symbolicate(first, StackKind::Stack),
		handle.symbolicate(first, StackKind::Stack),
		handle.symbolicate(second, StackKind::Stack),
	);

	assert_eq!(a.unwrap(), SymbolicationStatus::Complete);
	assert_eq!(b.unwrap(), SymbolicationStatus::Complete);
	assert_eq!(c.unwrap(), SymbolicationStatus::Complete);
	assert_eq!(backend.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_retry_recovers_from_failure() {
	let backend = Arc::new(FailsOnce {
		inner: source_maps(),
		failed: AtomicUsize::new(0),
	});
	let (logbox, handle) = LogBox::new(Arc::new(CachedSymbolicator::new(backend)));
	logbox.spawn();

	let id = handle
		.add(LogEntryData::new(LogLevel::Error, "boom", bundle_stack()))
		.await
		.unwrap();

	assert_eq!(
		handle.symbolicate(id, StackKind::Stack).await.unwrap(),
		SymbolicationStatus::Failed
	);
	let failed = handle.view(id).await.unwrap();
	assert_eq!(failed.stack.error.as_deref(), Some("dev server unreachable"));
	assert_eq!(failed.stack.stack, bundle_stack());

	// a plain request keeps the cached failure
	assert_eq!(
		handle.symbolicate(id, StackKind::Stack).await.unwrap(),
		SymbolicationStatus::Failed
	);

	assert_eq!(
		handle.retry_symbolicate(id, StackKind::Stack).await.unwrap(),
		SymbolicationStatus::Complete
	);
	let recovered = handle.view(id).await.unwrap();
	assert!(recovered.stack.error.is_none());
	assert_eq!(recovered.stack.stack[0].file.as_deref(), Some("src/app.ts"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_component_stack_symbolicated_independently() {
	let (logbox, handle) = LogBox::new(Arc::new(source_maps()));
	logbox.spawn();

	let data = LogEntryData::new(LogLevel::Error, "render failed", Vec::new()).with_component_stack(vec![
		ComponentFrame {
			file_name: "bundle.js".to_string(),
			content: "in App".to_string(),
			location: Some(CodeLocation { row: 2, column: 4 }),
		},
	]);
	let id = handle.add(data).await.unwrap();

	assert_eq!(
		handle.symbolicate(id, StackKind::Component).await.unwrap(),
		SymbolicationStatus::Complete
	);

	let view = handle.view(id).await.unwrap();
	assert_eq!(view.stack.status, SymbolicationStatus::None);
	assert_eq!(view.component.stack[0].file.as_deref(), Some("src/app.ts"));
	assert_eq!(view.component.stack[0].method_name, "in App");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_count_survives_symbolication() {
	let (logbox, handle) = LogBox::new(Arc::new(source_maps()));
	logbox.spawn();

	let id = handle
		.add(LogEntryData::new(LogLevel::Warn, "deprecated", bundle_stack()).with_type("warn"))
		.await
		.unwrap();
	for _ in 0..3 {
		handle.increment_count(id).await.unwrap();
	}
	handle.symbolicate(id, StackKind::Stack).await.unwrap();

	let view = handle.view(id).await.unwrap();
	assert_eq!(view.count, 4);
	assert_eq!(view.log_type, "warn");
}
