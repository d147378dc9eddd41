// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolicates a batch of logs through a [`LogBox`].

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use loom_logbox::{LogBox, LogBoxHandle, LogEntryData, LogView};
use loom_logbox_core::{LogId, StackKind, SymbolicationStatus};
use loom_logbox_symbolicate::Symbolicator;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
	/// Retry every channel that failed once.
	pub retry_failed: bool,
}

pub async fn symbolicate_logs(
	symbolicator: Arc<dyn Symbolicator>,
	logs: Vec<LogEntryData>,
	options: RunOptions,
) -> Result<Vec<LogView>> {
	let (logbox, handle) = LogBox::new(symbolicator);
	let task = logbox.spawn();

	let mut ids = Vec::with_capacity(logs.len());
	for data in logs {
		ids.push(handle.add(data).await?);
	}

	let requests = ids
		.iter()
		.flat_map(|id| StackKind::ALL.iter().map(move |kind| (*id, *kind)))
		.collect::<Vec<_>>();
	let failed = settle_all(&handle, requests, false).await?;

	if options.retry_failed && !failed.is_empty() {
		info!(channels = failed.len(), "retrying failed symbolication");
		let still_failed = settle_all(&handle, failed, true).await?;
		if !still_failed.is_empty() {
			warn!(channels = still_failed.len(), "symbolication failed after retry");
		}
	}

	let views = handle.list().await?;
	handle.shutdown().await?;
	task.await?;
	Ok(views)
}

/// Waits for every requested channel to settle and returns the ones that
/// ended up FAILED.
async fn settle_all(
	handle: &LogBoxHandle,
	requests: Vec<(LogId, StackKind)>,
	retry: bool,
) -> Result<Vec<(LogId, StackKind)>> {
	let statuses = join_all(requests.iter().map(|&(id, kind)| async move {
		if retry {
			handle.retry_symbolicate(id, kind).await
		} else {
			handle.symbolicate(id, kind).await
		}
	}))
	.await;

	let mut failed = Vec::new();
	for (request, status) in requests.into_iter().zip(statuses) {
		if status? == SymbolicationStatus::Failed {
			failed.push(request);
		}
	}
	Ok(failed)
}
