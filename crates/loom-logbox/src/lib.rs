// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolication tracking for error overlay log entries.
//!
//! Every [`LogEntry`] carries two independent symbolication channels, one for
//! the JavaScript stack and one for the UI component stack. Requests for a
//! channel are coalesced onto a single external call made through a
//! [`loom_logbox_symbolicate::Symbolicator`], and observers are notified once
//! the channel reaches COMPLETE or FAILED.
//!
//! [`LogBox`] owns a set of entries and serializes all access to them:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use loom_logbox::{LogBox, LogEntryData};
//! use loom_logbox_core::{LogLevel, StackFrame, StackKind};
//! use loom_logbox_symbolicate::{InMemorySourceMaps, SourceMapSymbolicator};
//!
//! # async fn example() -> loom_logbox::Result<()> {
//! let symbolicator = Arc::new(SourceMapSymbolicator::new(InMemorySourceMaps::new()));
//! let (logbox, handle) = LogBox::new(symbolicator);
//! logbox.spawn();
//!
//! let id = handle
//!     .add(LogEntryData::new(
//!         LogLevel::Error,
//!         "undefined is not a function",
//!         vec![StackFrame::new("index.bundle", "render", 10, 4)],
//!     ))
//!     .await?;
//! let status = handle.symbolicate(id, StackKind::Stack).await?;
//! println!("{status}: {:?}", handle.view(id).await?.stack.stack);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod logbox;
pub mod observer;
pub mod view;

#[cfg(test)]
mod test_support;

pub use channel::StackChannel;
pub use dispatch::{Dispatcher, RequestId, Settlement};
pub use entry::{LogEntry, LogEntryData, SymbolicationSeed, DEFAULT_LOG_TYPE};
pub use error::{Result, TrackerError};
pub use logbox::{Command, LogBox, LogBoxHandle};
pub use observer::{Observer, ObserverId};
pub use view::{ChannelView, LogView};
