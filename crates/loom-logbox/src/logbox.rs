// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The event loop that owns every log entry.
//!
//! Entries are only touched from [`LogBox::run`]. Callers talk to it through
//! a cloneable [`LogBoxHandle`]; symbolication results come back from the
//! [`Dispatcher`] on a second channel and are applied in arrival order.

use std::collections::HashMap;
use std::sync::Arc;

use loom_logbox_core::{LogId, StackKind, SymbolicationStatus};
use loom_logbox_symbolicate::Symbolicator;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::dispatch::{Dispatcher, Settlement};
use crate::entry::{LogEntry, LogEntryData};
use crate::error::{Result, TrackerError};
use crate::observer::Observer;
use crate::view::LogView;

/// Capacity of the command channel.
pub const COMMAND_BUFFER: usize = 256;

type Reply<T> = oneshot::Sender<Result<T>>;

/// Commands accepted by the event loop.
#[derive(Debug)]
pub enum Command {
	Add {
		data: LogEntryData,
		reply: oneshot::Sender<LogId>,
	},
	Symbolicate {
		id: LogId,
		kind: StackKind,
		retry: bool,
		reply: Reply<SymbolicationStatus>,
	},
	IncrementCount {
		id: LogId,
		reply: Reply<u64>,
	},
	View {
		id: LogId,
		reply: Reply<LogView>,
	},
	List {
		reply: oneshot::Sender<Vec<LogView>>,
	},
	Remove {
		id: LogId,
		reply: Reply<LogView>,
	},
	Shutdown,
}

/// Owner of all log entries.
pub struct LogBox {
	entries: HashMap<LogId, LogEntry>,
	order: Vec<LogId>,
	dispatcher: Dispatcher,
	commands: mpsc::Receiver<Command>,
	settlements: mpsc::UnboundedReceiver<Settlement>,
}

impl LogBox {
	pub fn new(symbolicator: Arc<dyn Symbolicator>) -> (Self, LogBoxHandle) {
		let (dispatcher, settlements) = Dispatcher::new(symbolicator);
		let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
		let logbox = Self {
			entries: HashMap::new(),
			order: Vec::new(),
			dispatcher,
			commands,
			settlements,
		};
		(logbox, LogBoxHandle { tx })
	}

	/// Runs the loop on a new task.
	pub fn spawn(self) -> JoinHandle<()> {
		tokio::spawn(self.run())
	}

	/// Processes commands and settlements until shut down or every handle
	/// is dropped.
	pub async fn run(mut self) {
		info!("log box started");

		loop {
			tokio::select! {
				biased;

				Some(settlement) = self.settlements.recv() => self.apply(settlement),
				command = self.commands.recv() => match command {
					Some(Command::Shutdown) | None => break,
					Some(command) => self.handle(command),
				},
			}
		}

		// Close before dropping observers so waiters see a closed box.
		self.commands.close();
		let entries = self.entries.len();
		self.entries.clear();
		info!(entries, "log box stopped");
	}

	fn apply(&mut self, settlement: Settlement) {
		match self.entries.get_mut(&settlement.log_id) {
			Some(entry) => {
				entry.apply_settlement(settlement);
			}
			None => {
				debug!(log_id = %settlement.log_id, kind = %settlement.kind, "settlement for removed log");
			}
		}
	}

	fn handle(&mut self, command: Command) {
		match command {
			Command::Add { data, reply } => {
				let _ = reply.send(self.add(data));
			}
			Command::Symbolicate { id, kind, retry, reply } => self.symbolicate(id, kind, retry, reply),
			Command::IncrementCount { id, reply } => {
				let result = self
					.entries
					.get_mut(&id)
					.map(|entry| {
						entry.increment_count();
						entry.count()
					})
					.ok_or(TrackerError::LogNotFound(id));
				let _ = reply.send(result);
			}
			Command::View { id, reply } => {
				let result = self.entries.get(&id).map(LogEntry::view).ok_or(TrackerError::LogNotFound(id));
				let _ = reply.send(result);
			}
			Command::List { reply } => {
				let views = self.order.iter().filter_map(|id| self.entries.get(id)).map(LogEntry::view).collect();
				let _ = reply.send(views);
			}
			Command::Remove { id, reply } => {
				let _ = reply.send(self.remove(id));
			}
			Command::Shutdown => {}
		}
	}

	fn add(&mut self, data: LogEntryData) -> LogId {
		let entry = LogEntry::new(data, self.dispatcher.clone());
		let id = entry.id();
		debug!(log_id = %id, level = %entry.level(), "log added");
		self.entries.insert(id, entry);
		self.order.push(id);
		id
	}

	#[instrument(skip(self, reply), fields(log_id = %id, %kind))]
	fn symbolicate(&mut self, id: LogId, kind: StackKind, retry: bool, reply: Reply<SymbolicationStatus>) {
		let Some(entry) = self.entries.get_mut(&id) else {
			let _ = reply.send(Err(TrackerError::LogNotFound(id)));
			return;
		};

		if !entry.can_symbolicate(kind) {
			let _ = reply.send(Ok(entry.status(kind)));
			return;
		}

		let observer = Observer::new(move |status| {
			let _ = reply.send(Ok(status));
		});
		if retry {
			entry.retry_symbolicate(kind, Some(observer));
		} else {
			entry.symbolicate(kind, Some(observer));
		}
	}

	fn remove(&mut self, id: LogId) -> Result<LogView> {
		let entry = self.entries.remove(&id).ok_or(TrackerError::LogNotFound(id))?;
		self.order.retain(|other| *other != id);
		debug!(log_id = %id, "log removed");
		Ok(entry.view())
	}
}

/// Cloneable handle to a running [`LogBox`].
#[derive(Debug, Clone)]
pub struct LogBoxHandle {
	tx: mpsc::Sender<Command>,
}

impl LogBoxHandle {
	async fn send(&self, command: Command) -> Result<()> {
		self.tx.send(command).await.map_err(|_| TrackerError::Closed)
	}

	pub async fn add(&self, data: LogEntryData) -> Result<LogId> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::Add { data, reply }).await?;
		rx.await.map_err(|_| TrackerError::Closed)
	}

	/// Symbolicates `kind` for the log and waits until the channel is
	/// COMPLETE or FAILED.
	///
	/// Returns the current status right away when there is nothing to
	/// symbolicate, i.e. a component request on a log without a component
	/// stack.
	pub async fn symbolicate(&self, id: LogId, kind: StackKind) -> Result<SymbolicationStatus> {
		self.request(id, kind, false).await
	}

	/// Like [`Self::symbolicate`] but always issues a fresh call.
	pub async fn retry_symbolicate(&self, id: LogId, kind: StackKind) -> Result<SymbolicationStatus> {
		self.request(id, kind, true).await
	}

	async fn request(&self, id: LogId, kind: StackKind, retry: bool) -> Result<SymbolicationStatus> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::Symbolicate { id, kind, retry, reply }).await?;
		rx.await.map_err(|_| {
			if self.tx.is_closed() {
				TrackerError::Closed
			} else {
				TrackerError::Removed(id)
			}
		})?
	}

	pub async fn increment_count(&self, id: LogId) -> Result<u64> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::IncrementCount { id, reply }).await?;
		rx.await.map_err(|_| TrackerError::Closed)?
	}

	pub async fn view(&self, id: LogId) -> Result<LogView> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::View { id, reply }).await?;
		rx.await.map_err(|_| TrackerError::Closed)?
	}

	/// Every log in insertion order.
	pub async fn list(&self) -> Result<Vec<LogView>> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::List { reply }).await?;
		rx.await.map_err(|_| TrackerError::Closed)
	}

	/// Stops tracking the log. Pending symbolication requests for it fail
	/// with [`TrackerError::Removed`].
	pub async fn remove(&self, id: LogId) -> Result<LogView> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::Remove { id, reply }).await?;
		rx.await.map_err(|_| TrackerError::Closed)?
	}

	/// Stops the loop. Symbolication requests still waiting fail with
	/// [`TrackerError::Closed`].
	pub async fn shutdown(&self) -> Result<()> {
		self.send(Command::Shutdown).await
	}
}
