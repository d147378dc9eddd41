// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolicates error overlay logs from the command line.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loom_logbox::LogEntryData;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod run;
mod symbolicator;
mod version;

/// Loom LogBox - symbolicate error overlay logs.
#[derive(Parser, Debug)]
#[command(name = "loom-logbox", about = "Symbolicate error overlay logs", version)]
struct Args {
	/// Config file (defaults to ./loom-logbox.toml)
	#[arg(short, long, env = "LOOM_LOGBOX_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Symbolicate a JSON array of logs and print the resulting views
	Symbolicate {
		/// Input file, or `-` for stdin
		input: PathBuf,

		/// Retry channels that failed once
		#[arg(long)]
		retry_failed: bool,

		/// Pretty-print the output
		#[arg(long)]
		pretty: bool,
	},
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let (input, retry_failed, pretty) = match args.command {
		Command::Version => {
			println!("{}", version::format_version_info());
			return Ok(());
		}
		Command::Symbolicate {
			input,
			retry_failed,
			pretty,
		} => (input, retry_failed, pretty),
	};

	let config = match &args.config {
		Some(path) => loom_logbox_config::load_config_with_file(path),
		None => loom_logbox_config::load_config(),
	}
	.context("failed to load configuration")?;

	// stdout carries the JSON output
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	let logs = read_logs(&input)?;
	tracing::info!(logs = logs.len(), input = %input.display(), "symbolicating logs");

	let symbolicator = symbolicator::build(&config.symbolication)?;
	let views = run::symbolicate_logs(symbolicator, logs, run::RunOptions { retry_failed }).await?;

	let output = if pretty {
		serde_json::to_string_pretty(&views)?
	} else {
		serde_json::to_string(&views)?
	};
	println!("{output}");
	Ok(())
}

fn read_logs(input: &Path) -> Result<Vec<LogEntryData>> {
	let content = if input == Path::new("-") {
		let mut content = String::new();
		std::io::stdin()
			.read_to_string(&mut content)
			.context("failed to read logs from stdin")?;
		content
	} else {
		std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?
	};

	serde_json::from_str(&content).with_context(|| format!("invalid log JSON in {}", input.display()))
}
