// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for a development server's `/symbolicate` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use loom_logbox_core::{StackFrame, SymbolicatedStack, SymbolicationFailure};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{Result, SymbolicateError};
use crate::service::Symbolicator;

#[derive(Serialize)]
struct SymbolicateRequest<'a> {
	stack: &'a [StackFrame],
}

/// Symbolicates by POSTing `{"stack": [...]}` to `<base>/symbolicate`.
///
/// The server answers with `{"stack": [...], "codeFrame": {...}}`.
#[derive(Debug, Clone)]
pub struct HttpSymbolicator {
	endpoint: Url,
	http: reqwest::Client,
}

impl HttpSymbolicator {
	pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
		let http = reqwest::Client::builder().timeout(request_timeout).build()?;
		Self::with_client(base_url, http)
	}

	pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self> {
		let invalid = |e: url::ParseError| SymbolicateError::InvalidEndpoint(format!("{base_url}: {e}"));

		// `join` replaces the last segment unless the base ends in a slash.
		let mut base = Url::parse(base_url).map_err(invalid)?;
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());
			base.set_path(&path);
		}
		let endpoint = base.join("symbolicate").map_err(invalid)?;
		Ok(Self { endpoint, http })
	}

	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	async fn request(&self, stack: &[StackFrame]) -> Result<SymbolicatedStack> {
		debug!(endpoint = %self.endpoint, "requesting symbolication");

		let response = self
			.http
			.post(self.endpoint.clone())
			.json(&SymbolicateRequest { stack })
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			return Err(SymbolicateError::Server {
				status: status.as_u16(),
				message,
			});
		}

		Ok(response.json::<SymbolicatedStack>().await?)
	}
}

#[async_trait]
impl Symbolicator for HttpSymbolicator {
	#[instrument(skip_all, fields(frame_count = stack.len()))]
	async fn symbolicate(&self, stack: &[StackFrame]) -> std::result::Result<SymbolicatedStack, SymbolicationFailure> {
		self.request(stack).await.map_err(|e| {
			warn!(endpoint = %self.endpoint, error = %e, "symbolication request failed");
			SymbolicationFailure::from(e)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_endpoint_from_base_url() {
		let symbolicator = HttpSymbolicator::new("http://localhost:8081", Duration::from_secs(5)).unwrap();
		assert_eq!(symbolicator.endpoint().as_str(), "http://localhost:8081/symbolicate");

		let symbolicator = HttpSymbolicator::new("http://localhost:8081/", Duration::from_secs(5)).unwrap();
		assert_eq!(symbolicator.endpoint().as_str(), "http://localhost:8081/symbolicate");
	}

	#[test]
	fn test_endpoint_keeps_base_path() {
		let symbolicator = HttpSymbolicator::new("http://devbox:8081/metro", Duration::from_secs(5)).unwrap();
		assert_eq!(symbolicator.endpoint().as_str(), "http://devbox:8081/metro/symbolicate");

		let symbolicator = HttpSymbolicator::new("http://devbox:8081/metro/", Duration::from_secs(5)).unwrap();
		assert_eq!(symbolicator.endpoint().as_str(), "http://devbox:8081/metro/symbolicate");
	}

	#[test]
	fn test_invalid_base_url() {
		assert!(matches!(
			HttpSymbolicator::new("not a url", Duration::from_secs(5)),
			Err(SymbolicateError::InvalidEndpoint(_))
		));
	}

	#[test]
	fn test_request_body_shape() {
		let stack = vec![StackFrame::new("index.bundle", "render", 3, 7)];
		let body = serde_json::to_value(SymbolicateRequest { stack: &stack }).unwrap();

		assert_eq!(body["stack"][0]["methodName"], "render");
		assert_eq!(body["stack"][0]["lineNumber"], 3);
	}

	#[test]
	fn test_response_without_code_frame() {
		let response: SymbolicatedStack = serde_json::from_str(
			r#"{"stack": [{"file": "App.tsx", "methodName": "render", "lineNumber": 1, "column": 0}]}"#,
		)
		.unwrap();

		assert_eq!(response.stack.len(), 1);
		assert!(response.code_frame.is_none());
	}

	#[tokio::test]
	async fn test_unreachable_server_is_a_failure() {
		let port = {
			let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
			listener.local_addr().unwrap().port()
		};
		let symbolicator =
			HttpSymbolicator::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2)).unwrap();

		let result = symbolicator
			.symbolicate(&[StackFrame::new("index.bundle", "f", 1, 0)])
			.await;

		let failure = result.unwrap_err();
		assert!(failure.downcast_ref::<SymbolicateError>().is_some());
	}

	#[tokio::test]
	async fn test_usable_as_trait_object() {
		let port = {
			let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
			listener.local_addr().unwrap().port()
		};
		let symbolicator: std::sync::Arc<dyn Symbolicator> = std::sync::Arc::new(
			HttpSymbolicator::new(&format!("http://127.0.0.1:{port}/"), Duration::from_secs(2)).unwrap(),
		);

		let failure = symbolicator
			.symbolicate(&[StackFrame::new("index.bundle", "f", 1, 0)])
			.await
			.unwrap_err();
		assert!(matches!(
			failure.downcast_ref::<SymbolicateError>(),
			Some(SymbolicateError::Http(_))
		));
	}
}
