//! Error types for the sync engine.

use std::time::Duration;

use thiserror::Error;

use crate::condition::Condition;

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Signals reported by the browser driver for a single query.
///
/// Evaluators reduce every one of these to `false`; they only reach callers
/// through [`Error::Driver`] on paths that are not part of a poll loop.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
	/// No element matched the locator.
	#[error("no such element: {0}")]
	NoSuchElement(String),

	/// The element handle was detached from the DOM between lookup and use.
	#[error("stale element reference: {0}")]
	StaleElement(String),

	/// A zero-wait query timed out inside the driver.
	#[error("driver timeout: {0}")]
	Timeout(String),

	/// Script evaluation failed in the page.
	#[error("script error: {0}")]
	Script(String),

	/// The driver or page does not support the requested operation.
	#[error("unsupported operation: {0}")]
	Unsupported(String),

	/// The session itself failed (connection lost, browser closed).
	#[error("session error: {0}")]
	Session(String),
}

impl DriverError {
	/// Returns true for the "not yet" family: missing, stale, or timed out.
	pub fn is_transient(&self) -> bool {
		matches!(
			self,
			DriverError::NoSuchElement(_) | DriverError::StaleElement(_) | DriverError::Timeout(_)
		)
	}
}

/// Errors that cross the engine boundary.
#[derive(Debug, Error)]
pub enum Error {
	/// A sync poll loop exhausted its budget under fail-on-timeout policy.
	#[error("Element [ {locator} ] {} after [ {:.3} ] seconds.", .condition.failure_phrase(), .elapsed.as_secs_f64())]
	SyncTimeout {
		/// Diagnostic description of the target.
		locator: String,
		/// The condition that was being waited for.
		condition: Condition,
		/// Wall-clock time spent polling.
		elapsed: Duration,
	},

	/// A page object could not be constructed at all.
	#[error("Unable to initialize page {page}: {reason}")]
	PageBinding {
		/// Page type name.
		page: &'static str,
		/// Why binding failed.
		reason: String,
	},

	/// Settings could not be parsed.
	#[error("invalid sync settings: {0}")]
	Settings(String),

	/// Driver failure outside a poll loop.
	#[error(transparent)]
	Driver(#[from] DriverError),
}

impl Error {
	/// Returns true if this is a sync timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::SyncTimeout { .. })
	}

	/// Elapsed wait time carried by a sync timeout.
	pub fn elapsed(&self) -> Option<Duration> {
		match self {
			Error::SyncTimeout { elapsed, .. } => Some(*elapsed),
			_ => None,
		}
	}
}
