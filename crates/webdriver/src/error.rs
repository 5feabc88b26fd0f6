//! Mapping fantoccini failures onto driver signals.

use fantoccini::error::{CmdError, ErrorStatus, NewSessionError};
use pagesync::DriverError;
use thiserror::Error;

/// Failures setting up or tearing down a session.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error("failed to start tokio runtime: {0}")]
	Runtime(#[from] std::io::Error),

	#[error("failed to create WebDriver session: {0}")]
	Connect(#[from] NewSessionError),

	#[error(transparent)]
	Driver(#[from] DriverError),
}

/// Sorts a WebDriver command error into the engine's driver signals.
pub fn classify(err: CmdError) -> DriverError {
	let message = err.to_string();
	match &err {
		CmdError::WaitTimeout => DriverError::Timeout(message),
		CmdError::Standard(wd) => match wd.error {
			ErrorStatus::NoSuchElement => DriverError::NoSuchElement(message),
			ErrorStatus::StaleElementReference => DriverError::StaleElement(message),
			ErrorStatus::Timeout | ErrorStatus::ScriptTimeout => DriverError::Timeout(message),
			ErrorStatus::JavascriptError => DriverError::Script(message),
			ErrorStatus::UnsupportedOperation | ErrorStatus::UnknownCommand => DriverError::Unsupported(message),
			_ => DriverError::Session(message),
		},
		_ => DriverError::Session(message),
	}
}
