//! Process-wide sync settings and the fail-on-timeout policy.
//!
//! A suite installs its [`SyncSettings`] once at start-up (from code, JSON,
//! or the environment) and leaves them alone afterwards. Every sync reads
//! the policy when its poll loop finishes, so a change made mid-wait applies
//! to waits still in flight. Per-call overrides go through
//! [`SyncOptions`](crate::SyncOptions) instead.

use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable read by [`SyncSettings::from_env`].
pub const FAIL_ON_TIMEOUT_ENV: &str = "PAGESYNC_FAIL_ON_TIMEOUT";

/// Ambient timeout applied to the driver while a poll loop runs.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1);

/// Pause between attempts of the whole-page probes.
pub const DEFAULT_PAGE_POLL_INTERVAL_MS: u64 = 500;

static SETTINGS: RwLock<SyncSettings> = RwLock::new(SyncSettings::DEFAULT);

/// Tunables shared by every sync call in the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
	/// `true`: an exhausted element sync is an error. `false`: it returns `false`.
	pub fail_on_timeout: bool,
	/// Driver implicit wait while polling.
	#[serde(with = "millis")]
	pub probe_timeout: Duration,
	/// Sleep between whole-page probe attempts.
	pub page_poll_interval_ms: u64,
}

impl SyncSettings {
	const DEFAULT: Self = Self {
		fail_on_timeout: true,
		probe_timeout: DEFAULT_PROBE_TIMEOUT,
		page_poll_interval_ms: DEFAULT_PAGE_POLL_INTERVAL_MS,
	};

	/// Parses settings from JSON, filling missing keys with defaults.
	pub fn from_json(json: &str) -> Result<Self> {
		let settings: Self = serde_json::from_str(json).map_err(|e| Error::Settings(e.to_string()))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Rejects values the poll loops cannot honour.
	///
	/// A zero page poll interval would turn the page probes' attempt count
	/// into a wall-clock budget polled without pause.
	pub fn validate(&self) -> Result<()> {
		if self.page_poll_interval_ms == 0 {
			return Err(Error::Settings("pagePollIntervalMs must be at least 1".into()));
		}
		Ok(())
	}

	/// Defaults, with `fail_on_timeout` taken from [`FAIL_ON_TIMEOUT_ENV`] when set.
	pub fn from_env() -> Result<Self> {
		let mut settings = Self::default();
		if let Ok(raw) = std::env::var(FAIL_ON_TIMEOUT_ENV) {
			settings.fail_on_timeout = parse_flag(&raw)
				.ok_or_else(|| Error::Settings(format!("{FAIL_ON_TIMEOUT_ENV}={raw} is not a boolean")))?;
		}
		Ok(settings)
	}

	pub fn page_poll_interval(&self) -> Duration {
		Duration::from_millis(self.page_poll_interval_ms)
	}
}

impl Default for SyncSettings {
	fn default() -> Self {
		Self::DEFAULT
	}
}

fn parse_flag(raw: &str) -> Option<bool> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// Replaces the process-wide settings.
///
/// # Errors
///
/// [`Error::Settings`] when [`SyncSettings::validate`] fails; the installed
/// settings are left unchanged.
pub fn install(settings: SyncSettings) -> Result<()> {
	settings.validate()?;
	tracing::debug!(?settings, "installing sync settings");
	*SETTINGS.write() = settings;
	Ok(())
}

/// Snapshot of the process-wide settings.
pub fn current() -> SyncSettings {
	SETTINGS.read().clone()
}

/// Current fail-on-timeout policy.
pub fn fail_on_timeout() -> bool {
	SETTINGS.read().fail_on_timeout
}

/// Sets the fail-on-timeout policy for every later (and in-flight) sync.
pub fn set_fail_on_timeout(fail: bool) {
	SETTINGS.write().fail_on_timeout = fail;
}

/// Restores the default settings.
pub fn reset() {
	*SETTINGS.write() = SyncSettings::default();
}

mod millis {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u64(value.as_millis() as u64)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		u64::deserialize(deserializer).map(Duration::from_millis)
	}
}
