//! Element sync operations.
//!
//! Every state keeps three levels of explicitness:
//!
//! ```ignore
//! driver.sync_visible(&save)?;                                              // driver default, global policy
//! driver.sync_visible_with(&save, SyncOptions::within(5))?;                 // explicit timeout
//! driver.sync_visible_with(&save, SyncOptions::within(5).fail_on_timeout(false))?; // fully explicit
//! ```
//!
//! All of them end up in [`sync`].

use std::time::Duration;

use tracing::{debug, warn};

use crate::condition::Condition;
use crate::driver::{Driver, Locator};
use crate::error::{Error, Result};
use crate::poll::poll_until;
use crate::settings;
use crate::timeout::{AmbientTimeoutGuard, resolve_budget};

/// Per-call overrides for a sync operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
	/// Budget in seconds; `None` uses [`Driver::default_sync_timeout`].
	pub timeout: Option<u64>,
	/// Policy override; `None` reads [`settings::fail_on_timeout`].
	pub fail_on_timeout: Option<bool>,
}

impl SyncOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Options with an explicit budget in seconds.
	pub fn within(secs: u64) -> Self {
		Self::new().timeout(secs)
	}

	pub fn timeout(mut self, secs: u64) -> Self {
		self.timeout = Some(secs);
		self
	}

	pub fn fail_on_timeout(mut self, fail: bool) -> Self {
		self.fail_on_timeout = Some(fail);
		self
	}
}

/// Waits until `condition` holds for `target`.
///
/// The driver's ambient timeout is lowered to the configured probe value
/// for the duration of the poll loop and restored afterwards.
///
/// # Errors
///
/// Returns [`Error::SyncTimeout`] when the budget runs out and the
/// effective policy is fail-on-timeout. With the policy off, exhaustion is
/// `Ok(false)`.
pub fn sync<D: Driver + ?Sized>(
	driver: &mut D,
	condition: &Condition,
	target: &Locator,
	options: SyncOptions,
) -> Result<bool> {
	let probe_timeout = settings::current().probe_timeout;
	let budget = resolve_budget(options.timeout, driver.default_sync_timeout());
	debug!(locator = %target, %condition, timeout_secs = budget, "syncing to element");

	let outcome = {
		let guard = AmbientTimeoutGuard::lower(driver, probe_timeout);
		let probe: &D = &guard;
		poll_until(|| condition.evaluate(probe, target), budget, Duration::ZERO)
	};

	if outcome.succeeded {
		debug!(locator = %target, %condition, elapsed_ms = outcome.elapsed.as_millis() as u64, "sync satisfied");
		return Ok(true);
	}

	let fail = options.fail_on_timeout.unwrap_or_else(settings::fail_on_timeout);
	if fail {
		let err = Error::SyncTimeout {
			locator: target.description(),
			condition: condition.clone(),
			elapsed: outcome.elapsed,
		};
		warn!(attempts = outcome.attempts, "{err}");
		return Err(err);
	}

	debug!(
		locator = %target,
		%condition,
		elapsed_ms = outcome.elapsed.as_millis() as u64,
		"sync timed out, returning false"
	);
	Ok(false)
}

/// Sync shorthands on any [`Driver`].
pub trait SyncExt: Driver {
	fn sync_present(&mut self, target: &Locator) -> Result<bool> {
		self.sync_present_with(target, SyncOptions::default())
	}

	fn sync_present_with(&mut self, target: &Locator, options: SyncOptions) -> Result<bool> {
		sync(self, &Condition::Present, target, options)
	}

	fn sync_visible(&mut self, target: &Locator) -> Result<bool> {
		self.sync_visible_with(target, SyncOptions::default())
	}

	fn sync_visible_with(&mut self, target: &Locator, options: SyncOptions) -> Result<bool> {
		sync(self, &Condition::Visible, target, options)
	}

	fn sync_hidden(&mut self, target: &Locator) -> Result<bool> {
		self.sync_hidden_with(target, SyncOptions::default())
	}

	fn sync_hidden_with(&mut self, target: &Locator, options: SyncOptions) -> Result<bool> {
		sync(self, &Condition::Hidden, target, options)
	}

	fn sync_enabled(&mut self, target: &Locator) -> Result<bool> {
		self.sync_enabled_with(target, SyncOptions::default())
	}

	fn sync_enabled_with(&mut self, target: &Locator, options: SyncOptions) -> Result<bool> {
		sync(self, &Condition::Enabled, target, options)
	}

	fn sync_disabled(&mut self, target: &Locator) -> Result<bool> {
		self.sync_disabled_with(target, SyncOptions::default())
	}

	fn sync_disabled_with(&mut self, target: &Locator, options: SyncOptions) -> Result<bool> {
		sync(self, &Condition::Disabled, target, options)
	}

	fn sync_text(&mut self, target: &Locator, text: &str) -> Result<bool> {
		self.sync_text_with(target, text, SyncOptions::default())
	}

	fn sync_text_with(&mut self, target: &Locator, text: &str, options: SyncOptions) -> Result<bool> {
		sync(self, &Condition::TextContains(text.to_string()), target, options)
	}
}

impl<D: Driver + ?Sized> SyncExt for D {}

#[cfg(test)]
mod tests {
	use std::time::Instant;

	use super::*;
	use crate::settings::test_lock::lock_settings;
	use crate::testing::{ElementState, ScriptedDriver};

	#[test]
	fn options_builders() {
		assert_eq!(SyncOptions::new(), SyncOptions::default());
		let opts = SyncOptions::within(5).fail_on_timeout(false);
		assert_eq!(opts.timeout, Some(5));
		assert_eq!(opts.fail_on_timeout, Some(false));
	}

	#[test]
	fn succeeds_once_element_appears() {
		let target = Locator::id("toast");
		let mut driver = ScriptedDriver::new().element_after(
			target.clone(),
			Duration::from_millis(200),
			ElementState::visible(),
		);

		let started = Instant::now();
		let found = driver
			.sync_visible_with(&target, SyncOptions::within(3).fail_on_timeout(true))
			.unwrap();
		assert!(found);
		assert!(started.elapsed() >= Duration::from_millis(200));
		assert!(started.elapsed() < Duration::from_secs(2));
	}

	#[test]
	fn exhaustion_without_fail_policy_returns_false() {
		let target = Locator::id("never");
		let mut driver = ScriptedDriver::new();
		let started = Instant::now();
		let found = driver
			.sync_present_with(&target, SyncOptions::within(1).fail_on_timeout(false))
			.unwrap();
		assert!(!found);
		assert!(started.elapsed() >= Duration::from_secs(1));
	}

	#[test]
	fn exhaustion_with_fail_policy_raises() {
		let target = Locator::css("#submit");
		let mut driver = ScriptedDriver::new().element(target.clone(), ElementState::visible().disabled());
		let err = driver
			.sync_enabled_with(&target, SyncOptions::within(1).fail_on_timeout(true))
			.unwrap_err();
		assert!(err.is_timeout());
		assert!(err.elapsed().unwrap() >= Duration::from_secs(1));
		let msg = err.to_string();
		assert!(msg.contains("By.cssSelector: #submit"), "{msg}");
		assert!(msg.contains("is not ENABLED"), "{msg}");
	}

	#[test]
	fn hidden_on_invisible_target_returns_on_first_evaluation() {
		let target = Locator::id("spinner");
		let mut driver = ScriptedDriver::new().element(target.clone(), ElementState::hidden());
		let started = Instant::now();
		assert!(driver.sync_hidden_with(&target, SyncOptions::within(10)).unwrap());
		assert!(started.elapsed() < Duration::from_millis(500));
		assert_eq!(driver.resolve_count(&target), 1);
	}

	#[test]
	fn disabled_waits_for_control_to_lock() {
		let target = Locator::id("pay");
		let mut driver = ScriptedDriver::new()
			.element(target.clone(), ElementState::visible())
			.element_after(target.clone(), Duration::from_millis(100), ElementState::visible().disabled());
		assert!(driver.sync_disabled_with(&target, SyncOptions::within(2)).unwrap());
	}

	#[test]
	fn text_sync_sees_late_text() {
		let target = Locator::id("status");
		let mut driver = ScriptedDriver::new()
			.element(target.clone(), ElementState::visible().text("Saving..."))
			.element_after(target.clone(), Duration::from_millis(100), ElementState::visible().text("Saved"));
		assert!(driver.sync_text_with(&target, "Saved", SyncOptions::within(2)).unwrap());
	}

	#[test]
	fn text_timeout_message_names_text() {
		let target = Locator::id("status");
		let mut driver = ScriptedDriver::new().element(target.clone(), ElementState::visible().text("Saving..."));
		let err = driver
			.sync_text_with(&target, "Saved", SyncOptions::within(0).fail_on_timeout(true))
			.unwrap_err();
		assert!(err.to_string().contains("did not contain the text [ Saved ]"));
	}

	#[test]
	fn ambient_timeout_restored_after_success_and_failure() {
		let target = Locator::id("x");
		let mut driver = ScriptedDriver::new()
			.with_ambient_timeout(Duration::from_secs(8))
			.element(target.clone(), ElementState::visible());

		assert!(driver.sync_present_with(&target, SyncOptions::within(1)).unwrap());
		assert_eq!(driver.ambient_timeout(), Duration::from_secs(8));

		let missing = Locator::id("missing");
		let _ = driver.sync_present_with(&missing, SyncOptions::within(0).fail_on_timeout(true));
		assert_eq!(driver.ambient_timeout(), Duration::from_secs(8));
		assert_eq!(
			driver.ambient_history(),
			vec![
				Duration::from_millis(1),
				Duration::from_secs(8),
				Duration::from_millis(1),
				Duration::from_secs(8),
			]
		);
	}

	#[test]
	fn default_timeout_comes_from_driver() {
		let _guard = lock_settings();
		settings::set_fail_on_timeout(false);

		let target = Locator::id("missing");
		let mut driver = ScriptedDriver::new().with_ambient_timeout(Duration::from_millis(900));
		let started = Instant::now();
		// 900ms truncates to a zero-second budget: one check, no waiting
		assert!(!driver.sync_present(&target).unwrap());
		assert!(started.elapsed() < Duration::from_millis(500));
		assert_eq!(driver.resolve_count(&target), 1);

		settings::reset();
	}

	#[test]
	fn global_policy_applies_without_override() {
		let _guard = lock_settings();
		let target = Locator::id("missing");
		let mut driver = ScriptedDriver::new();

		settings::set_fail_on_timeout(true);
		assert!(driver.sync_visible_with(&target, SyncOptions::within(0)).is_err());

		settings::set_fail_on_timeout(false);
		assert!(!driver.sync_visible_with(&target, SyncOptions::within(0)).unwrap());

		// per-call override beats the global flag
		assert!(
			driver
				.sync_visible_with(&target, SyncOptions::within(0).fail_on_timeout(true))
				.is_err()
		);

		settings::reset();
	}
}
