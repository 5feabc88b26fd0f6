//! Whole-page readiness probes.
//!
//! Unlike element syncs these never fail: exhaustion is `false` whatever
//! the fail-on-timeout policy says.

use serde_json::Value;
use tracing::{debug, warn};

use crate::driver::Driver;
use crate::poll::poll_until;
use crate::settings;
use crate::timeout::resolve_budget;

const READY_STATE_SCRIPT: &str = "return document.readyState;";

const FRAMEWORK_IDLE_SCRIPT: &str = "var callback = arguments[arguments.length - 1];\
	angular.element(document.body).injector().get('$browser').notifyWhenNoOutstandingRequests(callback);";

/// Which `document.readyState` values count as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
	/// `interactive` or `complete`.
	Interactive,
	/// `complete` only.
	Complete,
}

impl ReadyState {
	fn accepts(self, state: &str) -> bool {
		match self {
			ReadyState::Interactive => matches!(state, "interactive" | "complete"),
			ReadyState::Complete => state == "complete",
		}
	}
}

/// Waits for the DOM to be at least interactive.
///
/// `timeout` counts attempts spaced by the page poll interval (500ms by
/// default), so the longest wait is `timeout * 500ms`. `None` uses the
/// driver's page timeout in seconds.
pub fn is_dom_interactive<D: Driver + ?Sized>(driver: &D, timeout: Option<u64>) -> bool {
	wait_for_ready_state(driver, ReadyState::Interactive, timeout)
}

/// Waits for the DOM to be complete. Same budget rules as [`is_dom_interactive`].
pub fn is_dom_complete<D: Driver + ?Sized>(driver: &D, timeout: Option<u64>) -> bool {
	wait_for_ready_state(driver, ReadyState::Complete, timeout)
}

/// Polls `document.readyState` until it satisfies `wanted`.
pub fn wait_for_ready_state<D: Driver + ?Sized>(driver: &D, wanted: ReadyState, timeout: Option<u64>) -> bool {
	let budget = resolve_budget(timeout, driver.page_timeout());
	let interval = settings::current().page_poll_interval();
	debug!(?wanted, attempts = budget, ?interval, "waiting for document ready state");

	let outcome = poll_until(
		|| match driver.run_script(READY_STATE_SCRIPT) {
			Ok(Value::String(state)) => wanted.accepts(&state),
			Ok(other) => {
				debug!(value = %other, "unexpected readyState value");
				false
			}
			Err(err) => {
				debug!(error = %err, "readyState probe failed");
				false
			}
		},
		budget,
		interval,
	);

	if !outcome.succeeded {
		debug!(?wanted, elapsed_ms = outcome.elapsed.as_millis() as u64, "document never reached ready state");
	}
	outcome.succeeded
}

/// Waits for the page's AngularJS `$browser` service to report no
/// outstanding requests.
///
/// The asynchronous script call is itself the wait. When the hook is not
/// available the probe degrades to [`is_dom_complete`] with the driver's
/// page timeout.
pub fn is_framework_idle<D: Driver + ?Sized>(driver: &D) -> bool {
	match driver.run_script_async(FRAMEWORK_IDLE_SCRIPT) {
		Ok(_) => true,
		Err(err) => {
			warn!(
				error = %err,
				"Unable to perform Angular sync. The $browser service is most likely not injected; falling back to DOM complete"
			);
			is_dom_complete(driver, None)
		}
	}
}
