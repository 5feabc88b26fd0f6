//! Bounded-time retry loop shared by every sync operation.
//!
//! Two modes, picked by the interval:
//!
//! - **Continuous** (`interval == 0`): evaluate back to back until the
//!   condition holds or `budget_secs` of wall-clock time have passed. The
//!   cost of each evaluation is the only throttle. A zero budget evaluates
//!   exactly once.
//! - **Fixed interval** (`interval > 0`): after each failed attempt, stop if
//!   `budget_secs` attempts have already been slept through, otherwise sleep
//!   `interval` and try again. The budget counts attempts here, so the
//!   longest wait is `budget_secs * interval`, not `budget_secs` seconds.

use std::time::{Duration, Instant};

use crate::timeout::budget_duration;

/// How a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
	pub succeeded: bool,
	pub elapsed: Duration,
	/// Number of times the evaluator ran.
	pub attempts: u64,
}

/// Runs `evaluate` until it returns `true` or the budget is spent.
///
/// Never fails: exhaustion is reported through [`PollOutcome::succeeded`].
/// `evaluate` must swallow its own driver errors.
pub fn poll_until<F>(mut evaluate: F, budget_secs: u64, interval: Duration) -> PollOutcome
where
	F: FnMut() -> bool,
{
	let started = Instant::now();
	let budget = budget_duration(budget_secs);
	let mut attempts = 0u64;
	let mut slept = 0u64;

	let succeeded = loop {
		attempts += 1;
		if evaluate() {
			break true;
		}

		if interval.is_zero() {
			if started.elapsed() >= budget {
				break false;
			}
		} else {
			if slept == budget_secs {
				break false;
			}
			std::thread::sleep(interval);
			slept += 1;
		}
	};

	PollOutcome {
		succeeded,
		elapsed: started.elapsed(),
		attempts,
	}
}
