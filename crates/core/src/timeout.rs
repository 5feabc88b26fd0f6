//! Wait budgets and the ambient-timeout guard.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::driver::Driver;

/// Effective budget in whole seconds: the explicit value if given, else the
/// driver default truncated to seconds.
pub fn resolve_budget(explicit: Option<u64>, default: Duration) -> u64 {
	explicit.unwrap_or_else(|| default.as_secs())
}

/// Converts a budget in whole seconds to a [`Duration`].
pub fn budget_duration(budget_secs: u64) -> Duration {
	Duration::from_secs(budget_secs)
}

/// Lowers a driver's ambient timeout for as long as the guard lives.
///
/// The prior value is captured on construction and written back on drop,
/// so every exit path (early return, `?`, panic) restores it. The guard
/// dereferences to the driver, and holding it keeps the driver mutably
/// borrowed.
pub struct AmbientTimeoutGuard<'a, D: Driver + ?Sized> {
	driver: &'a mut D,
	saved: Duration,
}

impl<'a, D: Driver + ?Sized> AmbientTimeoutGuard<'a, D> {
	pub fn lower(driver: &'a mut D, probe: Duration) -> Self {
		let saved = driver.ambient_timeout();
		tracing::trace!(?saved, ?probe, "lowering ambient timeout");
		driver.set_ambient_timeout(probe);
		Self { driver, saved }
	}

	/// The ambient timeout that will be restored.
	pub fn saved(&self) -> Duration {
		self.saved
	}
}

impl<D: Driver + ?Sized> Deref for AmbientTimeoutGuard<'_, D> {
	type Target = D;

	fn deref(&self) -> &D {
		self.driver
	}
}

impl<D: Driver + ?Sized> DerefMut for AmbientTimeoutGuard<'_, D> {
	fn deref_mut(&mut self) -> &mut D {
		self.driver
	}
}

impl<D: Driver + ?Sized> Drop for AmbientTimeoutGuard<'_, D> {
	fn drop(&mut self) {
		tracing::trace!(restored = ?self.saved, "restoring ambient timeout");
		self.driver.set_ambient_timeout(self.saved);
	}
}
