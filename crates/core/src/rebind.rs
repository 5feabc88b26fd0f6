//! Page objects and the rebind loop that waits for them to be fully wired.
//!
//! A page object declares its elements as [`PageElement`] fields and builds
//! itself in [`PageObject::bind`]. [`is_page_wired`] keeps building fresh
//! instances until every declared element resolves.

use std::any::type_name;

use thiserror::Error;
use tracing::{debug, trace};

use crate::driver::{Driver, Locator};
use crate::error::{DriverError, Error, Result};
use crate::settings;
use crate::timeout::{AmbientTimeoutGuard, resolve_budget};

/// Why a page object could not be bound.
#[derive(Debug, Error)]
pub enum BindError {
	/// An element was missing or stale; the page may still be loading.
	#[error("element not ready: {0}")]
	NotReady(DriverError),

	/// The page object cannot be built at all.
	#[error("{0}")]
	Construction(String),

	/// The driver failed in a way that retrying will not fix.
	#[error(transparent)]
	Driver(DriverError),
}

impl From<DriverError> for BindError {
	fn from(err: DriverError) -> Self {
		if err.is_transient() {
			BindError::NotReady(err)
		} else {
			BindError::Driver(err)
		}
	}
}

/// A page type with an explicit factory.
pub trait PageObject<D: Driver + ?Sized>: Sized {
	/// Builds a fresh instance, resolving every declared element once.
	fn bind(driver: &D) -> std::result::Result<Self, BindError>;

	/// True when every declared element resolved.
	fn is_wired(&self) -> bool;
}

/// A declared element of a page object: its locator and, once resolved,
/// the live handle.
#[derive(Debug, Clone)]
pub struct PageElement<E> {
	locator: Locator,
	handle: Option<E>,
}

impl<E> PageElement<E> {
	/// Resolves `locator` once. A missing or stale element yields an unbound
	/// field; other driver failures are returned.
	pub fn bind<D>(driver: &D, locator: Locator) -> std::result::Result<Self, BindError>
	where
		D: Driver<Element = E> + ?Sized,
	{
		let handle = match driver.resolve_once(&locator) {
			Ok(handle) => Some(handle),
			Err(err) if err.is_transient() => {
				trace!(%locator, error = %err, "page element unbound");
				None
			}
			Err(err) => return Err(BindError::Driver(err)),
		};
		Ok(Self { locator, handle })
	}

	pub fn is_bound(&self) -> bool {
		self.handle.is_some()
	}

	pub fn locator(&self) -> &Locator {
		&self.locator
	}

	/// The live handle, or [`DriverError::NoSuchElement`] when unbound.
	pub fn handle(&self) -> std::result::Result<&E, DriverError> {
		self.handle
			.as_ref()
			.ok_or_else(|| DriverError::NoSuchElement(self.locator.description()))
	}
}

/// Rebinds `P` until it is wired, returning the wired instance.
///
/// The first bind is followed by at most `timeout` rebinds, back to back.
/// `None` uses the driver's default sync timeout in seconds as the rebind
/// count. The ambient timeout is lowered for the whole loop.
///
/// # Errors
///
/// [`Error::PageBinding`] when `P` cannot be constructed, whatever the
/// fail-on-timeout policy.
///
/// [`Error::Driver`] when a bind hits a driver failure that is not
/// [transient](DriverError::is_transient), such as a closed session or a
/// failing script. Only missing, stale and timed-out elements count as
/// "not wired yet"; anything else ends the loop and is returned as is.
pub fn wait_for_page<P, D>(driver: &mut D, timeout: Option<u64>) -> Result<Option<P>>
where
	P: PageObject<D>,
	D: Driver + ?Sized,
{
	let budget = resolve_budget(timeout, driver.default_sync_timeout());
	let probe_timeout = settings::current().probe_timeout;
	let page = type_name::<P>();
	debug!(page, rebinds = budget, "waiting for page to be wired");

	let guard = AmbientTimeoutGuard::lower(driver, probe_timeout);
	let driver: &D = &guard;
	let mut rebinds = 0u64;
	loop {
		match P::bind(driver) {
			Ok(bound) if bound.is_wired() => {
				debug!(page, rebinds, "page wired");
				return Ok(Some(bound));
			}
			Ok(_) => trace!(page, rebinds, "page not wired yet"),
			Err(BindError::NotReady(err)) => trace!(page, rebinds, error = %err, "page not ready"),
			Err(BindError::Construction(reason)) => return Err(Error::PageBinding { page, reason }),
			Err(BindError::Driver(err)) => return Err(Error::Driver(err)),
		}

		if rebinds == budget {
			debug!(page, rebinds, "page never wired");
			return Ok(None);
		}
		rebinds += 1;
	}
}

/// Whether `P` becomes wired within `timeout` rebinds. See [`wait_for_page`].
pub fn is_page_wired<P, D>(driver: &mut D, timeout: Option<u64>) -> Result<bool>
where
	P: PageObject<D>,
	D: Driver + ?Sized,
{
	wait_for_page::<P, D>(driver, timeout).map(|page| page.is_some())
}
