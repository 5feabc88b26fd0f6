//! pagesync: bounded-time condition synchronization for browser tests.
//!
//! Test code asks the engine to wait until an element is present, visible,
//! hidden, enabled, disabled, or contains some text, or until the whole page
//! has loaded, before carrying on. The engine polls a [`Driver`] until the
//! condition holds or the budget runs out, and then either returns `false`
//! or fails, depending on the fail-on-timeout policy.
//!
//! # Examples
//!
//! ```ignore
//! use pagesync::{Locator, SyncExt, SyncOptions, is_dom_complete, settings};
//!
//! fn submit_order<D: pagesync::Driver>(driver: &mut D) -> pagesync::Result<()> {
//!     settings::set_fail_on_timeout(true);
//!     is_dom_complete(driver, None);
//!
//!     let pay = Locator::id("pay");
//!     driver.sync_enabled(&pay)?;
//!
//!     // ... click pay ...
//!
//!     let spinner = Locator::css(".spinner");
//!     if !driver.sync_hidden_with(&spinner, SyncOptions::within(30).fail_on_timeout(false))? {
//!         tracing::warn!("spinner still showing");
//!     }
//!     driver.sync_text(&Locator::id("status"), "Order placed")?;
//!     Ok(())
//! }
//! ```
//!
//! # Timeouts
//!
//! Element syncs take a budget in whole seconds and poll back to back. The
//! page probes take an attempt count and sleep between attempts (500ms by
//! default), so their longest wait is `timeout * 500ms`.
//!
//! While an element sync or a page rebind runs, the driver's ambient
//! (implicit-wait) timeout is lowered so its own waits do not stack with
//! the poll loop; it is restored on every exit path.

mod condition;
mod error;
mod poll;
mod probe;
mod rebind;
mod sync;

pub mod driver;
pub mod settings;
pub mod testing;
pub mod timeout;

pub use condition::Condition;
pub use driver::{Driver, DriverResult, Element, Locator, Point, Size, Strategy};
pub use error::{DriverError, Error, Result};
pub use poll::{PollOutcome, poll_until};
pub use probe::{ReadyState, is_dom_complete, is_dom_interactive, is_framework_idle, wait_for_ready_state};
pub use rebind::{BindError, PageElement, PageObject, is_page_wired, wait_for_page};
pub use settings::SyncSettings;
pub use sync::{SyncExt, SyncOptions, sync};
pub use timeout::AmbientTimeoutGuard;
