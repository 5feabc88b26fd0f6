//! W3C WebDriver oracle for pagesync.
//!
//! [`WebDriverSession`] wraps a fantoccini client and drives it from a
//! private tokio runtime so the blocking sync engine can poll a real
//! browser:
//!
//! ```ignore
//! use pagesync::{Locator, SyncExt, is_dom_complete};
//! use pagesync_webdriver::WebDriverSession;
//!
//! let mut session = WebDriverSession::connect("http://localhost:4444")?;
//! session.goto("https://example.com")?;
//! is_dom_complete(&session, None);
//! session.sync_visible(&Locator::css("h1"))?;
//! session.close()?;
//! ```

mod element;
mod error;
mod locator;
mod session;

pub use element::WebElement;
pub use error::{SessionError, classify};
pub use session::WebDriverSession;
