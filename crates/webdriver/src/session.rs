//! Blocking WebDriver session implementing [`pagesync::Driver`].

use std::sync::Arc;
use std::time::Duration;

use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use pagesync::{Driver, DriverResult, Locator};
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};

use crate::element::WebElement;
use crate::error::{SessionError, classify};
use crate::locator::Lookup;

/// Page load budget used when the remote end does not report one.
const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(300);

/// A WebDriver session driven from a private single-threaded runtime.
pub struct WebDriverSession {
	runtime: Arc<Runtime>,
	client: Client,
	ambient: Duration,
	page_timeout: Duration,
}

impl WebDriverSession {
	/// Opens a session against a running WebDriver server
	/// (chromedriver, geckodriver, Selenium).
	pub fn connect(webdriver_url: &str) -> Result<Self, SessionError> {
		let runtime = Arc::new(Builder::new_current_thread().enable_all().build()?);
		let client = runtime.block_on(ClientBuilder::native().connect(webdriver_url))?;
		let timeouts = runtime.block_on(client.get_timeouts()).map_err(classify)?;
		let ambient = timeouts.implicit().unwrap_or(Duration::ZERO);
		let page_timeout = timeouts.page_load().unwrap_or(DEFAULT_PAGE_TIMEOUT);
		info!(url = %webdriver_url, ?ambient, ?page_timeout, "webdriver session opened");

		Ok(Self {
			runtime,
			client,
			ambient,
			page_timeout,
		})
	}

	pub fn goto(&self, url: &str) -> DriverResult<()> {
		self.runtime.block_on(self.client.goto(url)).map_err(classify)
	}

	/// The underlying fantoccini client, for interactions.
	pub fn client(&self) -> &Client {
		&self.client
	}

	/// Ends the session and shuts the browser down.
	pub fn close(self) -> Result<(), SessionError> {
		let Self { runtime, client, .. } = self;
		runtime.block_on(client.close()).map_err(classify)?;
		Ok(())
	}
}

impl Driver for WebDriverSession {
	type Element = WebElement;

	fn resolve_once(&self, locator: &Locator) -> DriverResult<WebElement> {
		let lookup = Lookup::from(locator);
		self.runtime
			.block_on(self.client.find(lookup.as_fantoccini()))
			.map(|el| WebElement::new(Arc::clone(&self.runtime), el))
			.map_err(classify)
	}

	fn ambient_timeout(&self) -> Duration {
		self.ambient
	}

	fn set_ambient_timeout(&mut self, timeout: Duration) {
		let update = TimeoutConfiguration::new(None, None, Some(timeout));
		match self.runtime.block_on(self.client.update_timeouts(update)) {
			Ok(()) => self.ambient = timeout,
			Err(err) => warn!(?timeout, error = %err, "failed to update implicit wait"),
		}
	}

	fn page_timeout(&self) -> Duration {
		self.page_timeout
	}

	fn run_script(&self, source: &str) -> DriverResult<Value> {
		self.runtime
			.block_on(self.client.execute(source, Vec::new()))
			.map_err(classify)
	}

	fn run_script_async(&self, source: &str) -> DriverResult<Value> {
		self.runtime
			.block_on(self.client.execute_async(source, Vec::new()))
			.map_err(classify)
	}
}
