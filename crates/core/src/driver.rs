//! Capabilities consumed from the browser driver.
//!
//! The engine never talks to a browser directly. It queries a [`Driver`] for
//! element handles and script results, and reads element state through the
//! [`Element`] trait. Real sessions implement these in an adapter crate; the
//! [`testing`](crate::testing) module provides a scripted in-memory one.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DriverError;

/// Result of a single driver query.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// A browser session the engine can poll.
///
/// `set_ambient_timeout` takes `&mut self`, so a driver cannot be shared by
/// two poll loops at once.
pub trait Driver {
	/// Live element handle returned by [`Driver::resolve_once`].
	type Element: Element;

	/// Looks the locator up once, bounded only by the ambient timeout.
	fn resolve_once(&self, locator: &Locator) -> DriverResult<Self::Element>;

	/// The driver's own implicit wait applied to element lookups.
	fn ambient_timeout(&self) -> Duration;

	/// Replaces the implicit wait.
	fn set_ambient_timeout(&mut self, timeout: Duration);

	/// Budget used by element syncs when the caller gives none.
	fn default_sync_timeout(&self) -> Duration {
		self.ambient_timeout()
	}

	/// Budget used by whole-page probes when the caller gives none.
	fn page_timeout(&self) -> Duration;

	/// Runs a synchronous script in the page and returns its value.
	fn run_script(&self, source: &str) -> DriverResult<Value>;

	/// Runs an asynchronous script, waiting for its callback.
	fn run_script_async(&self, source: &str) -> DriverResult<Value>;
}

/// State readings on a resolved element.
pub trait Element {
	fn location(&self) -> DriverResult<Point>;

	fn size(&self) -> DriverResult<Size>;

	/// Attribute value, `None` when the attribute is absent.
	fn attribute(&self, name: &str) -> DriverResult<Option<String>>;

	/// Rendered text.
	fn text(&self) -> DriverResult<String>;

	/// Content of the `value` attribute, empty when absent.
	fn value_text(&self) -> DriverResult<String> {
		Ok(self.attribute("value")?.unwrap_or_default())
	}

	fn is_displayed(&self) -> DriverResult<bool>;

	fn is_enabled(&self) -> DriverResult<bool>;
}

/// Top-left corner of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Rendered box of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// How a [`Locator`] finds its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
	Css,
	XPath,
	Id,
	Name,
	LinkText,
	PartialLinkText,
	TagName,
	ClassName,
}

impl Strategy {
	fn label(self) -> &'static str {
		match self {
			Self::Css => "cssSelector",
			Self::XPath => "xpath",
			Self::Id => "id",
			Self::Name => "name",
			Self::LinkText => "linkText",
			Self::PartialLinkText => "partialLinkText",
			Self::TagName => "tagName",
			Self::ClassName => "className",
		}
	}
}

/// A target element, identified by strategy and value.
///
/// Nothing is cached: each poll attempt resolves the locator afresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
	pub strategy: Strategy,
	pub value: String,
}

impl Locator {
	pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
		Self {
			strategy,
			value: value.into(),
		}
	}

	pub fn css(selector: impl Into<String>) -> Self {
		Self::new(Strategy::Css, selector)
	}

	pub fn xpath(expression: impl Into<String>) -> Self {
		Self::new(Strategy::XPath, expression)
	}

	pub fn id(id: impl Into<String>) -> Self {
		Self::new(Strategy::Id, id)
	}

	pub fn link_text(text: impl Into<String>) -> Self {
		Self::new(Strategy::LinkText, text)
	}

	/// Human-readable form used in logs and timeout errors.
	pub fn description(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "By.{}: {}", self.strategy.label(), self.value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn locator_description_matches_by_notation() {
		assert_eq!(Locator::link_text("Accounts").description(), "By.linkText: Accounts");
		assert_eq!(
			Locator::xpath("//li[contains(.,'Employees')]/a").description(),
			"By.xpath: //li[contains(.,'Employees')]/a"
		);
	}

	#[test]
	fn locator_deserializes_from_json() {
		let loc: Locator = serde_json::from_str(r#"{"strategy": "css", "value": "nav a"}"#).unwrap();
		assert_eq!(loc, Locator::css("nav a"));
	}
}
