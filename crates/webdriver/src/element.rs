//! Element handle over a fantoccini element.

use std::sync::Arc;

use fantoccini::elements::Element as FantocciniElement;
use pagesync::{DriverResult, Element, Point, Size};
use tokio::runtime::Runtime;

use crate::error::classify;

/// A resolved element, read through the session's runtime.
#[derive(Clone)]
pub struct WebElement {
	runtime: Arc<Runtime>,
	inner: FantocciniElement,
}

impl WebElement {
	pub(crate) fn new(runtime: Arc<Runtime>, inner: FantocciniElement) -> Self {
		Self { runtime, inner }
	}

	/// The underlying fantoccini element, for interactions.
	pub fn inner(&self) -> &FantocciniElement {
		&self.inner
	}

	fn rect(&self) -> DriverResult<(f64, f64, f64, f64)> {
		self.runtime.block_on(self.inner.rectangle()).map_err(classify)
	}
}

impl std::fmt::Debug for WebElement {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WebElement").finish_non_exhaustive()
	}
}

impl Element for WebElement {
	fn location(&self) -> DriverResult<Point> {
		let (x, y, _, _) = self.rect()?;
		Ok(Point::new(x, y))
	}

	fn size(&self) -> DriverResult<Size> {
		let (_, _, width, height) = self.rect()?;
		Ok(Size::new(width, height))
	}

	fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
		self.runtime.block_on(self.inner.attr(name)).map_err(classify)
	}

	fn text(&self) -> DriverResult<String> {
		self.runtime.block_on(self.inner.text()).map_err(classify)
	}

	/// Live `value` property, which tracks typing unlike the attribute.
	fn value_text(&self) -> DriverResult<String> {
		self.runtime
			.block_on(self.inner.prop("value"))
			.map(Option::unwrap_or_default)
			.map_err(classify)
	}

	fn is_displayed(&self) -> DriverResult<bool> {
		self.runtime.block_on(self.inner.is_displayed()).map_err(classify)
	}

	fn is_enabled(&self) -> DriverResult<bool> {
		self.runtime.block_on(self.inner.is_enabled()).map_err(classify)
	}
}
