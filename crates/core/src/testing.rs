//! Scripted in-memory driver.
//!
//! [`ScriptedDriver`] plays back element and document states on a timeline
//! that starts when the driver is created. It lets page objects and sync
//! calls be exercised without a browser:
//!
//! ```ignore
//! let driver = ScriptedDriver::new()
//!     .element(Locator::id("spinner"), ElementState::visible())
//!     .element_after(Locator::id("spinner"), Duration::from_millis(300), ElementState::hidden());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;

use crate::driver::{Driver, DriverResult, Element, Locator, Point, Size};
use crate::error::DriverError;

/// Snapshot of an element's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
	pub location: Point,
	pub size: Size,
	pub attributes: HashMap<String, String>,
	pub text: String,
	pub displayed: bool,
	pub enabled: bool,
	/// Every reading on a stale handle fails with [`DriverError::StaleElement`].
	pub stale: bool,
}

impl ElementState {
	/// On screen at (10, 10), 100x20, displayed and enabled.
	pub fn visible() -> Self {
		Self {
			location: Point::new(10.0, 10.0),
			size: Size::new(100.0, 20.0),
			attributes: HashMap::new(),
			text: String::new(),
			displayed: true,
			enabled: true,
			stale: false,
		}
	}

	/// In the DOM but with no position, no box, not displayed.
	pub fn hidden() -> Self {
		Self {
			location: Point::default(),
			size: Size::default(),
			displayed: false,
			..Self::visible()
		}
	}

	pub fn stale() -> Self {
		Self {
			stale: true,
			..Self::visible()
		}
	}

	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.location = Point::new(x, y);
		self
	}

	pub fn sized(mut self, width: f64, height: f64) -> Self {
		self.size = Size::new(width, height);
		self
	}

	pub fn attr(mut self, name: &str, value: &str) -> Self {
		self.attributes.insert(name.to_string(), value.to_string());
		self
	}

	pub fn text(mut self, text: &str) -> Self {
		self.text = text.to_string();
		self
	}

	pub fn disabled(mut self) -> Self {
		self.enabled = false;
		self
	}
}

/// Timeline of states; `None` means the element is absent.
#[derive(Debug, Clone, Default)]
struct Timeline<T> {
	steps: Vec<(Duration, T)>,
}

impl<T: Clone> Timeline<T> {
	fn push(&mut self, at: Duration, value: T) {
		self.steps.push((at, value));
		self.steps.sort_by_key(|(at, _)| *at);
	}

	fn at(&self, elapsed: Duration) -> Option<T> {
		self.steps
			.iter()
			.rev()
			.find(|(at, _)| *at <= elapsed)
			.map(|(_, value)| value.clone())
	}
}

/// In-memory [`Driver`] with scheduled element and document states.
pub struct ScriptedDriver {
	started: Instant,
	elements: HashMap<Locator, Timeline<Option<ElementState>>>,
	ready_state: Timeline<String>,
	framework_hook: DriverResult<Value>,
	script_failure: Option<DriverError>,
	ambient: Duration,
	ambient_history: Vec<Duration>,
	page_timeout: Duration,
	resolves: Mutex<HashMap<Locator, usize>>,
	script_calls: AtomicUsize,
}

impl Default for ScriptedDriver {
	fn default() -> Self {
		Self::new()
	}
}

impl ScriptedDriver {
	/// Empty page, `readyState == "complete"`, no framework hook, 5s ambient
	/// timeout and 30s page timeout.
	pub fn new() -> Self {
		let mut ready_state = Timeline::default();
		ready_state.push(Duration::ZERO, "complete".to_string());
		Self {
			started: Instant::now(),
			elements: HashMap::new(),
			ready_state,
			framework_hook: Err(DriverError::Script("angular is not defined".into())),
			script_failure: None,
			ambient: Duration::from_secs(5),
			ambient_history: Vec::new(),
			page_timeout: Duration::from_secs(30),
			resolves: Mutex::new(HashMap::new()),
			script_calls: AtomicUsize::new(0),
		}
	}

	pub fn with_ambient_timeout(mut self, timeout: Duration) -> Self {
		self.ambient = timeout;
		self
	}

	pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
		self.page_timeout = timeout;
		self
	}

	/// Element present from the start.
	pub fn element(self, locator: Locator, state: ElementState) -> Self {
		self.element_after(locator, Duration::ZERO, state)
	}

	/// Element takes `state` once `delay` has elapsed.
	pub fn element_after(mut self, locator: Locator, delay: Duration, state: ElementState) -> Self {
		self.elements.entry(locator).or_default().push(delay, Some(state));
		self
	}

	/// Element leaves the DOM once `delay` has elapsed.
	pub fn removed_after(mut self, locator: Locator, delay: Duration) -> Self {
		self.elements.entry(locator).or_default().push(delay, None);
		self
	}

	/// Document `readyState` from the start.
	pub fn ready_state(self, state: &str) -> Self {
		self.ready_state_after(Duration::ZERO, state)
	}

	/// Document `readyState` once `delay` has elapsed.
	pub fn ready_state_after(mut self, delay: Duration, state: &str) -> Self {
		self.ready_state.push(delay, state.to_string());
		self
	}

	/// Installs the client-side framework idle hook.
	pub fn with_framework_hook(mut self) -> Self {
		self.framework_hook = Ok(Value::Null);
		self
	}

	/// Makes every synchronous script fail with `error`.
	pub fn failing_scripts(mut self, error: DriverError) -> Self {
		self.script_failure = Some(error);
		self
	}

	/// Every value passed to `set_ambient_timeout`, in order.
	pub fn ambient_history(&self) -> Vec<Duration> {
		self.ambient_history.clone()
	}

	/// How many times `locator` was resolved.
	pub fn resolve_count(&self, locator: &Locator) -> usize {
		self.resolves.lock().get(locator).copied().unwrap_or(0)
	}

	/// Number of scripts run, synchronous and asynchronous.
	pub fn script_calls(&self) -> usize {
		self.script_calls.load(Ordering::SeqCst)
	}

	fn elapsed(&self) -> Duration {
		self.started.elapsed()
	}
}

impl Driver for ScriptedDriver {
	type Element = ScriptedElement;

	fn resolve_once(&self, locator: &Locator) -> DriverResult<ScriptedElement> {
		*self.resolves.lock().entry(locator.clone()).or_insert(0) += 1;
		self.elements
			.get(locator)
			.and_then(|timeline| timeline.at(self.elapsed()).flatten())
			.map(|state| ScriptedElement { state })
			.ok_or_else(|| DriverError::NoSuchElement(locator.description()))
	}

	fn ambient_timeout(&self) -> Duration {
		self.ambient
	}

	fn set_ambient_timeout(&mut self, timeout: Duration) {
		self.ambient = timeout;
		self.ambient_history.push(timeout);
	}

	fn page_timeout(&self) -> Duration {
		self.page_timeout
	}

	fn run_script(&self, source: &str) -> DriverResult<Value> {
		self.script_calls.fetch_add(1, Ordering::SeqCst);
		if let Some(error) = &self.script_failure {
			return Err(error.clone());
		}
		if source.contains("document.readyState") {
			let state = self.ready_state.at(self.elapsed()).unwrap_or_else(|| "loading".to_string());
			return Ok(Value::String(state));
		}
		Err(DriverError::Unsupported(format!("script not scripted: {source}")))
	}

	fn run_script_async(&self, _source: &str) -> DriverResult<Value> {
		self.script_calls.fetch_add(1, Ordering::SeqCst);
		self.framework_hook.clone()
	}
}

/// Handle returned by [`ScriptedDriver`]: a frozen snapshot of one resolution.
#[derive(Debug, Clone)]
pub struct ScriptedElement {
	state: ElementState,
}

impl ScriptedElement {
	fn read<T>(&self, f: impl FnOnce(&ElementState) -> T) -> DriverResult<T> {
		if self.state.stale {
			return Err(DriverError::StaleElement("element is no longer attached to the DOM".into()));
		}
		Ok(f(&self.state))
	}
}

impl Element for ScriptedElement {
	fn location(&self) -> DriverResult<Point> {
		self.read(|s| s.location)
	}

	fn size(&self) -> DriverResult<Size> {
		self.read(|s| s.size)
	}

	fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
		self.read(|s| s.attributes.get(name).cloned())
	}

	fn text(&self) -> DriverResult<String> {
		self.read(|s| s.text.clone())
	}

	fn is_displayed(&self) -> DriverResult<bool> {
		self.read(|s| s.displayed)
	}

	fn is_enabled(&self) -> DriverResult<bool> {
		self.read(|s| s.enabled)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timeline_picks_latest_step_at_or_before() {
		let mut timeline = Timeline::default();
		timeline.push(Duration::from_millis(100), "b");
		timeline.push(Duration::ZERO, "a");
		assert_eq!(timeline.at(Duration::ZERO), Some("a"));
		assert_eq!(timeline.at(Duration::from_millis(99)), Some("a"));
		assert_eq!(timeline.at(Duration::from_millis(150)), Some("b"));
	}

	#[test]
	fn unknown_locator_is_missing() {
		let driver = ScriptedDriver::new();
		let err = driver.resolve_once(&Locator::id("nope")).unwrap_err();
		assert_eq!(err, DriverError::NoSuchElement("By.id: nope".into()));
		assert_eq!(driver.resolve_count(&Locator::id("nope")), 1);
	}

	#[test]
	fn stale_handle_fails_every_reading() {
		let driver = ScriptedDriver::new().element(Locator::id("row"), ElementState::stale());
		let el = driver.resolve_once(&Locator::id("row")).unwrap();
		assert!(matches!(el.location(), Err(DriverError::StaleElement(_))));
		assert!(matches!(el.text(), Err(DriverError::StaleElement(_))));
	}

	#[test]
	fn value_text_defaults_to_empty() {
		let driver = ScriptedDriver::new()
			.element(Locator::id("a"), ElementState::visible())
			.element(Locator::id("b"), ElementState::visible().attr("value", "typed"));
		assert_eq!(driver.resolve_once(&Locator::id("a")).unwrap().value_text().unwrap(), "");
		assert_eq!(driver.resolve_once(&Locator::id("b")).unwrap().value_text().unwrap(), "typed");
	}
}
