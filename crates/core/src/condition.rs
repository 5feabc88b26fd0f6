//! Element-state predicates evaluated on each poll attempt.
//!
//! Every evaluation resolves the target afresh and reads all it needs from
//! that one handle. Driver failures of any kind count as "not yet" and
//! become `false`; they never leave this module.

use std::fmt;

use tracing::trace;

use crate::driver::{Driver, DriverResult, Element, Locator};

/// What a sync operation waits for.
///
/// `Hidden` and `Disabled` are the negations of `Visible` and `Enabled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
	Present,
	Visible,
	Hidden,
	Enabled,
	Disabled,
	/// Rendered text, or failing that the `value` attribute, contains the string.
	TextContains(String),
}

impl Condition {
	/// Evaluates the condition once against the live page.
	pub fn evaluate<D: Driver + ?Sized>(&self, driver: &D, target: &Locator) -> bool {
		match self {
			Condition::Present => is_present(driver, target),
			Condition::Visible => is_visible(driver, target),
			Condition::Hidden => !is_visible(driver, target),
			Condition::Enabled => is_enabled(driver, target),
			Condition::Disabled => !is_enabled(driver, target),
			Condition::TextContains(text) => has_text(driver, target, text),
		}
	}

	pub(crate) fn failure_phrase(&self) -> String {
		match self {
			Condition::TextContains(text) => format!("did not contain the text [ {text} ]"),
			other => format!("is not {other} on the page"),
		}
	}
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Condition::Present => write!(f, "PRESENT"),
			Condition::Visible => write!(f, "VISIBLE"),
			Condition::Hidden => write!(f, "HIDDEN"),
			Condition::Enabled => write!(f, "ENABLED"),
			Condition::Disabled => write!(f, "DISABLED"),
			Condition::TextContains(text) => write!(f, "TEXT [ {text} ]"),
		}
	}
}

/// Collapses a driver result to `false` on any error.
fn settle(target: &Locator, check: &'static str, result: DriverResult<bool>) -> bool {
	result.unwrap_or_else(|err| {
		trace!(locator = %target, check, error = %err, "not yet");
		false
	})
}

fn is_present<D: Driver + ?Sized>(driver: &D, target: &Locator) -> bool {
	settle(target, "present", driver.resolve_once(target).map(|_| true))
}

fn is_visible<D: Driver + ?Sized>(driver: &D, target: &Locator) -> bool {
	let reading = driver.resolve_once(target).and_then(|el| visible_box(&el));
	settle(target, "visible", reading)
}

/// Visibility heuristic over one resolved handle.
///
/// Positioned inside the page or having a non-empty box counts as on screen,
/// unless the element is marked `hidden="true"` or is an `<input type="hidden">`.
fn visible_box<E: Element>(el: &E) -> DriverResult<bool> {
	let location = el.location()?;
	let size = el.size()?;
	let on_screen = (location.x > 0.0 && location.y > 0.0) || (size.height > 0.0 && size.width > 0.0);
	if !on_screen {
		return Ok(false);
	}
	if el
		.attribute("hidden")?
		.is_some_and(|hidden| hidden.eq_ignore_ascii_case("true"))
	{
		return Ok(false);
	}
	if el.attribute("type")?.is_some_and(|kind| kind == "hidden") {
		return Ok(false);
	}
	Ok(true)
}

/// Clickable: displayed and enabled.
fn is_enabled<D: Driver + ?Sized>(driver: &D, target: &Locator) -> bool {
	let reading = driver
		.resolve_once(target)
		.and_then(|el| Ok(el.is_displayed()? && el.is_enabled()?));
	settle(target, "enabled", reading)
}

/// Text check with two independent fallbacks to the `value` attribute: one
/// when the rendered text does not match, one when reading it failed.
fn has_text<D: Driver + ?Sized>(driver: &D, target: &Locator, text: &str) -> bool {
	match driver.resolve_once(target).and_then(|el| el.text()) {
		Ok(rendered) if rendered.contains(text) => true,
		Ok(_) => value_contains(driver, target, text),
		Err(err) => {
			trace!(locator = %target, error = %err, "text unreadable, trying value");
			value_contains(driver, target, text)
		}
	}
}

fn value_contains<D: Driver + ?Sized>(driver: &D, target: &Locator, text: &str) -> bool {
	let reading = driver
		.resolve_once(target)
		.and_then(|el| el.value_text())
		.map(|value| value.contains(text));
	settle(target, "value", reading)
}
