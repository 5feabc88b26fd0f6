//! Translating engine locators into WebDriver lookups.

use pagesync::{Locator, Strategy};

/// WebDriver location strategy and its selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lookup {
	Css(String),
	XPath(String),
	Id(String),
	LinkText(String),
}

impl Lookup {
	pub(crate) fn as_fantoccini(&self) -> fantoccini::Locator<'_> {
		match self {
			Lookup::Css(s) => fantoccini::Locator::Css(s),
			Lookup::XPath(s) => fantoccini::Locator::XPath(s),
			Lookup::Id(s) => fantoccini::Locator::Id(s),
			Lookup::LinkText(s) => fantoccini::Locator::LinkText(s),
		}
	}
}

impl From<&Locator> for Lookup {
	fn from(locator: &Locator) -> Self {
		let value = locator.value.as_str();
		match locator.strategy {
			Strategy::Css | Strategy::TagName => Lookup::Css(value.to_string()),
			Strategy::XPath => Lookup::XPath(value.to_string()),
			Strategy::Id => Lookup::Id(value.to_string()),
			Strategy::LinkText => Lookup::LinkText(value.to_string()),
			Strategy::Name => Lookup::Css(format!("[name=\"{}\"]", escape_css(value))),
			Strategy::ClassName => Lookup::Css(format!(".{value}")),
			Strategy::PartialLinkText => {
				Lookup::XPath(format!("//a[contains(normalize-space(.), {})]", xpath_literal(value)))
			}
		}
	}
}

fn escape_css(value: &str) -> String {
	value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quotes `value` as an XPath string literal, splitting on `'` when needed.
fn xpath_literal(value: &str) -> String {
	if !value.contains('\'') {
		return format!("'{value}'");
	}
	if !value.contains('"') {
		return format!("\"{value}\"");
	}
	let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
	format!("concat({})", parts.join(", \"'\", "))
}
