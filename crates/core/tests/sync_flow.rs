//! End-to-end sync scenarios against a scripted page.

use std::sync::{Mutex, MutexGuard, Once};
use std::time::{Duration, Instant};

use pagesync::testing::{ElementState, ScriptedDriver};
use pagesync::{
	Condition, DriverError, Locator, SyncExt, SyncOptions, SyncSettings, is_dom_complete, is_dom_interactive,
	is_framework_idle, settings, sync,
};
use tracing_subscriber::EnvFilter;

static SETTINGS_LOCK: Mutex<()> = Mutex::new(());

/// Every scenario here reads the process-wide settings; one writes them.
fn lock_settings() -> MutexGuard<'static, ()> {
	SETTINGS_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn init_tracing() {
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
			.with_test_writer()
			.try_init();
	});
}

#[test]
fn checkout_flow() -> anyhow::Result<()> {
	init_tracing();
	let _settings = lock_settings();
	let pay = Locator::id("pay");
	let spinner = Locator::css(".spinner");
	let status = Locator::id("status");

	let mut driver = ScriptedDriver::new()
		.ready_state("interactive")
		.ready_state_after(Duration::from_millis(100), "complete")
		.element(pay.clone(), ElementState::visible().disabled())
		.element_after(pay.clone(), Duration::from_millis(150), ElementState::visible())
		.element(spinner.clone(), ElementState::visible())
		.element_after(spinner.clone(), Duration::from_millis(250), ElementState::hidden())
		.element_after(status.clone(), Duration::from_millis(300), ElementState::visible().text("Order placed"));

	assert!(is_dom_interactive(&driver, Some(2)));
	assert!(is_dom_complete(&driver, Some(4)));

	let opts = SyncOptions::within(3).fail_on_timeout(true);
	assert!(driver.sync_enabled_with(&pay, opts)?);
	assert!(driver.sync_hidden_with(&spinner, opts)?);
	assert!(driver.sync_present_with(&status, opts)?);
	assert!(driver.sync_text_with(&status, "Order placed", opts)?);
	Ok(())
}

#[test]
fn condition_true_at_t_returns_soon_after_t() {
	init_tracing();
	let _settings = lock_settings();
	let banner = Locator::id("banner");
	let mut driver = ScriptedDriver::new().element_after(banner.clone(), Duration::from_millis(400), ElementState::visible());

	let started = Instant::now();
	assert!(sync(&mut driver, &Condition::Visible, &banner, SyncOptions::within(2).fail_on_timeout(true)).unwrap());
	let elapsed = started.elapsed();
	assert!(elapsed >= Duration::from_millis(400), "{elapsed:?}");
	assert!(elapsed < Duration::from_millis(900), "{elapsed:?}");
}

#[test]
fn removed_element_syncs_hidden() {
	init_tracing();
	let _settings = lock_settings();
	let modal = Locator::css("#modal");
	let mut driver = ScriptedDriver::new()
		.element(modal.clone(), ElementState::visible())
		.removed_after(modal.clone(), Duration::from_millis(100));

	assert!(driver.sync_visible_with(&modal, SyncOptions::within(0)).unwrap());
	assert!(driver.sync_hidden_with(&modal, SyncOptions::within(2)).unwrap());
}

#[test]
fn never_true_fails_or_returns_false_by_policy() {
	init_tracing();
	let _settings = lock_settings();
	let ghost = Locator::xpath("//div[@id='ghost']");
	let mut driver = ScriptedDriver::new();

	let err = driver
		.sync_visible_with(&ghost, SyncOptions::within(1).fail_on_timeout(true))
		.unwrap_err();
	assert!(err.to_string().contains("By.xpath: //div[@id='ghost']"));
	assert!(err.elapsed().unwrap() >= Duration::from_secs(1));

	assert!(
		!driver
			.sync_visible_with(&ghost, SyncOptions::within(1).fail_on_timeout(false))
			.unwrap()
	);
}

#[test]
fn settings_from_json_drive_the_global_policy() -> anyhow::Result<()> {
	init_tracing();
	let _settings = lock_settings();
	let settings_json = r#"{"failOnTimeout": false, "probeTimeout": 2}"#;
	settings::install(SyncSettings::from_json(settings_json)?)?;

	let ghost = Locator::id("ghost");
	let mut driver = ScriptedDriver::new().with_ambient_timeout(Duration::from_secs(3));
	assert!(!driver.sync_present_with(&ghost, SyncOptions::within(0)).unwrap());
	assert_eq!(driver.ambient_history(), vec![Duration::from_millis(2), Duration::from_secs(3)]);

	settings::set_fail_on_timeout(true);
	assert!(driver.sync_present_with(&ghost, SyncOptions::within(0)).is_err());
	settings::reset();
	Ok(())
}

#[test]
fn zero_page_interval_cannot_turn_probes_continuous() {
	init_tracing();
	let _settings = lock_settings();
	let rejected = settings::install(SyncSettings {
		page_poll_interval_ms: 0,
		..SyncSettings::default()
	});
	assert!(rejected.is_err());

	let driver = ScriptedDriver::new().ready_state("loading");
	let started = Instant::now();
	assert!(!is_dom_complete(&driver, Some(1)));
	assert_eq!(driver.script_calls(), 2);
	assert!(started.elapsed() < Duration::from_millis(900));
}

#[test]
fn framework_idle_without_hook_degrades() {
	init_tracing();
	let _settings = lock_settings();
	let driver = ScriptedDriver::new().ready_state("complete");
	assert!(is_framework_idle(&driver));

	let driver = ScriptedDriver::new().with_framework_hook();
	assert!(is_framework_idle(&driver));
	assert_eq!(driver.script_calls(), 1);
}

#[test]
fn page_probe_survives_dead_session() {
	init_tracing();
	let _settings = lock_settings();
	let driver = ScriptedDriver::new().failing_scripts(DriverError::Session("connection refused".into()));
	assert!(!is_dom_complete(&driver, Some(1)));
	assert_eq!(driver.script_calls(), 2);
}
