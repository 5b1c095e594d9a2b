// Bounded condition polling
//
// The synchronization primitive for UI settling. A fixed-duration sleep is
// deliberately not offered: waits either observe their condition or fail
// with a timeout naming what never appeared.

use std::time::{Duration, Instant};

use crate::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::error::{BookrigError, Result};
use crate::ui::{ElementId, UiDriver};

/// Poll `condition` until it holds or `timeout` elapses. The condition is
/// always checked at least once, even with a zero timeout.
pub fn wait_until<F>(timeout: Duration, description: &str, condition: F) -> Result<()>
where
    F: FnMut() -> bool,
{
    wait_until_with_interval(
        timeout,
        Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        description,
        condition,
    )
}

pub fn wait_until_with_interval<F>(
    timeout: Duration,
    interval: Duration,
    description: &str,
    mut condition: F,
) -> Result<()>
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;

    loop {
        if condition() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(BookrigError::Timeout(description.to_string()));
        }
        std::thread::sleep(interval);
    }
}

/// Wait for an element to appear on screen, bounded by `timeout`.
pub fn wait_for_element(driver: &dyn UiDriver, element: ElementId, timeout: Duration) -> Result<()> {
    wait_until(timeout, element.as_str(), || driver.element_present(element))
}

/// Like `wait_for_element`, but absence is an observable outcome rather
/// than an error. Used where a missing element is the assertion itself
/// (a rejected import never shows a cover).
pub fn element_appears(driver: &dyn UiDriver, element: ElementId, timeout: Duration) -> bool {
    wait_for_element(driver, element, timeout).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_condition_already_true_returns_immediately() {
        let started = Instant::now();
        wait_until(Duration::from_secs(5), "nothing", || true).unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_condition_becomes_true_after_polls() {
        let calls = AtomicU32::new(0);
        wait_until_with_interval(
            Duration::from_secs(5),
            Duration::from_millis(1),
            "third poll",
            || calls.fetch_add(1, Ordering::SeqCst) >= 2,
        )
        .unwrap();
        assert!(calls.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn test_timeout_names_what_was_awaited() {
        let err = wait_until_with_interval(
            Duration::from_millis(10),
            Duration::from_millis(1),
            "cover view",
            || false,
        )
        .unwrap_err();

        match err {
            BookrigError::Timeout(what) => assert_eq!(what, "cover view"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_still_checks_once() {
        wait_until(Duration::ZERO, "instant", || true).unwrap();
        assert!(wait_until(Duration::ZERO, "never", || false).is_err());
    }
}
