use std::time::{Duration, Instant};

/// Poll `predicate` until it returns `true` or `timeout` elapses.
///
/// The predicate is checked once immediately and then after every
/// `poll_interval`, with a final check at the deadline. Returns whether the
/// condition was met; a timeout is not an error, callers decide how to react.
pub fn await_condition<F>(mut predicate: F, timeout: Duration, poll_interval: Duration) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;

    loop {
        if predicate() {
            return true;
        }

        let now = Instant::now();
        if now >= deadline {
            return false;
        }

        std::thread::sleep(poll_interval.min(deadline - now));
    }
}
