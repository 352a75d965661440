//! RAII timing for engine phases.

use std::time::{Duration, Instant};

/// Adds the time between its creation and its drop to a `Duration` slot.
///
/// ```rust,ignore
/// let mut total = Duration::ZERO;
/// {
///     let _timer = PhaseTimer::new(&mut total);
///     // ... evaluate a mapper ...
/// }
/// ```
pub struct PhaseTimer<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}
